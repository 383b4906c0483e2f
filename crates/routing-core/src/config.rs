//! 途程引擎配置

use serde::{Deserialize, Serialize};

use crate::{Result, RoutingError};

/// 途程狀態推論參數
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 可比較的產品代碼前綴（不符合者視為其他產品族，例如組裝件）
    pub accepted_prefixes: Vec<String>,

    /// 視為檢驗工序的工序名稱
    pub inspection_descriptions: Vec<String>,

    /// 首件工序名稱（只記錄樣品數量，不代表生產流量）
    pub first_off_description: String,

    /// 三次元量測工序標記（名稱包含即排除）
    pub cmm_marker: String,

    /// 數量文字的地區格式
    pub number_format: NumberFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            accepted_prefixes: Vec::new(),
            inspection_descriptions: vec!["Inspection".to_string(), "Final Inspection".to_string()],
            first_off_description: "1st Off".to_string(),
            cmm_marker: "CMM".to_string(),
            number_format: NumberFormat::default(),
        }
    }
}

impl EngineConfig {
    /// 創建新的引擎配置
    pub fn new(accepted_prefixes: Vec<String>) -> Self {
        Self {
            accepted_prefixes,
            ..Self::default()
        }
    }

    /// 建構器模式：設置檢驗工序名稱
    pub fn with_inspection_descriptions(mut self, descriptions: Vec<String>) -> Self {
        self.inspection_descriptions = descriptions;
        self
    }

    /// 建構器模式：設置首件工序名稱
    pub fn with_first_off_description(mut self, description: String) -> Self {
        self.first_off_description = description;
        self
    }

    /// 建構器模式：設置量測工序標記
    pub fn with_cmm_marker(mut self, marker: String) -> Self {
        self.cmm_marker = marker;
        self
    }

    /// 建構器模式：設置數量格式
    pub fn with_number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = format;
        self
    }

    /// 檢查配置
    ///
    /// 沒有任何產品前綴時所有工序都會被略過，品質判定將永遠找不到待檢數量。
    pub fn validate(&self) -> Result<()> {
        if self.accepted_prefixes.is_empty() {
            return Err(RoutingError::Config(
                "accepted_prefixes 不可為空".to_string(),
            ));
        }
        if self.accepted_prefixes.iter().any(|p| p.trim().is_empty()) {
            return Err(RoutingError::Config(
                "accepted_prefixes 含有空白前綴".to_string(),
            ));
        }
        if self.inspection_descriptions.is_empty() {
            return Err(RoutingError::Config(
                "inspection_descriptions 不可為空".to_string(),
            ));
        }
        Ok(())
    }

    /// 是否為檢驗工序
    pub fn is_inspection(&self, description: &str) -> bool {
        self.inspection_descriptions.iter().any(|d| d == description)
    }

    /// 是否為首件工序
    pub fn is_first_off(&self, description: &str) -> bool {
        description == self.first_off_description
    }

    /// 產品代碼是否屬於可比較的產品族
    pub fn accepts_product(&self, product_code: &str) -> bool {
        self.accepted_prefixes
            .iter()
            .any(|prefix| product_code.starts_with(prefix.as_str()))
    }

    /// 數量比較時是否略過此工序
    ///
    /// 首件、CMM 與其他產品族的工序都不代表生產流量
    pub fn skips_in_flow(&self, description: &str, product_code: &str) -> bool {
        self.is_first_off(description)
            || description.contains(self.cmm_marker.as_str())
            || !self.accepts_product(product_code)
    }
}

/// 數量文字格式（千分位與小數點）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub thousands_separator: char,
    pub decimal_separator: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            thousands_separator: ',',
            decimal_separator: '.',
        }
    }
}
