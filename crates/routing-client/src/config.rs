//! 服務連線配置

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use routing_core::{Result, RoutingError};
use serde::{Deserialize, Serialize};

/// 生產資料服務配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// 生產中心查詢端點（途程表）
    pub prod_center_url: String,

    /// 開立中工單查詢端點
    pub open_work_orders_url: String,

    /// 開立中工單查詢的請求本文（JSON 字串）
    pub open_work_orders_payload: String,

    /// 工單報工日誌查詢端點
    pub confirmations_url: String,

    /// 報工紀錄資料庫
    pub work_order_db_url: String,

    /// 採購單資料庫
    pub purchase_order_url: String,

    /// 採購裝箱單資料庫
    pub packing_slip_url: String,

    /// 產品資料庫
    pub product_db_url: String,

    /// 庫存異動日誌查詢端點
    pub stock_journal_url: String,

    /// 認證標頭名稱
    #[serde(default = "default_auth_header")]
    pub auth_header: String,

    /// 認證標頭內容
    #[serde(default)]
    pub auth_token: String,

    /// 途程表抓取的最大同時連線數
    #[serde(default = "default_connection_limit")]
    pub connection_limit: usize,

    /// 請求逾時秒數（未設定時不逾時）
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// 途程表查詢的工作中心群組
    #[serde(default = "default_work_center_group")]
    pub work_center_group: String,
}

fn default_auth_header() -> String {
    "Authorization".to_string()
}

fn default_connection_limit() -> usize {
    10
}

fn default_work_center_group() -> String {
    "INTWHG".to_string()
}

impl ServiceConfig {
    /// 以同一個基底網址建立各端點（測試與本機環境使用）
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            prod_center_url: format!("{}/infosys/prod-center", base),
            open_work_orders_url: format!("{}/infosys/open-work-orders", base),
            open_work_orders_payload: "{}".to_string(),
            confirmations_url: format!("{}/infosys/confirmations", base),
            work_order_db_url: format!("{}/obj/work-slips", base),
            purchase_order_url: format!("{}/obj/purchase-orders", base),
            packing_slip_url: format!("{}/obj/packing-slips", base),
            product_db_url: format!("{}/obj/products", base),
            stock_journal_url: format!("{}/infosys/stock-journal", base),
            auth_header: default_auth_header(),
            auth_token: String::new(),
            connection_limit: default_connection_limit(),
            request_timeout_secs: None,
            work_center_group: default_work_center_group(),
        }
    }

    /// 建構器模式：設置認證內容
    pub fn with_auth_token(mut self, token: String) -> Self {
        self.auth_token = token;
        self
    }

    /// 建構器模式：設置最大同時連線數
    pub fn with_connection_limit(mut self, limit: usize) -> Self {
        self.connection_limit = limit;
        self
    }

    /// 建構器模式：設置請求逾時
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// 同時連線數（至少 1）
    pub fn effective_connection_limit(&self) -> usize {
        self.connection_limit.max(1)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// 檢查配置
    pub fn validate(&self) -> Result<()> {
        let urls = [
            ("prod_center_url", &self.prod_center_url),
            ("open_work_orders_url", &self.open_work_orders_url),
            ("confirmations_url", &self.confirmations_url),
            ("work_order_db_url", &self.work_order_db_url),
            ("purchase_order_url", &self.purchase_order_url),
            ("packing_slip_url", &self.packing_slip_url),
            ("product_db_url", &self.product_db_url),
            ("stock_journal_url", &self.stock_journal_url),
        ];
        for (name, url) in urls {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(RoutingError::Config(format!("{} 不是有效的網址: {:?}", name, url)));
            }
        }
        if self.connection_limit == 0 {
            return Err(RoutingError::Config("connection_limit 必須大於 0".to_string()));
        }
        Ok(())
    }

    /// 每個請求都帶的標頭
    pub fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if self.auth_token.is_empty() {
            return Ok(headers);
        }

        let name = HeaderName::from_bytes(self.auth_header.as_bytes())
            .map_err(|e| RoutingError::Config(format!("無效的認證標頭名稱: {}", e)))?;
        let mut value = HeaderValue::from_str(&self.auth_token)
            .map_err(|e| RoutingError::Config(format!("無效的認證標頭內容: {}", e)))?;
        value.set_sensitive(true);
        headers.insert(name, value);
        Ok(headers)
    }
}

/// 資料庫物件網址：`<base>/<id>`
pub(crate) fn object_url(base: &str, id: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), id)
}
