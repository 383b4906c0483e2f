//! 報工（完工確認）紀錄模型

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 完工確認紀錄（唯讀快照）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationRecord {
    /// 紀錄資料庫 ID
    pub id: String,

    /// 工作單號
    pub work_slip: String,

    /// 報工數量（良品 + MRB + 報廢）
    pub quantity: Decimal,

    /// 其中的 MRB 數量
    pub mrb_qty: Decimal,

    /// 報工日期
    pub date: NaiveDate,

    /// 最後異動時間
    pub timestamp: Option<NaiveDateTime>,
}

impl ConfirmationRecord {
    /// 創建新的報工紀錄
    pub fn new(id: String, work_slip: String, quantity: Decimal, date: NaiveDate) -> Self {
        Self {
            id,
            work_slip,
            quantity,
            mrb_qty: Decimal::ZERO,
            date,
            timestamp: None,
        }
    }

    /// 建構器模式：設置 MRB 數量
    pub fn with_mrb(mut self, qty: Decimal) -> Self {
        self.mrb_qty = qty;
        self
    }

    /// 建構器模式：設置時間戳
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// 是否含 MRB 數量
    pub fn is_mrb(&self) -> bool {
        self.mrb_qty > Decimal::ZERO
    }

    /// 是否有任何報工數量
    pub fn has_quantity(&self) -> bool {
        !self.quantity.is_zero()
    }
}

/// 外部查詢的解析結果
///
/// 取代 "No Date"、"N/A" 之類的字串哨兵值，呼叫端必須明確處理缺漏與失敗。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution<T> {
    /// 找到資料
    Found(T),
    /// 查詢成功但沒有符合的紀錄
    Missing,
    /// 查詢失敗（網路或服務錯誤）
    Failed(String),
}

impl<T> Resolution<T> {
    /// 取得找到的值
    pub fn found(&self) -> Option<&T> {
        match self {
            Resolution::Found(value) => Some(value),
            _ => None,
        }
    }

    /// 是否找到資料
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    /// 轉換找到的值
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Found(value) => Resolution::Found(f(value)),
            Resolution::Missing => Resolution::Missing,
            Resolution::Failed(message) => Resolution::Failed(message),
        }
    }

    /// 由查詢結果建立：`Ok(Some)` 為找到，`Ok(None)` 為缺漏，`Err` 為失敗
    pub fn from_lookup<E: std::fmt::Display>(
        result: std::result::Result<Option<T>, E>,
    ) -> Self {
        match result {
            Ok(Some(value)) => Resolution::Found(value),
            Ok(None) => Resolution::Missing,
            Err(e) => Resolution::Failed(e.to_string()),
        }
    }
}
