//! 庫存異動日誌與在製品模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Resolution;

/// 庫存異動日誌的一列（收貨）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    /// 過帳日期
    pub booking_date: NaiveDate,

    /// 搜尋字（物料號或委外加工工序號）
    pub search_word: String,

    /// 物料描述
    pub description: String,

    /// 收貨儲位
    pub location: String,

    /// 收貨數量
    pub received_qty: Option<Decimal>,

    /// 發料數量
    pub issued_qty: Option<Decimal>,

    /// 採購單號（顯示用，已去除 "+"）
    pub purchase_order: String,

    /// 採購單資料庫 ID
    pub purchase_order_ref: String,

    /// 採購裝箱單資料庫 ID
    pub packing_slip_ref: String,
}

impl StockMovement {
    /// 異動數量：有收貨數量時取收貨，否則取發料
    pub fn quantity(&self) -> Decimal {
        self.received_qty
            .or(self.issued_qty)
            .unwrap_or(Decimal::ZERO)
    }

    /// 是否為委外加工收貨
    pub fn is_processing(&self) -> bool {
        self.location.contains("PROCESSING")
    }

    /// 是否為物料或五金收貨
    pub fn is_material(&self) -> bool {
        self.location.contains("MATERIAL") || self.location.contains("HARDWARE")
    }
}

/// 採購裝箱單資訊
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingSlipInfo {
    pub supplier: String,
    pub item_text: String,
}

/// 在製品快照（取自途程表表頭）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WipRow {
    pub work_order: String,
    pub part_number: String,
    pub description: String,
    pub customer: Resolution<String>,
    pub released_qty: Decimal,
    pub completed_qty: Decimal,
    pub mrb_qty: Decimal,
    pub scrap_qty: Decimal,
    pub due_qty: Decimal,
    pub process: String,
}
