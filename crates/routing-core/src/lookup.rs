//! 外部服務查詢介面
//!
//! 引擎只依賴這些 trait；實際的 REST 客戶端在 `routing-client`，
//! 測試使用記憶體內的假實作。

use async_trait::async_trait;

use crate::{ConfirmationRecord, NextProcess, PackingSlipInfo, Result, RoutingTable};

/// 途程表來源（生產中心查詢）
#[async_trait]
pub trait RoutingTableFetcher: Send + Sync {
    /// 取得目前開立中的工單號
    async fn fetch_open_ids(&self) -> Result<Vec<String>>;

    /// 取得單一工單的途程表
    async fn fetch(&self, work_order: &str) -> Result<RoutingTable>;
}

/// 完工確認紀錄查詢
pub trait ConfirmationLookup {
    /// 工作單的完整報工歷史（依建檔順序，最舊在前）
    fn history(&self, work_slip: &str) -> Result<Vec<ConfirmationRecord>>;

    /// 單筆報工紀錄明細
    fn by_id(&self, confirmation_id: &str) -> Result<ConfirmationRecord>;

    /// 工單的報工日誌（所有工作單，依服務回傳順序）
    fn order_confirmations(&self, order_ref: &str) -> Result<Vec<ConfirmationRecord>>;
}

/// 報表列補充資料查詢
pub trait EnrichmentLookup {
    /// 由採購單取得供應商名稱
    fn supplier_name(&self, purchase_order_ref: &str) -> Result<String>;

    /// 由採購裝箱單取得供應商與品項說明
    fn packing_slip(&self, packing_slip_ref: &str) -> Result<PackingSlipInfo>;

    /// 採購單中指定加工工序所對應的工單號
    fn work_orders_for(&self, purchase_order_ref: &str, process: &str) -> Result<Vec<String>>;

    /// 工單途程中指定工序的下一道工序
    fn next_operation(&self, work_order: &str, process: &str) -> Result<NextProcess>;

    /// 由產品資料庫 ID 取得客戶名稱
    fn customer_name(&self, product_ref: &str) -> Result<String>;
}

impl<T: ConfirmationLookup + ?Sized> ConfirmationLookup for &T {
    fn history(&self, work_slip: &str) -> Result<Vec<ConfirmationRecord>> {
        (**self).history(work_slip)
    }

    fn by_id(&self, confirmation_id: &str) -> Result<ConfirmationRecord> {
        (**self).by_id(confirmation_id)
    }

    fn order_confirmations(&self, order_ref: &str) -> Result<Vec<ConfirmationRecord>> {
        (**self).order_confirmations(order_ref)
    }
}
