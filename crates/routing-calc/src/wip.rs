//! 在製品快照

use routing_core::{EnrichmentLookup, Resolution, RoutingTable, WipRow};

/// 由途程表表頭產生在製品列
pub struct WipSnapshot;

impl WipSnapshot {
    /// 取表頭的數量欄位，客戶名稱以產品資料庫查詢
    ///
    /// 查詢失敗不會中斷：客戶欄位記為 `Resolution::Failed`。
    pub fn from_table<E>(table: &RoutingTable, lookup: &E) -> WipRow
    where
        E: EnrichmentLookup + ?Sized,
    {
        let header = table.header();

        let customer = if header.product_ref.trim().is_empty() {
            Resolution::Missing
        } else {
            let result = lookup
                .customer_name(&header.product_ref)
                .map(|name| Some(name).filter(|n| !n.trim().is_empty()));
            if let Err(e) = &result {
                tracing::warn!(
                    work_order = %table.work_order(),
                    product_ref = %header.product_ref,
                    error = %e,
                    "查詢客戶名稱失敗"
                );
            }
            Resolution::from_lookup(result)
        };

        WipRow {
            work_order: header.order_id.clone(),
            part_number: header.product_code.clone(),
            description: header.description.clone(),
            customer,
            released_qty: header.released_qty,
            completed_qty: header.completed_qty,
            mrb_qty: header.mrb_qty,
            scrap_qty: header.scrap_qty,
            due_qty: header.due_qty,
            process: header.description.clone(),
        }
    }
}
