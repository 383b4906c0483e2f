//! 庫存異動日誌：委外加工收貨與物料收貨

use routing_core::{EnrichmentLookup, NextProcess, PackingSlipInfo, Result, StockMovement};
use rust_decimal::Decimal;

use crate::reconcile::ReportRowReconciler;

/// 無資料時的顯示值
const PLACEHOLDER: &str = "-";

/// 委外加工收貨（合併後）
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingReceipt {
    pub item: usize,
    pub purchase_order: String,
    pub supplier: String,
    pub description: String,
    /// 加工工序號
    pub process: String,
    /// 採購單明細上列出的工單
    pub work_orders: Vec<String>,
    pub location: String,
    pub quantity: Decimal,
    /// 第一張工單中加工工序之後的工序
    pub next_process: NextProcess,
}

/// 物料收貨（合併後）
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialReceipt {
    pub item: usize,
    pub purchase_order: String,
    pub supplier: String,
    pub description: String,
    pub part_number: String,
    pub item_text: String,
    pub location: String,
    pub quantity: Decimal,
}

struct ProcessingEnrichment {
    supplier: String,
    work_orders: Vec<String>,
    next_process: NextProcess,
}

/// 日誌報表組裝器
pub struct JournalAssembler;

impl JournalAssembler {
    /// 組裝委外加工收貨表
    ///
    /// 依 (採購單, 工序號, 儲位) 排序與合併，每組查詢一次供應商、工單與下一道工序。
    pub fn processing_receipts<E>(
        movements: &[StockMovement],
        lookup: &E,
    ) -> Result<Vec<ProcessingReceipt>>
    where
        E: EnrichmentLookup + ?Sized,
    {
        let mut rows: Vec<StockMovement> = movements
            .iter()
            .filter(|m| m.is_processing())
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (&a.purchase_order_ref, &a.search_word, &a.location).cmp(&(
                &b.purchase_order_ref,
                &b.search_word,
                &b.location,
            ))
        });

        let merged = ReportRowReconciler::reconcile(
            rows,
            |m| {
                (
                    m.purchase_order_ref.clone(),
                    m.search_word.clone(),
                    m.location.clone(),
                )
            },
            StockMovement::quantity,
            |m| Self::enrich_processing(m, lookup),
        )?;

        tracing::info!(rows = merged.len(), "委外加工收貨表組裝完成");

        Ok(merged
            .into_iter()
            .map(|group| ProcessingReceipt {
                item: group.item,
                purchase_order: display(&group.row.purchase_order),
                supplier: group.enrichment.supplier,
                description: group.row.description,
                process: group.row.search_word,
                work_orders: group.enrichment.work_orders,
                location: group.row.location,
                quantity: group.quantity,
                next_process: group.enrichment.next_process,
            })
            .collect())
    }

    /// 組裝物料收貨表
    ///
    /// 依 (儲位, 物料號) 排序，完整分組鍵相同的列合併，每組查詢一次裝箱單。
    pub fn material_receipts<E>(
        movements: &[StockMovement],
        lookup: &E,
    ) -> Result<Vec<MaterialReceipt>>
    where
        E: EnrichmentLookup + ?Sized,
    {
        let mut rows: Vec<StockMovement> = movements
            .iter()
            .filter(|m| m.is_material())
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (
                &a.location,
                &a.search_word,
                &a.purchase_order,
                &a.packing_slip_ref,
                &a.description,
            )
                .cmp(&(
                    &b.location,
                    &b.search_word,
                    &b.purchase_order,
                    &b.packing_slip_ref,
                    &b.description,
                ))
        });

        let merged = ReportRowReconciler::reconcile(
            rows,
            |m| {
                (
                    m.purchase_order.clone(),
                    m.packing_slip_ref.clone(),
                    m.description.clone(),
                    m.search_word.clone(),
                    m.location.clone(),
                )
            },
            StockMovement::quantity,
            |m| Self::packing_slip(m, lookup),
        )?;

        tracing::info!(rows = merged.len(), "物料收貨表組裝完成");

        Ok(merged
            .into_iter()
            .map(|group| MaterialReceipt {
                item: group.item,
                purchase_order: display(&group.row.purchase_order),
                supplier: group.enrichment.supplier,
                description: group.row.description,
                part_number: group.row.search_word,
                item_text: group.enrichment.item_text,
                location: group.row.location,
                quantity: group.quantity,
            })
            .collect())
    }

    fn enrich_processing<E>(movement: &StockMovement, lookup: &E) -> Result<ProcessingEnrichment>
    where
        E: EnrichmentLookup + ?Sized,
    {
        let po_ref = movement.purchase_order_ref.trim();
        if po_ref.is_empty() {
            return Ok(ProcessingEnrichment {
                supplier: PLACEHOLDER.to_string(),
                work_orders: Vec::new(),
                next_process: NextProcess::NotFound,
            });
        }

        let supplier = lookup.supplier_name(po_ref)?;
        let work_orders = lookup.work_orders_for(po_ref, &movement.search_word)?;
        let next_process = match work_orders.first() {
            Some(work_order) => lookup.next_operation(work_order, &movement.search_word)?,
            None => NextProcess::NotFound,
        };

        tracing::debug!(
            purchase_order = %movement.purchase_order,
            process = %movement.search_word,
            work_orders = work_orders.len(),
            "委外加工收貨附加資訊"
        );

        Ok(ProcessingEnrichment {
            supplier,
            work_orders,
            next_process,
        })
    }

    fn packing_slip<E>(movement: &StockMovement, lookup: &E) -> Result<PackingSlipInfo>
    where
        E: EnrichmentLookup + ?Sized,
    {
        let slip_ref = movement.packing_slip_ref.trim();
        if slip_ref.is_empty() {
            return Ok(PackingSlipInfo {
                supplier: PLACEHOLDER.to_string(),
                item_text: PLACEHOLDER.to_string(),
            });
        }

        let info = lookup.packing_slip(slip_ref)?;
        Ok(PackingSlipInfo {
            supplier: display(&info.supplier),
            item_text: display(&info.item_text),
        })
    }
}

fn display(text: &str) -> String {
    if text.trim().is_empty() {
        PLACEHOLDER.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{date, FakeService};
    use routing_core::RoutingError;

    fn movement(po: &str, po_ref: &str, part: &str, location: &str, qty: i64) -> StockMovement {
        StockMovement {
            booking_date: date(2025, 11, 3),
            search_word: part.to_string(),
            description: format!("{} desc", part),
            location: location.to_string(),
            received_qty: Some(Decimal::from(qty)),
            issued_qty: None,
            purchase_order: po.to_string(),
            purchase_order_ref: po_ref.to_string(),
            packing_slip_ref: String::new(),
        }
    }

    fn processing_service() -> FakeService {
        let mut service = FakeService::new();
        service
            .suppliers
            .insert("(PO-1)".to_string(), "Acme Plating".to_string());
        service.purchase_order_lines.insert(
            "(PO-1)".to_string(),
            vec![
                ("OP-PLATE".to_string(), "WO 4411".to_string()),
                ("OP-PLATE".to_string(), "Rush".to_string()),
                ("OP-ANODIZE".to_string(), "WO 4412".to_string()),
                ("OP-PLATE".to_string(), "WO 4415".to_string()),
            ],
        );
        service.next_operations.insert(
            ("4411".to_string(), "OP-PLATE".to_string()),
            NextProcess::Operation("Inspection".to_string()),
        );
        service
    }

    #[test]
    fn test_processing_receipts_merge_and_enrich() {
        let service = processing_service();
        let journal = vec![
            movement("PO-1", "(PO-1)", "OP-PLATE", "PROCESSING", 10),
            movement("PO-9", "(PO-9)", "AL-6061", "RAW MATERIAL", 99),
            movement("PO-1", "(PO-1)", "OP-PLATE", "PROCESSING", 5),
        ];

        let receipts = JournalAssembler::processing_receipts(&journal, &service).unwrap();

        assert_eq!(receipts.len(), 1);
        let receipt = &receipts[0];
        assert_eq!(receipt.item, 1);
        assert_eq!(receipt.supplier, "Acme Plating");
        assert_eq!(receipt.quantity, Decimal::from(15));
        assert_eq!(receipt.work_orders, vec!["4411", "4415"]);
        assert_eq!(
            receipt.next_process,
            NextProcess::Operation("Inspection".to_string())
        );
        // 供應商、明細、下一道工序各查一次
        assert_eq!(service.call_count(), 3);
    }

    #[test]
    fn test_processing_receipt_without_purchase_order() {
        let service = FakeService::new();
        let journal = vec![movement("", "", "OP-PLATE", "PROCESSING", 3)];

        let receipts = JournalAssembler::processing_receipts(&journal, &service).unwrap();

        assert_eq!(receipts[0].purchase_order, "-");
        assert_eq!(receipts[0].supplier, "-");
        assert!(receipts[0].work_orders.is_empty());
        assert_eq!(receipts[0].next_process, NextProcess::NotFound);
        assert_eq!(service.call_count(), 0);
    }

    #[test]
    fn test_processing_lookup_failure_propagates() {
        let service = processing_service().failing_on("(PO-1)");
        let journal = vec![movement("PO-1", "(PO-1)", "OP-PLATE", "PROCESSING", 10)];

        assert!(matches!(
            JournalAssembler::processing_receipts(&journal, &service),
            Err(RoutingError::Service(_))
        ));
    }

    #[test]
    fn test_material_receipts_sorted_by_location_then_part() {
        let mut service = FakeService::new();
        service.packing_slips.insert(
            "(PS-1)".to_string(),
            PackingSlipInfo {
                supplier: "Metal Supply".to_string(),
                item_text: String::new(),
            },
        );

        let mut bar = movement("PO-2", "(PO-2)", "AL-6061", "RAW MATERIAL", 4);
        bar.packing_slip_ref = "(PS-1)".to_string();
        let mut bar_again = bar.clone();
        bar_again.received_qty = None;
        bar_again.issued_qty = Some(Decimal::from(6));

        let journal = vec![
            movement("PO-3", "(PO-3)", "SCREW-M4", "HARDWARE", 100),
            bar,
            movement("PO-4", "(PO-4)", "AL-2024", "RAW MATERIAL", 1),
            bar_again,
            movement("PO-1", "(PO-1)", "OP-PLATE", "PROCESSING", 10),
        ];

        let receipts = JournalAssembler::material_receipts(&journal, &service).unwrap();

        let parts: Vec<&str> = receipts.iter().map(|r| r.part_number.as_str()).collect();
        assert_eq!(parts, vec!["SCREW-M4", "AL-2024", "AL-6061"]);
        assert_eq!(receipts[2].item, 3);
        assert_eq!(receipts[2].quantity, Decimal::from(10));
        assert_eq!(receipts[2].supplier, "Metal Supply");
        assert_eq!(receipts[2].item_text, "-");
        assert_eq!(receipts[0].supplier, "-");
        assert_eq!(service.call_count(), 1);
    }
}
