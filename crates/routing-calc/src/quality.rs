//! 品質狀態判定
//!
//! 由途程表推論工單是否正在檢驗：以檢驗工序為基準，向前找最近一道
//! 實際生產工序，其完工數量超出檢驗工序已處理數量的部分即為待檢數量。

use routing_core::{
    ConfirmationLookup, EngineConfig, PassExit, Progress, QualityStatus, QualityVerdict,
    RoutingTable,
};
use rust_decimal::Decimal;

use crate::history;

/// 由檢驗工序向前（往表頭方向）掃描的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackwardScan {
    /// 前一道生產工序完工數量較多，差額在檢驗中
    InQuality { step: usize, quantity: Decimal },
    /// 前一道生產工序的數量已全部由檢驗工序處理
    NotInQuality { step: usize },
    /// 沒有可比較的前工序
    Exhausted,
}

/// 由檢驗工序向後掃描的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardScan {
    /// 後續工序回報的完工數量多於檢驗工序
    Superseded { step: usize },
    Clear,
}

/// 品質狀態判定器
pub struct QualityClassifier;

impl QualityClassifier {
    /// 判定單一途程表的品質與 MRB 狀態
    ///
    /// 逐道工序正向掃描；任一工序有 MRB 數量即記錄並終止掃描。
    /// 日期查詢失敗不會中斷判定，只會在對應欄位記為失敗。
    pub fn classify<L>(table: &RoutingTable, config: &EngineConfig, lookup: &L) -> QualityVerdict
    where
        L: ConfirmationLookup + ?Sized,
    {
        let mut verdict = QualityVerdict::not_in_quality();
        let mut found = false;
        let mut tentative = false;

        for (i, step) in table.operations() {
            if step.has_mrb() {
                verdict.has_mrb = true;
                verdict.mrb_quantity += step.mrb_qty;
                verdict.mrb_date = Some(history::latest_mrb_date(lookup, &step.order_id));
                verdict.exit = PassExit::TerminatedByMrb { step: i };
                tracing::debug!(
                    work_order = %table.work_order(),
                    step = i,
                    mrb_qty = %step.mrb_qty,
                    "MRB 數量終止品質掃描"
                );
                break;
            }

            if found || !config.is_inspection(&step.description) {
                continue;
            }

            let processed = step.processed_qty();
            if let BackwardScan::InQuality { quantity, .. } =
                Self::backward_scan(table, i, processed, config)
            {
                found = true;
                verdict.quantity = Some(quantity);
                verdict.progress = Some(Progress {
                    step: i,
                    total: table.operation_count(),
                });
                verdict.entry_date = Some(history::entry_date(
                    lookup,
                    &table.header().order_ref,
                    &step.order_id,
                ));
            }

            if found || step.completed_qty.is_zero() {
                if let ForwardScan::Superseded { step: later } = Self::forward_scan(table, i, config)
                {
                    tracing::debug!(
                        work_order = %table.work_order(),
                        inspection = i,
                        later,
                        "後續工序完工數量較多，檢驗結果暫定"
                    );
                    tentative = true;
                }
            }
        }

        verdict.status = match (found, tentative) {
            (true, true) => QualityStatus::Tentative,
            (true, false) => QualityStatus::Confirmed,
            _ => QualityStatus::NotInQuality,
        };
        verdict
    }

    /// 由檢驗工序 `inspection` 往前找第一道不被略過的工序並比較完工數量
    pub fn backward_scan(
        table: &RoutingTable,
        inspection: usize,
        processed: Decimal,
        config: &EngineConfig,
    ) -> BackwardScan {
        let previous = (1..inspection)
            .rev()
            .filter_map(|j| table.step(j).map(|step| (j, step)))
            .find(|(_, step)| !config.skips_in_flow(&step.description, &step.product_code));

        match previous {
            Some((j, step)) if step.completed_qty > processed => BackwardScan::InQuality {
                step: j,
                quantity: step.completed_qty - processed,
            },
            Some((j, _)) => BackwardScan::NotInQuality { step: j },
            None => BackwardScan::Exhausted,
        }
    }

    /// 檢驗工序之後是否有工序回報更多完工數量
    ///
    /// 量測工序的排除以被掃描的工序名稱為準。
    pub fn forward_scan(table: &RoutingTable, inspection: usize, config: &EngineConfig) -> ForwardScan {
        let Some(base) = table.step(inspection) else {
            return ForwardScan::Clear;
        };

        table
            .operations()
            .skip(inspection)
            .filter(|(_, step)| !config.skips_in_flow(&step.description, &step.product_code))
            .find(|(_, step)| step.completed_qty > base.completed_qty)
            .map(|(j, _)| ForwardScan::Superseded { step: j })
            .unwrap_or(ForwardScan::Clear)
    }
}
