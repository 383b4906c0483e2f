//! 每日完工比對

use chrono::NaiveDate;
use routing_core::{
    ConfirmationLookup, EngineConfig, NextProcess, NoMatchReason, RoutingTable, YieldCompletion,
    YieldMatch,
};

use crate::history::{self, CompletionPoint};

/// 完工比對器
pub struct YieldMatcher;

impl YieldMatcher {
    /// 找出在 `target_date` 全部完工的工序
    ///
    /// 由最後一道工序往前找第一道已全部投放的工序，只檢查這一道：
    /// 以報工歷史回推它的完工日期，等於目標日期才算比對成功。
    pub fn match_date<L>(
        table: &RoutingTable,
        target_date: NaiveDate,
        config: &EngineConfig,
        lookup: &L,
    ) -> YieldMatch
    where
        L: ConfirmationLookup + ?Sized,
    {
        let Some((i, step)) = table
            .operations()
            .rev()
            .find(|(_, step)| step.is_fully_released())
        else {
            return YieldMatch::NotMatched(NoMatchReason::NoReleasedStep);
        };

        let work_slip = step.order_id.trim();
        if work_slip.is_empty() {
            return YieldMatch::NotMatched(NoMatchReason::MissingWorkSlip { step: i });
        }

        let point = match history::completion_point(lookup, work_slip, step.processed_qty()) {
            Ok(point) => point,
            Err(e) => {
                tracing::warn!(
                    work_order = %table.work_order(),
                    work_slip = %work_slip,
                    error = %e,
                    "查詢報工歷史失敗"
                );
                return YieldMatch::NotMatched(NoMatchReason::LookupFailed {
                    step: i,
                    message: e.to_string(),
                });
            }
        };

        match point {
            CompletionPoint::Completed { date, timestamp } if date == target_date => {
                YieldMatch::Matched(YieldCompletion {
                    step: i,
                    work_slip: work_slip.to_string(),
                    process: step.description.clone(),
                    quantity: step.completed_qty,
                    next_process: Self::next_process(table, i, config),
                    completion_date: date,
                    completion_timestamp: timestamp,
                })
            }
            CompletionPoint::Completed { date, .. } => {
                YieldMatch::NotMatched(NoMatchReason::CompletedOnOtherDate { step: i, date })
            }
            CompletionPoint::NoQuantity => {
                YieldMatch::NotMatched(NoMatchReason::NoQuantityRecorded { step: i })
            }
            CompletionPoint::Unbalanced => YieldMatch::NotMatched(NoMatchReason::Unbalanced {
                step: i,
                work_slip: work_slip.to_string(),
            }),
        }
    }

    /// 工序 `index` 之後的下一道工序（略過首件）
    pub fn next_process(table: &RoutingTable, index: usize, config: &EngineConfig) -> NextProcess {
        match table.step(index + 1) {
            None => NextProcess::Last,
            Some(next) if config.is_first_off(&next.description) => table
                .step(index + 2)
                .map(|after| NextProcess::Operation(after.description.clone()))
                .unwrap_or(NextProcess::Last),
            Some(next) => NextProcess::Operation(next.description.clone()),
        }
    }

    /// 途程中產品代碼為 `process` 的工序之後的下一道工序
    pub fn next_operation_after(
        table: &RoutingTable,
        process: &str,
        config: &EngineConfig,
    ) -> NextProcess {
        table
            .operations()
            .find(|(_, step)| step.product_code == process)
            .map(|(i, _)| Self::next_process(table, i, config))
            .unwrap_or(NextProcess::NotFound)
    }
}
