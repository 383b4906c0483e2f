//! # Routing State Engine
//!
//! 由途程表推論品質狀態、MRB 例外與每日完工，並合併報表列

pub mod batch;
pub mod history;
pub mod journal;
pub mod quality;
pub mod reconcile;
pub mod wip;
pub mod yield_match;

#[cfg(test)]
pub(crate) mod testing;

// Re-export 主要類型
pub use batch::{BatchAnalyzer, BatchResult, FetchOutcome, QualityRow, YieldRow};
pub use journal::{JournalAssembler, MaterialReceipt, ProcessingReceipt};
pub use quality::{BackwardScan, ForwardScan, QualityClassifier};
pub use reconcile::{MergedRow, ReportRowReconciler};
pub use wip::WipSnapshot;
pub use yield_match::YieldMatcher;

/// 批次分析警告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchWarning {
    pub work_order: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl BatchWarning {
    pub fn new(work_order: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            work_order,
            message,
            severity,
        }
    }

    pub fn info(work_order: String, message: String) -> Self {
        Self::new(work_order, message, WarningSeverity::Info)
    }

    pub fn warning(work_order: String, message: String) -> Self {
        Self::new(work_order, message, WarningSeverity::Warning)
    }

    pub fn error(work_order: String, message: String) -> Self {
        Self::new(work_order, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}
