//! # Routing Cache
//!
//! 單次執行內的報工歷史索引：批次分析前一次預取，之後的查詢都不再連線

pub mod history_index;

// Re-export 主要類型
pub use history_index::{HistoryIndex, PrefetchPlan};
