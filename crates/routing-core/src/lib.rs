//! # Routing Core
//!
//! 工單途程資料模型、引擎配置與外部查詢介面

pub mod config;
pub mod confirmation;
pub mod journal;
pub mod lookup;
pub mod parse;
pub mod routing;
pub mod verdict;

// Re-export 主要類型
pub use config::{EngineConfig, NumberFormat};
pub use confirmation::{ConfirmationRecord, Resolution};
pub use journal::{PackingSlipInfo, StockMovement, WipRow};
pub use lookup::{ConfirmationLookup, EnrichmentLookup, RoutingTableFetcher};
pub use routing::{OperationStep, RoutingTable};
pub use verdict::{
    NextProcess, NoMatchReason, PassExit, Progress, QualityStatus, QualityVerdict,
    YieldCompletion, YieldMatch,
};

/// 途程引擎錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("途程表為空: {0}")]
    EmptyRoutingTable(String),

    #[error("無效的數量: {0:?}")]
    InvalidQuantity(String),

    #[error("無效的日期: {0:?}")]
    InvalidDate(String),

    #[error("找不到資料: {0}")]
    NotFound(String),

    #[error("報表列未排序：第 {row} 列的分組鍵已出現過")]
    UnsortedReportRows { row: usize },

    #[error("服務呼叫失敗: {0}")]
    Service(String),

    #[error("回應格式錯誤: {0}")]
    Payload(String),

    #[error("報表輸出錯誤: {0}")]
    Report(String),

    #[error("配置錯誤: {0}")]
    Config(String),

    #[error("其他錯誤: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, RoutingError>;
