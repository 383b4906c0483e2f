//! # Routing Client
//!
//! 生產資料服務的 REST 客戶端：途程表以非同步並行抓取，
//! 報工紀錄與補充資料以阻塞式查詢供引擎逐張途程表使用

pub mod config;
pub mod erp;
pub mod fetcher;
pub mod wire;

// Re-export 主要類型
pub use config::ServiceConfig;
pub use erp::ErpClient;
pub use fetcher::{fetch_all, fetch_open_tables, ProductionCenterClient};
