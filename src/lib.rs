//! # WO Tracker
//!
//! 工單途程狀態追蹤：命令列入口的配置、日誌與執行流程

pub mod app;
pub mod cli;
pub mod config;
pub mod logging;

// Re-export 主要類型
pub use app::{analyze_outcomes, assemble_journal, run_journal, run_update, JournalReport};
pub use config::{AppConfig, OutputPaths};
