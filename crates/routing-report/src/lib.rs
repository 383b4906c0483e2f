//! # Routing Report
//!
//! 品質、完工、在製品與收貨報表的 CSV 輸出

pub mod text;
pub mod writer;

// Re-export 主要類型
pub use writer::{
    create_file, write_materials, write_processing, write_quality, write_wip, write_yields,
};
