//! 日誌初始化

use tracing_subscriber::EnvFilter;

/// 安裝全域 subscriber（`RUST_LOG` 控制層級，預設 info）
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// 測試用：輸出交給測試框架，可重複呼叫
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
