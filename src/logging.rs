//! 日誌系統初始化
//!
//! 使用 tracing 與 tracing-subscriber，日誌級別由環境變數控制。

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日誌系統
///
/// # 環境變數
/// - RUST_LOG: 日誌級別過濾（預設: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=cost_calc=trace
///
/// # 範例
/// ```no_run
/// bom_cost::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // 重複初始化時保留既有 subscriber
    let initialized = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init()
        .is_ok();

    if initialized {
        tracing::debug!("日誌系統已初始化");
    }
}

/// 初始化測試環境的日誌系統
///
/// 使用 debug 級別並寫入測試輸出，可重複呼叫。
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
