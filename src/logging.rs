// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 口径: 引擎内只打点 (debug!/warn!/info!), 订阅器由调用方装配;
//       本模块提供默认装配入口
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

// 默认过滤器: 引擎解析趟的 debug 打点量大, 默认只放行 info 以上
const DEFAULT_FILTER: &str = "info";

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   排查成本解析时可用 RUST_LOG=escandallo_engine::engine=debug
///
/// # 示例
/// ```no_run
/// escandallo_engine::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// 初始化测试环境的日志系统
///
/// debug 级别 + 测试捕获 writer; 重复调用安全 (try_init)
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("escandallo_engine=debug"))
        .with_test_writer()
        .try_init();
}
