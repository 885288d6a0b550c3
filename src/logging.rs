// ==========================================
// 物流管理系统 - 日志
// ==========================================
// 过滤器优先取 RUST_LOG，其次取配置项 log_filter
// 输出格式: 文本（默认）/ JSON（log_json = true）
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

fn resolve_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// 文本格式日志，带 target 与行号
///
/// ```no_run
/// lmis_logistics::logging::init("lmis_logistics=debug,info");
/// ```
pub fn init(default_filter: &str) {
    fmt()
        .with_env_filter(resolve_filter(default_filter))
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// JSON 格式日志，每行一个事件
pub fn init_json(default_filter: &str) {
    fmt().json().with_env_filter(resolve_filter(default_filter)).init();
}

/// 测试用：debug 级别，输出到测试捕获；重复调用无副作用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
