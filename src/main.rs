// ==========================================
// 物流管理系统 - 命令行入口
// ==========================================
// 职责: 加载配置 → 初始化日志 → 打开/初始化数据库 → 输出状态摘要(JSON)
// ==========================================

use std::process::ExitCode;

use lmis_logistics::config::AppConfig;
use lmis_logistics::{logging, AppState};

fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("配置加载失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if config.log_json {
        logging::init_json(&config.log_filter);
    } else {
        logging::init(&config.log_filter);
    }

    tracing::info!("==================================================");
    tracing::info!("{} 系统版本: {}", lmis_logistics::APP_NAME, lmis_logistics::VERSION);
    tracing::info!("==================================================");

    let state = match AppState::new(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("AppState初始化失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let schema_version = match state.schema_version() {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let summary = serde_json::json!({
        "app": lmis_logistics::APP_NAME,
        "version": lmis_logistics::VERSION,
        "db_path": state.db_path,
        "schema_version": schema_version,
        "busy_timeout_ms": config.busy_timeout_ms,
    });
    println!("{}", summary);

    ExitCode::SUCCESS
}
