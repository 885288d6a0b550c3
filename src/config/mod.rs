// ==========================================
// 物流管理系统 - 配置层
// ==========================================
// 职责: 解析运行配置（数据库路径、busy_timeout、日志过滤器）
// 来源: JSON 配置文件 (LMIS_CONFIG) → 环境变量覆写 → 默认值
// ==========================================

pub mod app_config;

// 重导出
pub use app_config::{config_env, get_default_db_path, AppConfig, ConfigError};
