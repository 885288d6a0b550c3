// ==========================================
// 物流管理系统 - 应用配置
// ==========================================

use crate::db::DEFAULT_BUSY_TIMEOUT_MS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 环境变量名
pub mod config_env {
    /// JSON 配置文件路径
    pub const CONFIG_FILE: &str = "LMIS_CONFIG";
    /// 数据库文件路径
    pub const DB_PATH: &str = "LMIS_DB_PATH";
    /// busy_timeout（毫秒）
    pub const BUSY_TIMEOUT_MS: &str = "LMIS_BUSY_TIMEOUT_MS";
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件解析失败 ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("配置项无效 (key={key}): {message}")]
    InvalidValue { key: String, message: String },
}

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite 数据库文件路径
    pub db_path: String,
    /// 连接 busy_timeout（毫秒）
    pub busy_timeout_ms: u64,
    /// RUST_LOG 未设置时的日志过滤器
    pub log_filter: String,
    /// 是否输出 JSON 日志
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: get_default_db_path(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            log_filter: "info".to_string(),
            log_json: false,
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置（缺省字段取默认值）
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// 按 配置文件 → 环境变量 → 默认值 的顺序解析配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match non_empty_env(config_env::CONFIG_FILE) {
            Some(path) => Self::from_json_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(
            non_empty_env(config_env::DB_PATH),
            non_empty_env(config_env::BUSY_TIMEOUT_MS),
        )?;
        Ok(config)
    }

    /// 应用环境变量覆写
    fn apply_overrides(
        &mut self,
        db_path: Option<String>,
        busy_timeout_ms: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(path) = db_path {
            self.db_path = path;
        }
        if let Some(raw) = busy_timeout_ms {
            self.busy_timeout_ms = raw.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    key: config_env::BUSY_TIMEOUT_MS.to_string(),
                    message: e.to_string(),
                }
            })?;
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 获取默认数据库路径
///
/// 优先使用用户数据目录；开发构建使用独立目录，避免污染生产数据。
/// 仅计算路径，目录在打开数据库时创建（见 `db::ensure_db_parent_dir`）
pub fn get_default_db_path() -> String {
    let path = match dirs::data_dir() {
        Some(data_dir) => {
            #[cfg(debug_assertions)]
            let dir = data_dir.join("lmis-logistics-dev");
            #[cfg(not(debug_assertions))]
            let dir = data_dir.join("lmis-logistics");
            dir.join("lmis_logistics.db")
        }
        None => PathBuf::from("./lmis_logistics.db"),
    };

    path.to_string_lossy().to_string()
}
