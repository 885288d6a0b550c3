// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、基础数据写入等功能
// ==========================================

#![allow(dead_code)]

use lmis_logistics::config::AppConfig;
use lmis_logistics::{AppState, Distribution, Facility};
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 AppState
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - AppState: 基于该文件的应用状态
pub fn create_test_state() -> Result<(NamedTempFile, AppState), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let config = AppConfig {
        db_path,
        busy_timeout_ms: 1_000,
        log_filter: "debug".to_string(),
        log_json: false,
    };
    let state = AppState::new(&config)?;

    Ok((temp_file, state))
}

/// 写入一个机构和一个 INITIATED 配送
///
/// # 返回
/// (facility_id, distribution_id)
pub fn seed_facility_and_distribution(state: &AppState, facility_code: &str) -> (i64, i64) {
    let facility_id = state
        .facility_repo
        .insert(&Facility::new(facility_code, format!("{} 诊所", facility_code)))
        .unwrap();
    let distribution_id = state
        .distribution_repo
        .insert(&Distribution::initiated(1, 1, facility_id).with_audit(1))
        .unwrap();
    (facility_id, distribution_id)
}
