// ==========================================
// 物流管理系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，保证外键约束在每个连接上生效
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供建库入口（migrations/v0.1_logistics_schema.sql）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::Path;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version（与 `migrations/v0.*.sql` 对齐）
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

const SCHEMA_SQL: &str = include_str!("../migrations/v0.1_logistics_schema.sql");

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    configure_sqlite_connection_with_timeout(conn, DEFAULT_BUSY_TIMEOUT_MS)
}

/// 配置 SQLite 连接（自定义 busy_timeout）
pub fn configure_sqlite_connection_with_timeout(
    conn: &Connection,
    busy_timeout_ms: u64,
) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
    Ok(())
}

/// 确保数据库文件所在目录存在
pub fn ensure_db_parent_dir(db_path: &str) -> std::io::Result<()> {
    match Path::new(db_path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

/// 初始化数据库结构（幂等，全部使用 IF NOT EXISTS）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    match read_schema_version(conn)? {
        Some(v) if v < CURRENT_SCHEMA_VERSION => {
            tracing::warn!(
                "数据库 schema_version={} 低于期望版本 {}，请执行迁移",
                v,
                CURRENT_SCHEMA_VERSION
            );
        }
        _ => {}
    }

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
