// ==========================================
// 物流管理系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 未找到 / 存储错误 (约束、连接、事务) / 校验错误
// ==========================================

use rusqlite::ffi;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    // ===== 数据质量错误 =====
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    /// 构造未找到错误
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        RepositoryError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// 是否为存储层错误（约束违反、连接/事务/查询失败）
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            RepositoryError::DatabaseConnectionError(_)
                | RepositoryError::LockError(_)
                | RepositoryError::DatabaseTransactionError(_)
                | RepositoryError::DatabaseQueryError(_)
                | RepositoryError::UniqueConstraintViolation(_)
                | RepositoryError::ForeignKeyViolation(_)
        )
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, msg) => {
                let msg = msg.unwrap_or_else(|| code.to_string());
                match code.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        RepositoryError::UniqueConstraintViolation(msg)
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => RepositoryError::ForeignKeyViolation(msg),
                    _ if msg.contains("UNIQUE") => RepositoryError::UniqueConstraintViolation(msg),
                    _ if msg.contains("FOREIGN KEY") => RepositoryError::ForeignKeyViolation(msg),
                    _ => RepositoryError::DatabaseQueryError(msg),
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE parent (id INTEGER PRIMARY KEY, code TEXT UNIQUE);
            CREATE TABLE child (id INTEGER PRIMARY KEY, parentId INTEGER NOT NULL REFERENCES parent(id));
            INSERT INTO parent (id, code) VALUES (1, 'A');
            "#,
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_unique_violation_is_classified() {
        let conn = setup();
        let err: RepositoryError = conn
            .execute("INSERT INTO parent (id, code) VALUES (2, 'A')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
        assert!(err.is_storage_error());
    }

    #[test]
    fn test_foreign_key_violation_is_classified() {
        let conn = setup();
        let err: RepositoryError = conn
            .execute("INSERT INTO child (parentId) VALUES (99)", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
        assert!(err.is_storage_error());
    }

    #[test]
    fn test_validation_is_not_storage_error() {
        let err = RepositoryError::ValidationError("x".to_string());
        assert!(!err.is_storage_error());
        assert!(!RepositoryError::not_found("Order", 1).is_storage_error());
    }
}
