// ==========================================
// 物流管理系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository错误为调用方可理解的错误
// 分类: 输入错误 / 未找到 / 校验错误 / 存储错误
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 调用方错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    /// 约束违反（唯一/外键）
    #[error("存储错误: {0}")]
    StorageError(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 是否为存储层错误（约束违反或数据库故障）
    pub fn is_storage_error(&self) -> bool {
        matches!(self, ApiError::StorageError(_) | ApiError::DatabaseError(_))
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::StorageError(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::StorageError(format!("外键约束违反: {}", msg))
            }
            RepositoryError::DatabaseConnectionError(msg)
            | RepositoryError::DatabaseTransactionError(msg)
            | RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

/// 校验 id 为正整数
pub(crate) fn require_positive_id(field: &str, id: i64) -> ApiResult<()> {
    if id <= 0 {
        return Err(ApiError::InvalidInput(format!("{}必须为正整数: {}", field, id)));
    }
    Ok(())
}
