// ==========================================
// 代课覆盖表系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换存储/导入错误为面向用户的错误消息
// ==========================================

use crate::domain::UnknownDurationError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 数据访问错误（硬错误，原因原样保留）
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 导入导出错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("文件导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::DatabaseError(format!("唯一约束违反: {}", msg))
            }
            err @ RepositoryError::ConfigValueError { .. } => ApiError::ConfigError(err.to_string()),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileWriteError(msg) => ApiError::ExportError(msg),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl From<UnknownDurationError> for ApiError {
    fn from(err: UnknownDurationError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
