// ==========================================
// 代课覆盖表系统 - 存储层错误类型
// ==========================================
// 说明: 存储 I/O 错误为硬错误，原样向上传播，不做重试
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 存储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
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

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("UNIQUE") => {
                RepositoryError::UniqueConstraintViolation(msg)
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                RepositoryError::DatabaseQueryError(msg)
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
