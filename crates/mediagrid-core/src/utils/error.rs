//! MediaGrid 错误处理模块
//!
//! 定义应用程序错误类型

use serde::Serialize;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 媒体库不可用（连接断开、权限被撤销、查询语句错误）
    #[error("媒体库不可用: {0}")]
    StoreUnavailable(String),

    /// 分页大小无效
    #[error("分页大小无效: {0}")]
    InvalidPageSize(i64),

    /// 页码无效
    #[error("页码无效: {0}")]
    InvalidPageNumber(i64),

    /// 数据库错误
    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 通用错误
    #[error("{0}")]
    General(String),
}

impl AppError {
    /// 将任意底层错误包装为 `StoreUnavailable`
    pub fn store_unavailable(err: impl std::fmt::Display) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }

    /// 是否为运行时可恢复错误（调用方可以重试）
    ///
    /// 分页参数错误属于调用方编程错误，重试没有意义。
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            AppError::InvalidPageSize(_) | AppError::InvalidPageNumber(_)
        )
    }

    /// 错误码（用于 FFI 返回）
    pub fn code(&self) -> &'static str {
        match self {
            AppError::StoreUnavailable(_) => "E_STORE_UNAVAILABLE",
            AppError::InvalidPageSize(_) => "E_INVALID_PAGE_SIZE",
            AppError::InvalidPageNumber(_) => "E_INVALID_PAGE_NUMBER",
            AppError::Database(_) => "E_DB_ERROR",
            AppError::Io(_) => "E_IO_ERROR",
            AppError::Config(_) => "E_CONFIG",
            AppError::General(_) => "E_GENERAL",
        }
    }
}

/// 用于 FFI 返回的错误包装
#[derive(Debug, Clone, Serialize)]
pub struct CommandError {
    pub code: String,
    pub message: String,
}

impl From<AppError> for CommandError {
    fn from(err: AppError) -> Self {
        CommandError::from(&err)
    }
}

impl From<&AppError> for CommandError {
    fn from(err: &AppError) -> Self {
        CommandError {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        CommandError::from(self).serialize(serializer)
    }
}

/// 应用程序结果类型别名
pub type AppResult<T> = Result<T, AppError>;
