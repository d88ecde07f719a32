//! 错误类型定义
//!
//! 基础设施错误（存储不可达、过滤条件非法、配置错误等）通过 `CatalogError` 传播。
//! 模型字段校验错误不在此列，它们作为数据（`FieldError`）返回，见 `validation` 模块。

use thiserror::Error;

/// 基础设施错误
#[derive(Error, Debug)]
pub enum CatalogError {
    /// 存储连接错误
    #[error("存储连接失败: {message}")]
    ConnectionError { message: String },

    /// 查询执行错误（包括非法的过滤条件）
    #[error("查询执行失败: {message}")]
    QueryError { message: String },

    /// 序列化错误
    #[error("数据序列化失败: {message}")]
    SerializationError { message: String },

    /// 配置错误
    #[error("配置错误: {message}")]
    ConfigError { message: String },

    /// 标识符或配置项校验错误
    ///
    /// 仅用于集合名、字段名等内部校验，模型字段校验从不以此形式返回
    #[error("校验失败: {field} - {message}")]
    ValidationError { field: String, message: String },

    /// IO 错误
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 其他错误
    #[error("{0}")]
    Other(String),
}

/// 结果类型别名
pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::SerializationError {
            message: e.to_string(),
        }
    }
}

impl CatalogError {
    /// 是否为存储层错误（连接或查询）
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            CatalogError::ConnectionError { .. } | CatalogError::QueryError { .. }
        )
    }
}

/// 快速构建错误的宏
///
/// ```ignore
/// quick_error!(connection, "无法连接");
/// quick_error!(query, format!("非法字段: {}", name));
/// quick_error!(validation, "collection", "集合名不能为空");
/// ```
#[macro_export]
macro_rules! quick_error {
    (connection, $msg:expr) => {
        $crate::error::CatalogError::ConnectionError {
            message: $msg.to_string(),
        }
    };
    (query, $msg:expr) => {
        $crate::error::CatalogError::QueryError {
            message: $msg.to_string(),
        }
    };
    (serialization, $msg:expr) => {
        $crate::error::CatalogError::SerializationError {
            message: $msg.to_string(),
        }
    };
    (config, $msg:expr) => {
        $crate::error::CatalogError::ConfigError {
            message: $msg.to_string(),
        }
    };
    (validation, $field:expr, $msg:expr) => {
        $crate::error::CatalogError::ValidationError {
            field: $field.to_string(),
            message: $msg.to_string(),
        }
    };
    (other, $msg:expr) => {
        $crate::error::CatalogError::Other($msg.to_string())
    };
}
