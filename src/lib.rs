//! rat_catalog - 学习目录的文档模型层
//!
//! 以静态声明的元数据驱动文档模型的校验、访问控制与持久化，
//! 并提供集合成员关系的批量图遍历。存储通过网关抽象，内置内存与MongoDB实现。

// 导出所有公共模块
pub mod error;
pub mod types;
pub mod validation;
pub mod model;
pub mod adapter;
pub mod entities;
pub mod graph;
pub mod config;
pub mod security;
pub mod i18n;

// 重新导出常用类型和函数
pub use error::{CatalogError, CatalogResult};
pub use types::*;
pub use validation::{FieldError, Message, Validator};
pub use model::{
    AccessTier, FieldAccess, FieldDefinition, Model, ModelKind, ModelManager, ModelMeta,
    generate_id,
};
pub use adapter::{MemoryGateway, StorageGateway, create_gateway};
#[cfg(feature = "mongodb-support")]
pub use adapter::MongoGateway;
pub use entities::{Card, Set, Topic, Unit, User, Versioned};
pub use config::{CatalogConfig, CatalogConfigBuilder, StorageConfig};

use std::sync::Arc;

// 日志系统导入
use rat_logger::info;

// 条件编译调试宏 - 只有在 debug 模式下才输出调试信息
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        rat_logger::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        // 在 release 模式下不输出调试信息
    };
}

/// 初始化rat_catalog库
///
/// 注册多语言消息，语言取自环境变量 RAT_LANG 或 LANG
///
/// 注意：日志系统由调用者自行初始化
pub fn init() {
    i18n::ErrorMessageI18n::init();
}

/// 按配置初始化：设置消息语言并创建存储网关
pub async fn init_with_config(config: &CatalogConfig) -> CatalogResult<Arc<dyn StorageGateway>> {
    i18n::ErrorMessageI18n::init_with_language(&config.language);
    let gateway = create_gateway(&config.storage).await?;
    info!("{} 已初始化: 存储网关={}, 语言={}", get_info(), gateway.gateway_name(), config.language);
    Ok(gateway)
}

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 获取库信息
pub fn get_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
