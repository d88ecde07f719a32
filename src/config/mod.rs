//! # 配置管理模块
//!
//! 提供存储与消息语言的配置，支持构建器模式与 TOML/JSON 文件

pub mod builders;
pub mod core;

pub use builders::CatalogConfigBuilder;
pub use core::{CatalogConfig, StorageConfig};
