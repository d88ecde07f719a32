//! # 配置构建器模块
//!
//! 提供链式配置接口，任何必需项未设置都会在 build 时报错

use crate::config::core::{CatalogConfig, StorageConfig};
use crate::error::CatalogError;
use rat_logger::info;

/// 目录服务配置构建器
#[derive(Debug, Default)]
pub struct CatalogConfigBuilder {
    storage: Option<StorageConfig>,
    language: Option<String>,
}

impl CatalogConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置存储配置
    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.storage = Some(storage);
        self
    }

    /// 设置消息语言
    pub fn language<S: Into<String>>(mut self, language: S) -> Self {
        self.language = Some(language.into());
        self
    }

    /// 构建配置
    ///
    /// # 错误
    ///
    /// 如果任何必需的配置项未设置，将返回错误
    pub fn build(self) -> Result<CatalogConfig, CatalogError> {
        let storage = self
            .storage
            .ok_or_else(|| crate::quick_error!(config, "存储配置必须设置"))?;

        let language = self
            .language
            .ok_or_else(|| crate::quick_error!(config, "消息语言必须设置"))?;
        if language.trim().is_empty() {
            return Err(crate::quick_error!(config, "消息语言不能为空"));
        }

        if let StorageConfig::MongoDB { uri, database } = &storage {
            if uri.is_empty() {
                return Err(crate::quick_error!(config, "MongoDB连接字符串不能为空"));
            }
            if database.is_empty() {
                return Err(crate::quick_error!(config, "MongoDB数据库名不能为空"));
            }
        }

        info!("创建目录服务配置: 存储={:?}, 语言={}", storage, language);
        Ok(CatalogConfig { storage, language })
    }
}
