//! # 配置管理模块 - 核心配置类型
//!
//! 所有配置项必须显式设置，构建器不提供隐式默认值

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use rat_logger::info;
use std::path::Path;

/// 存储配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StorageConfig {
    /// 进程内存储，用于测试与嵌入场景
    #[serde(rename = "memory")]
    Memory,
    /// MongoDB，需要开启 `mongodb-support` 特性
    #[serde(rename = "mongodb")]
    MongoDB {
        /// 连接字符串
        uri: String,
        /// 数据库名
        database: String,
    },
}

/// 目录服务配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// 消息语言，如 zh-CN、en-US
    pub language: String,
    /// 存储配置
    pub storage: StorageConfig,
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("toml")
}

impl CatalogConfig {
    /// 创建配置构建器
    pub fn builder() -> super::builders::CatalogConfigBuilder {
        super::builders::CatalogConfigBuilder::new()
    }

    /// 从配置文件加载配置，按扩展名识别 TOML，其余按 JSON 解析
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, CatalogError> {
        let path = config_path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config: CatalogConfig = if is_toml(path) {
            toml::from_str(&content)
                .map_err(|e| crate::quick_error!(config, format!("解析TOML配置文件失败: {}", e)))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| crate::quick_error!(config, format!("解析JSON配置文件失败: {}", e)))?
        };

        info!("从文件加载配置: {:?}", path);
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, config_path: P) -> Result<(), CatalogError> {
        let path = config_path.as_ref();
        let content = if is_toml(path) {
            toml::to_string_pretty(self)
                .map_err(|e| crate::quick_error!(config, format!("序列化TOML配置失败: {}", e)))?
        } else {
            serde_json::to_string_pretty(self)
                .map_err(|e| crate::quick_error!(config, format!("序列化JSON配置失败: {}", e)))?
        };

        std::fs::write(path, content)?;

        info!("保存配置到文件: {:?}", path);
        Ok(())
    }
}
