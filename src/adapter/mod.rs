//! 存储网关模块
//!
//! 提供统一的文档存储操作接口，屏蔽不同存储的实现差异。
//! 网关与模型元数据无关，只处理记录与查询条件。

use crate::config::StorageConfig;
use crate::error::CatalogResult;
use crate::types::*;
use async_trait::async_trait;
use std::sync::Arc;

mod memory;
#[cfg(feature = "mongodb-support")]
mod mongodb;

pub use memory::MemoryGateway;
#[cfg(feature = "mongodb-support")]
pub use mongodb::MongoGateway;

/// 存储网关trait，定义统一的存储操作接口
///
/// 所有条件之间是 AND 关系，空条件匹配集合中的全部记录
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// 写入新记录
    async fn insert(&self, collection: &str, record: &Record) -> CatalogResult<()>;

    /// 覆盖指定 id 的记录，记录不存在时返回 false
    async fn update(&self, collection: &str, id: &str, record: &Record) -> CatalogResult<bool>;

    /// 删除指定 id 的记录，记录不存在时返回 false
    async fn delete(&self, collection: &str, id: &str) -> CatalogResult<bool>;

    /// 查找第一条匹配的记录
    async fn get_by_filter(
        &self,
        collection: &str,
        conditions: &[QueryCondition],
    ) -> CatalogResult<Option<Record>>;

    /// 查找全部匹配的记录
    async fn list_by_filter(
        &self,
        collection: &str,
        conditions: &[QueryCondition],
    ) -> CatalogResult<Vec<Record>>;

    /// 是否存在 id 不等于 `excluded_id` 且 `field` 等于 `value` 的记录
    async fn exists_excluding(
        &self,
        collection: &str,
        field: &str,
        value: &DataValue,
        excluded_id: Option<&str>,
    ) -> CatalogResult<bool> {
        let mut conditions = vec![QueryCondition::eq(field, value.clone())];
        if let Some(id) = excluded_id {
            conditions.push(QueryCondition::ne("id", id));
        }
        Ok(self.get_by_filter(collection, &conditions).await?.is_some())
    }

    /// 获取网关名称
    fn gateway_name(&self) -> &'static str;
}

/// 根据存储配置创建网关
pub async fn create_gateway(config: &StorageConfig) -> CatalogResult<Arc<dyn StorageGateway>> {
    match config {
        StorageConfig::Memory => Ok(Arc::new(MemoryGateway::new())),
        #[cfg(feature = "mongodb-support")]
        StorageConfig::MongoDB { uri, database } => {
            Ok(Arc::new(MongoGateway::connect(uri, database).await?))
        }
        #[cfg(not(feature = "mongodb-support"))]
        StorageConfig::MongoDB { .. } => Err(crate::quick_error!(
            config,
            "MongoDB 支持未启用，请开启 mongodb-support 特性"
        )),
    }
}
