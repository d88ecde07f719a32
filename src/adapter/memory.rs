//! 内存存储网关
//!
//! 每个集合是一组按插入顺序保存的记录，集合之间通过 DashMap 并发访问

use crate::adapter::StorageGateway;
use crate::error::CatalogResult;
use crate::security::IdentifierValidator;
use crate::types::*;
use crate::{debug_log, quick_error};
use async_trait::async_trait;
use dashmap::DashMap;
use rat_logger::debug;

/// 内存存储网关
#[derive(Debug, Default)]
pub struct MemoryGateway {
    collections: DashMap<String, Vec<Record>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// 集合中的记录数
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|records| records.len())
            .unwrap_or(0)
    }

    fn matches(record: &Record, conditions: &[QueryCondition]) -> bool {
        conditions
            .iter()
            .all(|condition| condition.matches(record.get(&condition.field)))
    }

    fn record_id(record: &Record) -> Option<&str> {
        record.get("id").and_then(DataValue::as_str)
    }
}

#[async_trait]
impl StorageGateway for MemoryGateway {
    async fn insert(&self, collection: &str, record: &Record) -> CatalogResult<()> {
        IdentifierValidator::validate_collection_name(collection)?;
        let Some(id) = Self::record_id(record) else {
            return Err(quick_error!(query, "记录缺少字符串类型的 id"));
        };

        let mut records = self.collections.entry(collection.to_string()).or_default();
        if records.iter().any(|r| Self::record_id(r) == Some(id)) {
            return Err(quick_error!(query, format!("集合 {} 中已存在 id 为 {} 的记录", collection, id)));
        }
        debug_log!("内存网关插入记录: collection={}, id={}", collection, id);
        records.push(record.clone());
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, record: &Record) -> CatalogResult<bool> {
        IdentifierValidator::validate_collection_name(collection)?;
        let Some(mut records) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        match records.iter_mut().find(|r| Self::record_id(r) == Some(id)) {
            Some(existing) => {
                *existing = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> CatalogResult<bool> {
        IdentifierValidator::validate_collection_name(collection)?;
        let Some(mut records) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = records.len();
        records.retain(|r| Self::record_id(r) != Some(id));
        Ok(records.len() < before)
    }

    async fn get_by_filter(
        &self,
        collection: &str,
        conditions: &[QueryCondition],
    ) -> CatalogResult<Option<Record>> {
        IdentifierValidator::validate_collection_name(collection)?;
        IdentifierValidator::validate_conditions(conditions)?;
        Ok(self.collections.get(collection).and_then(|records| {
            records
                .iter()
                .find(|record| Self::matches(record, conditions))
                .cloned()
        }))
    }

    async fn list_by_filter(
        &self,
        collection: &str,
        conditions: &[QueryCondition],
    ) -> CatalogResult<Vec<Record>> {
        IdentifierValidator::validate_collection_name(collection)?;
        IdentifierValidator::validate_conditions(conditions)?;
        let found: Vec<Record> = self
            .collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| Self::matches(record, conditions))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        debug!("内存网关查询: collection={}, 条件数量={}, 结果数量={}", collection, conditions.len(), found.len());
        Ok(found)
    }

    fn gateway_name(&self) -> &'static str {
        "memory"
    }
}
