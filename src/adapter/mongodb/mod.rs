//! MongoDB存储网关
//!
//! - mod.rs: 网关结构与 StorageGateway 实现
//! - utils.rs: BSON数据转换与过滤文档构建

mod utils;

use crate::adapter::StorageGateway;
use crate::error::CatalogResult;
use crate::quick_error;
use crate::security::IdentifierValidator;
use crate::types::*;
use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection, Database};
use rat_logger::{debug, error, info};

/// MongoDB存储网关
#[derive(Clone, Debug)]
pub struct MongoGateway {
    db: Database,
}

impl MongoGateway {
    /// 连接MongoDB
    pub async fn connect(uri: &str, database: &str) -> CatalogResult<Self> {
        let client = Client::with_uri_str(uri).await.map_err(|e| {
            error!("MongoDB连接失败: {}", e);
            quick_error!(connection, format!("MongoDB连接失败: {}", e))
        })?;
        info!("已连接MongoDB数据库: {}", database);
        Ok(Self::from_database(client.database(database)))
    }

    /// 使用已有的数据库句柄创建网关
    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self, collection: &str) -> CatalogResult<Collection<Document>> {
        IdentifierValidator::validate_collection_name(collection)?;
        Ok(self.db.collection(collection))
    }

    fn filter(conditions: &[QueryCondition]) -> CatalogResult<Document> {
        IdentifierValidator::validate_conditions(conditions)?;
        utils::build_filter(conditions)
    }
}

fn query_failed(operation: &str, e: mongodb::error::Error) -> crate::error::CatalogError {
    error!("MongoDB{}失败: {}", operation, e);
    quick_error!(query, format!("MongoDB{}失败: {}", operation, e))
}

#[async_trait]
impl StorageGateway for MongoGateway {
    async fn insert(&self, collection: &str, record: &Record) -> CatalogResult<()> {
        let coll = self.collection(collection)?;
        let doc = utils::record_to_document(record);
        debug!("执行MongoDB插入到集合 {}: {:?}", collection, doc);
        coll.insert_one(doc, None)
            .await
            .map_err(|e| query_failed("插入", e))?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, record: &Record) -> CatalogResult<bool> {
        let coll = self.collection(collection)?;
        let mut replacement = utils::record_to_document(record);
        // _id 不可修改
        replacement.remove("_id");
        let result = coll
            .replace_one(doc! { "_id": id }, replacement, None)
            .await
            .map_err(|e| query_failed("更新", e))?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, collection: &str, id: &str) -> CatalogResult<bool> {
        let coll = self.collection(collection)?;
        let result = coll
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| query_failed("删除", e))?;
        Ok(result.deleted_count > 0)
    }

    async fn get_by_filter(
        &self,
        collection: &str,
        conditions: &[QueryCondition],
    ) -> CatalogResult<Option<Record>> {
        let coll = self.collection(collection)?;
        let filter = Self::filter(conditions)?;
        debug!("执行MongoDB单条查询: collection={}, filter={:?}", collection, filter);
        let found = coll
            .find_one(filter, None)
            .await
            .map_err(|e| query_failed("查询", e))?;
        Ok(found.as_ref().map(utils::document_to_record))
    }

    async fn list_by_filter(
        &self,
        collection: &str,
        conditions: &[QueryCondition],
    ) -> CatalogResult<Vec<Record>> {
        let coll = self.collection(collection)?;
        let filter = Self::filter(conditions)?;
        debug!("执行MongoDB查询: collection={}, filter={:?}", collection, filter);

        let mut cursor = coll
            .find(filter, None)
            .await
            .map_err(|e| query_failed("查询", e))?;

        let mut records = Vec::new();
        while cursor.advance().await.map_err(|e| query_failed("游标遍历", e))? {
            let doc = cursor
                .deserialize_current()
                .map_err(|e| query_failed("文档反序列化", e))?;
            records.push(utils::document_to_record(&doc));
        }
        Ok(records)
    }

    async fn exists_excluding(
        &self,
        collection: &str,
        field: &str,
        value: &DataValue,
        excluded_id: Option<&str>,
    ) -> CatalogResult<bool> {
        let coll = self.collection(collection)?;
        let mut conditions = vec![QueryCondition::eq(field, value.clone())];
        if let Some(id) = excluded_id {
            conditions.push(QueryCondition::ne("id", id));
        }
        let filter = Self::filter(&conditions)?;
        let count = coll
            .count_documents(filter, None)
            .await
            .map_err(|e| query_failed("计数", e))?;
        Ok(count > 0)
    }

    fn gateway_name(&self) -> &'static str {
        "mongodb"
    }
}
