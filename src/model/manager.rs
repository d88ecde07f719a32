//! ModelManager 实现模块
//!
//! 提供模型的持久化生命周期：校验、插入、更新、保存、删除与查询。
//! 每个操作都显式接收存储网关，校验错误作为数据返回，存储错误原样向上传播。

use crate::adapter::StorageGateway;
use crate::error::CatalogResult;
use crate::quick_error;
use crate::model::instance::Model;
use crate::model::traits::ModelKind;
use crate::types::*;
use crate::validation::{FieldError, Message};
use std::marker::PhantomData;
use rat_logger::{debug, info, warn};

/// 模型管理器
///
/// 提供集合级别的操作：构造并插入、按条件查询
pub struct ModelManager<K: ModelKind> {
    _phantom: PhantomData<fn() -> K>,
}

impl<K: ModelKind> ModelManager<K> {
    /// 从部分数据构造实例并插入
    ///
    /// 校验失败时不写入存储，但仍返回实例供调用方检查
    pub async fn insert(
        storage: &dyn StorageGateway,
        data: Record,
    ) -> CatalogResult<(Model<K>, Vec<FieldError>)> {
        let mut model = Model::<K>::from_record(data);
        // 先固定 id，使唯一性检查与写入使用同一个值
        model.get_field("id");

        let errors = model.validate(storage).await?;
        if !errors.is_empty() {
            debug!("插入校验失败: collection={}, 错误数量={}", K::collection_name(), errors.len());
            return Ok((model, errors));
        }

        let bundle = model.bundle();
        storage.insert(K::collection_name(), &bundle).await?;
        model.adopt(&bundle);
        info!("插入记录: collection={}, id={:?}", K::collection_name(), model.id());
        Ok((model, errors))
    }

    /// 返回第一条匹配的记录
    pub async fn get(storage: &dyn StorageGateway, filter: Filter) -> CatalogResult<Option<Model<K>>> {
        debug!("查找模型: collection={}, 条件={:?}", K::collection_name(), filter.conditions());
        let found = storage
            .get_by_filter(K::collection_name(), filter.conditions())
            .await?;
        Ok(found.map(Model::from_record))
    }

    /// 返回全部匹配的记录，空过滤器返回整个集合
    pub async fn list(storage: &dyn StorageGateway, filter: Filter) -> CatalogResult<Vec<Model<K>>> {
        debug!("列出模型: collection={}, 条件={:?}", K::collection_name(), filter.conditions());
        let records = storage
            .list_by_filter(K::collection_name(), filter.conditions())
            .await?;
        Ok(records.into_iter().map(Model::from_record).collect())
    }
}

impl<K: ModelKind> Model<K> {
    /// 字段校验加唯一性检查
    ///
    /// 唯一性只检查当前存在的值，且与字段自身的校验结果无关，两种错误可能同时出现
    pub async fn validate(&self, storage: &dyn StorageGateway) -> CatalogResult<Vec<FieldError>> {
        let mut errors = self.validate_fields();
        for field in K::meta().unique_fields() {
            let Some(value) = self.peek_field(&field.name) else {
                continue;
            };
            let taken = storage
                .exists_excluding(K::collection_name(), &field.name, value, self.id())
                .await?;
            if taken {
                errors.push(FieldError::new(&field.name, Message::new("validation.unique")));
            }
        }
        Ok(errors)
    }

    /// 合并部分数据后校验并覆盖存储中的记录
    ///
    /// 校验失败时内存中的合并结果保留，存储不变。
    /// 存储中没有该记录（从未插入或已删除）时返回查询错误
    pub async fn update(
        mut self,
        storage: &dyn StorageGateway,
        partial: Record,
    ) -> CatalogResult<(Self, Vec<FieldError>)> {
        self.merge(partial);
        self.get_field("id");

        let errors = self.validate(storage).await?;
        if !errors.is_empty() {
            debug!("更新校验失败: collection={}, 错误数量={}", K::collection_name(), errors.len());
            return Ok((self, errors));
        }

        let bundle = self.bundle();
        let id = self.id().unwrap_or_default().to_string();
        if !storage.update(K::collection_name(), &id, &bundle).await? {
            warn!("更新的记录不存在: collection={}, id={}", K::collection_name(), id);
            return Err(quick_error!(
                query,
                format!("集合 {} 中不存在 id 为 {} 的记录", K::collection_name(), id)
            ));
        }
        self.adopt(&bundle);
        info!("更新记录: collection={}, id={}", K::collection_name(), id);
        Ok((self, errors))
    }

    /// 校验后按 id 写入：不存在则插入，存在则覆盖
    pub async fn save(mut self, storage: &dyn StorageGateway) -> CatalogResult<(Self, Vec<FieldError>)> {
        self.get_field("id");

        let errors = self.validate(storage).await?;
        if !errors.is_empty() {
            debug!("保存校验失败: collection={}, 错误数量={}", K::collection_name(), errors.len());
            return Ok((self, errors));
        }

        let bundle = self.bundle();
        let id = self.id().unwrap_or_default().to_string();
        let existing = storage
            .get_by_filter(K::collection_name(), Filter::by_id(id.as_str()).conditions())
            .await?;
        if existing.is_some() {
            if !storage.update(K::collection_name(), &id, &bundle).await? {
                warn!("保存时记录已被删除: collection={}, id={}", K::collection_name(), id);
                return Err(quick_error!(
                    query,
                    format!("集合 {} 中不存在 id 为 {} 的记录", K::collection_name(), id)
                ));
            }
        } else {
            storage.insert(K::collection_name(), &bundle).await?;
        }
        self.adopt(&bundle);
        info!("保存记录: collection={}, id={}", K::collection_name(), id);
        Ok((self, errors))
    }

    /// 删除存储中的记录，内存数据保持不变
    pub async fn delete(&self, storage: &dyn StorageGateway) -> CatalogResult<bool> {
        let Some(id) = self.id() else {
            return Ok(false);
        };
        let deleted = storage.delete(K::collection_name(), id).await?;
        info!("删除记录: collection={}, id={}, 结果={}", K::collection_name(), id, deleted);
        Ok(deleted)
    }
}
