//! 模型实例模块
//!
//! 模型实例是绑定到某个实体种类的可变文档，提供显式的字段访问接口、
//! 严格模式裁剪、字段校验、持久化表示（bundle）与对外表示（deliver）

use crate::model::field_types::AccessTier;
use crate::model::traits::ModelKind;
use crate::types::{DataValue, Record};
use crate::validation::FieldError;
use chrono::{SubsecRound, Utc};
use std::marker::PhantomData;

/// 模型实例
pub struct Model<K: ModelKind> {
    data: Record,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ModelKind> Clone for Model<K> {
    fn clone(&self) -> Self {
        Self::from_record(self.data.clone())
    }
}

impl<K: ModelKind> PartialEq for Model<K> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<K: ModelKind> std::fmt::Debug for Model<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("collection", &K::collection_name())
            .field("data", &self.data)
            .finish()
    }
}

impl<K: ModelKind> Default for Model<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ModelKind> From<Record> for Model<K> {
    fn from(record: Record) -> Self {
        Self::from_record(record)
    }
}

impl<K: ModelKind> Model<K> {
    /// 创建空实例
    pub fn new() -> Self {
        Self::from_record(Record::new())
    }

    /// 从部分数据创建实例，未声明的字段会被保留
    pub fn from_record(data: Record) -> Self {
        Self {
            data,
            _kind: PhantomData,
        }
    }

    /// 读取字段值，缺失时应用声明的默认值并写回
    pub fn get_field(&mut self, name: &str) -> Option<&DataValue> {
        let missing = self.data.get(name).map_or(true, DataValue::is_null);
        if missing {
            if let Some(value) = K::meta().get(name).and_then(|f| f.default_for()) {
                self.data.insert(name.to_string(), value);
            }
        }
        self.data.get(name).filter(|v| !v.is_null())
    }

    /// 读取原始字段值，不应用默认值
    pub fn peek_field(&self, name: &str) -> Option<&DataValue> {
        self.data.get(name).filter(|v| !v.is_null())
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<DataValue>) {
        self.data.insert(name.to_string(), value.into());
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.peek_field(name).is_some()
    }

    pub fn remove_field(&mut self, name: &str) -> Option<DataValue> {
        self.data.remove(name)
    }

    /// 读取 id，未生成时返回 None
    pub fn id(&self) -> Option<&str> {
        self.peek_field("id").and_then(DataValue::as_str)
    }

    /// 读取字符串字段
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.peek_field(name).and_then(DataValue::as_str)
    }

    /// 当前数据
    pub fn data(&self) -> &Record {
        &self.data
    }

    pub fn into_record(self) -> Record {
        self.data
    }

    /// 把部分数据合并进实例
    pub fn merge(&mut self, partial: Record) {
        self.data.extend(partial);
    }

    /// 删除所有未声明的字段
    pub fn enforce_strict_mode(&mut self) {
        let meta = K::meta();
        self.data.retain(|name, _| meta.contains(name));
    }

    /// 校验全部已声明字段，不访问存储
    ///
    /// 缺失的字段使用默认值参与校验，但默认值不会写回实例
    pub fn validate_fields(&self) -> Vec<FieldError> {
        K::meta()
            .fields
            .iter()
            .flat_map(|field| {
                let value = match self.peek_field(&field.name) {
                    Some(value) => Some(value.clone()),
                    None => field.default_for(),
                };
                field.validate(value.as_ref())
            })
            .collect()
    }

    /// 生成持久化表示：裁剪、补默认值、转换、写入时间戳
    pub fn bundle(&self) -> Record {
        let mut record = Record::new();
        for field in &K::meta().fields {
            let value = match self.peek_field(&field.name) {
                Some(value) => Some(value.clone()),
                None => field.default_for(),
            };
            if let Some(value) = value.filter(|v| !v.is_null()) {
                record.insert(field.name.clone(), field.apply_transform(value));
            }
        }

        // 存储端只保留毫秒精度，这里提前截断以保证读回的值一致
        let now = DataValue::DateTime(Utc::now().trunc_subsecs(3));
        record.insert("modified".to_string(), now.clone());
        record.entry("created".to_string()).or_insert(now);
        record
    }

    /// 生成对外表示：裁剪后按访问层级过滤
    pub fn deliver(&self, tier: AccessTier) -> Record {
        K::meta()
            .fields
            .iter()
            .filter(|field| field.access.visible_to(tier))
            .filter_map(|field| {
                self.peek_field(&field.name)
                    .map(|value| (field.name.clone(), value.clone()))
            })
            .collect()
    }

    /// 持久化成功后接收 bundle 中引擎生成的值
    ///
    /// 经过转换的字段保持调用方原值
    pub(crate) fn adopt(&mut self, bundle: &Record) {
        for field in &K::meta().fields {
            if field.transform.is_some() {
                continue;
            }
            if let Some(value) = bundle.get(&field.name) {
                self.data.insert(field.name.clone(), value.clone());
            }
        }
    }
}
