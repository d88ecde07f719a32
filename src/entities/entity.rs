//! 版本化实体基础字段
//!
//! 单元、集合与卡片共享这一组字段。`entity_id` 在各版本之间保持不变，
//! 每次修改都会产生一条新的记录，`previous_id` 指向上一版本的 id。

use crate::model::{
    boolean_field, generate_id, language_field, string_field, string_list_field, ModelKind,
    ModelMeta,
};
use crate::types::DataValue;

/// 版本化实体
///
/// 实体引用与图遍历都按 `entity_id` 寻址
pub trait Versioned: ModelKind {}

/// 创建包含版本化基础字段的模型元数据
pub fn versioned_meta(collection_name: &str) -> ModelMeta {
    ModelMeta::new(collection_name)
        .field(string_field("entity_id").default_with(|| DataValue::String(generate_id())))
        .field(string_field("previous_id"))
        .field(language_field("language").required().default_value("en"))
        .field(string_field("name").required())
        .field(boolean_field("accepted").default_value(false))
        .field(string_list_field("tags").default_value(DataValue::Array(Vec::new())))
}
