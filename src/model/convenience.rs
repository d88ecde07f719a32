//! 模型便捷函数模块
//!
//! 提供创建常用字段定义的便捷函数

use crate::model::field_types::FieldDefinition;
use crate::types::DataValue;
use crate::validation::Validator;
use rand::Rng;
use rand::distributions::Alphanumeric;

/// 自动生成的 id 长度
pub const ID_LENGTH: usize = 24;

/// 生成 24 位随机字母数字 id
pub fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LENGTH)
        .map(char::from)
        .collect()
}

/// 每个模型都具有的基础字段
pub(crate) fn base_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("id")
            .validator(Validator::String)
            .default_with(|| DataValue::String(generate_id())),
        // 时间戳只在持久化时写入
        FieldDefinition::new("created"),
        FieldDefinition::new("modified"),
    ]
}

/// 便捷函数：创建字符串字段
pub fn string_field(name: &str) -> FieldDefinition {
    FieldDefinition::new(name).validator(Validator::String)
}

/// 便捷函数：创建布尔字段
pub fn boolean_field(name: &str) -> FieldDefinition {
    FieldDefinition::new(name).validator(Validator::Boolean)
}

/// 便捷函数：创建数字字段
pub fn number_field(name: &str) -> FieldDefinition {
    FieldDefinition::new(name).validator(Validator::Number)
}

/// 便捷函数：创建列表字段
pub fn list_field(name: &str) -> FieldDefinition {
    FieldDefinition::new(name).validator(Validator::List)
}

/// 便捷函数：创建字符串列表字段
pub fn string_list_field(name: &str) -> FieldDefinition {
    FieldDefinition::new(name).validator(Validator::StringList)
}

/// 便捷函数：创建语言代码字段
pub fn language_field(name: &str) -> FieldDefinition {
    FieldDefinition::new(name).validator(Validator::Language)
}

/// 便捷函数：创建邮箱字段
pub fn email_field(name: &str) -> FieldDefinition {
    FieldDefinition::new(name).validator(Validator::Email)
}

/// 便捷函数：创建实体引用字段
pub fn entity_reference_field(name: &str) -> FieldDefinition {
    FieldDefinition::new(name).validator(Validator::EntityReference)
}

/// 便捷函数：创建实体引用列表字段
pub fn entity_reference_list_field(name: &str) -> FieldDefinition {
    FieldDefinition::new(name).validator(Validator::EntityReferenceList)
}
