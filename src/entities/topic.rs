//! 讨论主题实体

use crate::model::{entity_reference_field, string_field, ModelKind, ModelMeta};
use crate::validation::Validator;
use once_cell::sync::Lazy;

static TOPIC_META: Lazy<ModelMeta> = Lazy::new(|| {
    ModelMeta::new("topics")
        .field(string_field("user_id").required())
        .field(string_field("name").required().validator(Validator::MinLength(1)))
        .field(entity_reference_field("entity").required())
});

/// 讨论主题，挂在某个卡片、单元或集合上
pub struct Topic;

impl ModelKind for Topic {
    fn meta() -> &'static ModelMeta {
        &TOPIC_META
    }
}
