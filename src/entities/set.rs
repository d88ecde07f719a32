//! 集合实体
//!
//! 集合通过 `members` 引用单元或其他集合

use crate::entities::entity::{versioned_meta, Versioned};
use crate::model::{entity_reference_list_field, string_field, Model, ModelKind, ModelMeta};
use crate::types::EntityReference;
use crate::validation::Validator;
use once_cell::sync::Lazy;

static SET_META: Lazy<ModelMeta> = Lazy::new(|| {
    versioned_meta("sets")
        .field(string_field("body").required())
        .field(
            entity_reference_list_field("members")
                .required()
                .validator(Validator::MinLength(1)),
        )
});

/// 集合
pub struct Set;

impl ModelKind for Set {
    fn meta() -> &'static ModelMeta {
        &SET_META
    }
}

impl Versioned for Set {}

impl Model<Set> {
    /// 结构合法的成员引用
    pub fn members(&self) -> Vec<EntityReference> {
        EntityReference::list_from_data_value(self.peek_field("members"))
    }
}
