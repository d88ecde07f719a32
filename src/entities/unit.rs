//! 单元实体
//!
//! `require_ids` 列出先修单元的 `entity_id`

use crate::entities::entity::{versioned_meta, Versioned};
use crate::model::{string_field, string_list_field, Model, ModelKind, ModelMeta};
use once_cell::sync::Lazy;

static UNIT_META: Lazy<ModelMeta> = Lazy::new(|| {
    versioned_meta("units")
        .field(string_field("body").required())
        .field(string_list_field("require_ids"))
});

/// 单元
pub struct Unit;

impl ModelKind for Unit {
    fn meta() -> &'static ModelMeta {
        &UNIT_META
    }
}

impl Versioned for Unit {}

impl Model<Unit> {
    /// 先修单元的 entity_id，跳过非字符串元素
    pub fn require_ids(&self) -> Vec<String> {
        self.peek_field("require_ids")
            .and_then(|v| v.as_array())
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| id.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
