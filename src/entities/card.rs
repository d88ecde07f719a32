//! 卡片实体
//!
//! 只声明各种卡片共有的字段，具体题型的评分规则不在此实现

use crate::entities::entity::{versioned_meta, Versioned};
use crate::model::{string_field, ModelKind, ModelMeta};
use crate::validation::Validator;
use once_cell::sync::Lazy;

/// 支持的卡片种类
pub const CARD_KINDS: [&str; 6] = ["video", "page", "choice", "number", "formula", "writing"];

static CARD_META: Lazy<ModelMeta> = Lazy::new(|| {
    versioned_meta("cards")
        .field(string_field("unit_id").required())
        .field(string_field("body").required())
        .field(
            string_field("kind")
                .required()
                .validator(Validator::one_of(CARD_KINDS)),
        )
});

/// 卡片
pub struct Card;

impl ModelKind for Card {
    fn meta() -> &'static ModelMeta {
        &CARD_META
    }
}

impl Versioned for Card {}
