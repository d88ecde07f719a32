use crate::types::data_value::DataValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 可被引用的实体种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// 卡片
    Card,
    /// 单元
    Unit,
    /// 集合
    Set,
}

impl EntityKind {
    /// 全部合法种类
    pub const ALL: [EntityKind; 3] = [EntityKind::Card, EntityKind::Unit, EntityKind::Set];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Card => "card",
            EntityKind::Unit => "unit",
            EntityKind::Set => "set",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "card" => Some(EntityKind::Card),
            "unit" => Some(EntityKind::Unit),
            "set" => Some(EntityKind::Set),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 实体引用 `{id, kind}`
///
/// `id` 指向被引用实体的 `entity_id`。只做结构校验，不检查被引用实体是否存在。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityReference {
    pub id: String,
    pub kind: EntityKind,
}

impl EntityReference {
    pub fn new(id: impl Into<String>, kind: EntityKind) -> Self {
        Self { id: id.into(), kind }
    }

    pub fn unit(id: impl Into<String>) -> Self {
        Self::new(id, EntityKind::Unit)
    }

    pub fn set(id: impl Into<String>) -> Self {
        Self::new(id, EntityKind::Set)
    }

    pub fn card(id: impl Into<String>) -> Self {
        Self::new(id, EntityKind::Card)
    }

    /// 从文档值解析，结构不合法时返回 None
    pub fn from_data_value(value: &DataValue) -> Option<Self> {
        let obj = value.as_object()?;
        let id = obj.get("id")?.as_str()?;
        let kind = EntityKind::parse(obj.get("kind")?.as_str()?)?;
        Some(Self::new(id, kind))
    }

    /// 从引用列表值中解析出全部合法引用，跳过不合法的元素
    pub fn list_from_data_value(value: Option<&DataValue>) -> Vec<Self> {
        value
            .and_then(|v| v.as_array())
            .map(|items| items.iter().filter_map(Self::from_data_value).collect())
            .unwrap_or_default()
    }
}

impl From<EntityReference> for DataValue {
    fn from(reference: EntityReference) -> Self {
        let mut obj = BTreeMap::new();
        obj.insert("id".to_string(), DataValue::String(reference.id));
        obj.insert(
            "kind".to_string(),
            DataValue::String(reference.kind.as_str().to_string()),
        );
        DataValue::Object(obj)
    }
}

impl From<&EntityReference> for DataValue {
    fn from(reference: &EntityReference) -> Self {
        reference.clone().into()
    }
}
