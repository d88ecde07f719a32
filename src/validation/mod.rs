//! 字段校验器库
//!
//! 每个校验器都是纯函数 `(value, 参数) -> 消息 | 无`，错误以返回值形式给出，从不抛出。
//! 除 `required` 外，所有校验器在值缺失（不存在或为 null）时都视为通过，
//! 字段是否可选由字段描述中是否包含 `required` 决定。

use crate::types::{DataValue, EntityKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+").expect("邮箱正则表达式必须合法"));

/// 校验消息：消息键与占位符参数
///
/// 文本由 `i18n` 模块按当前语言渲染
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub key: String,
    pub params: Vec<(String, String)>,
}

impl Message {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// 读取占位符参数
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// 按当前语言渲染为可读文本
    pub fn render(&self) -> String {
        let params: Vec<(&str, &str)> = self
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        crate::i18n::render(&self.key, &params)
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// 列表校验器中单个元素的错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError {
    pub index: usize,
    pub message: Message,
}

/// 一次校验失败的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// 整个值不合法
    Value(Message),
    /// 列表中的若干元素不合法
    Items(Vec<ItemError>),
}

/// 返回给调用方的字段错误
///
/// 列表校验器产生的错误带有元素下标 `index`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub name: String,
    pub index: Option<usize>,
    pub message: Message,
}

impl FieldError {
    pub fn new(name: impl Into<String>, message: Message) -> Self {
        Self {
            name: name.into(),
            index: None,
            message,
        }
    }

    pub fn at(name: impl Into<String>, index: usize, message: Message) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
            message,
        }
    }

    /// 把一次校验失败展开为字段错误
    pub fn from_violation(name: &str, violation: Violation) -> Vec<FieldError> {
        match violation {
            Violation::Value(message) => vec![FieldError::new(name, message)],
            Violation::Items(items) => items
                .into_iter()
                .map(|item| FieldError::at(name, item.index, item.message))
                .collect(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]: {}", self.name, index, self.message),
            None => write!(f, "{}: {}", self.name, self.message),
        }
    }
}

/// 自定义校验函数，只在值存在时调用
pub type CheckFn = Arc<dyn Fn(&DataValue) -> Option<Message> + Send + Sync>;

/// 声明在字段描述中的校验器
///
/// 带参数的校验器在声明时就绑定了参数
#[derive(Clone)]
pub enum Validator {
    Required,
    Boolean,
    String,
    Number,
    List,
    Language,
    Email,
    MinLength(usize),
    OneOf(Vec<DataValue>),
    EntityReference,
    EntityReferenceList,
    StringList,
    Custom { name: &'static str, check: CheckFn },
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Validator::Required => write!(f, "Required"),
            Validator::Boolean => write!(f, "Boolean"),
            Validator::String => write!(f, "String"),
            Validator::Number => write!(f, "Number"),
            Validator::List => write!(f, "List"),
            Validator::Language => write!(f, "Language"),
            Validator::Email => write!(f, "Email"),
            Validator::MinLength(n) => write!(f, "MinLength({})", n),
            Validator::OneOf(options) => write!(f, "OneOf({:?})", options),
            Validator::EntityReference => write!(f, "EntityReference"),
            Validator::EntityReferenceList => write!(f, "EntityReferenceList"),
            Validator::StringList => write!(f, "StringList"),
            Validator::Custom { name, .. } => write!(f, "Custom({})", name),
        }
    }
}

impl Validator {
    /// 构造带选项的枚举校验器
    pub fn one_of<I, V>(options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DataValue>,
    {
        Validator::OneOf(options.into_iter().map(Into::into).collect())
    }

    /// 构造自定义校验器
    pub fn custom<F>(name: &'static str, check: F) -> Self
    where
        F: Fn(&DataValue) -> Option<Message> + Send + Sync + 'static,
    {
        Validator::Custom {
            name,
            check: Arc::new(check),
        }
    }

    /// 执行校验，`None` 与 `Some(Null)` 都视为缺失
    pub fn check(&self, value: Option<&DataValue>) -> Option<Violation> {
        let value = value.filter(|v| !v.is_null());
        match self {
            Validator::Required => is_required(value).map(Violation::Value),
            Validator::Boolean => value.and_then(is_boolean).map(Violation::Value),
            Validator::String => value.and_then(is_string).map(Violation::Value),
            Validator::Number => value.and_then(is_number).map(Violation::Value),
            Validator::List => value.and_then(is_list).map(Violation::Value),
            Validator::Language => value.and_then(is_language).map(Violation::Value),
            Validator::Email => value.and_then(is_email).map(Violation::Value),
            Validator::MinLength(n) => value
                .and_then(|v| has_min_length(v, *n))
                .map(Violation::Value),
            Validator::OneOf(options) => value
                .and_then(|v| is_one_of(v, options))
                .map(Violation::Value),
            Validator::EntityReference => value.and_then(is_entity_reference).map(Violation::Value),
            Validator::EntityReferenceList => value.and_then(is_entity_reference_list),
            Validator::StringList => value.and_then(is_string_list).map(Violation::Value),
            Validator::Custom { check, .. } => value.and_then(|v| check(v)).map(Violation::Value),
        }
    }
}

/// 值必须存在
pub fn is_required(value: Option<&DataValue>) -> Option<Message> {
    match value {
        None | Some(DataValue::Null) => Some(Message::new("validation.required")),
        Some(_) => None,
    }
}

pub fn is_boolean(value: &DataValue) -> Option<Message> {
    (!matches!(value, DataValue::Bool(_))).then(|| Message::new("validation.boolean"))
}

pub fn is_string(value: &DataValue) -> Option<Message> {
    (!matches!(value, DataValue::String(_))).then(|| Message::new("validation.string"))
}

pub fn is_number(value: &DataValue) -> Option<Message> {
    (!value.is_number()).then(|| Message::new("validation.number"))
}

pub fn is_list(value: &DataValue) -> Option<Message> {
    (!matches!(value, DataValue::Array(_))).then(|| Message::new("validation.list"))
}

/// ISO 639-1 语言代码：恰好两个字符
pub fn is_language(value: &DataValue) -> Option<Message> {
    match value {
        DataValue::String(s) if s.chars().count() == 2 => None,
        _ => Some(Message::new("validation.language")),
    }
}

pub fn is_email(value: &DataValue) -> Option<Message> {
    match value {
        DataValue::String(s) if EMAIL_PATTERN.is_match(s) => None,
        _ => Some(Message::new("validation.email")),
    }
}

/// 值为假值或长度小于 `length` 时报错；字符串按字符计，列表按元素计
pub fn has_min_length(value: &DataValue, length: usize) -> Option<Message> {
    let actual = match value {
        _ if value.is_falsy() => None,
        DataValue::String(s) => Some(s.chars().count()),
        DataValue::Array(arr) => Some(arr.len()),
        DataValue::Object(obj) => Some(obj.len()),
        _ => None,
    };
    match actual {
        Some(len) if len >= length => None,
        _ => Some(Message::new("validation.min_length").with_param("length", length.to_string())),
    }
}

/// 值必须在固定选项中
pub fn is_one_of(value: &DataValue, options: &[DataValue]) -> Option<Message> {
    if options.contains(value) {
        return None;
    }
    let options = options
        .iter()
        .map(|o| o.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Some(Message::new("validation.one_of").with_param("options", options))
}

/// 值必须是 `{id: 字符串, kind: card|unit|set}` 形式的映射
pub fn is_entity_reference(value: &DataValue) -> Option<Message> {
    let Some(obj) = value.as_object() else {
        return Some(Message::new("validation.entity_id"));
    };
    if !matches!(obj.get("id"), Some(DataValue::String(_))) {
        return Some(Message::new("validation.entity_id"));
    }
    match obj.get("kind").and_then(|k| k.as_str()).and_then(EntityKind::parse) {
        Some(_) => None,
        None => Some(Message::new("validation.entity_kind")),
    }
}

/// 对列表中每个元素执行实体引用校验，返回所有失败元素
pub fn is_entity_reference_list(value: &DataValue) -> Option<Violation> {
    let Some(items) = value.as_array() else {
        return Some(Violation::Value(Message::new("validation.list")));
    };
    let errors: Vec<ItemError> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            is_entity_reference(item).map(|message| ItemError { index, message })
        })
        .collect();
    (!errors.is_empty()).then_some(Violation::Items(errors))
}

/// 值必须是字符串列表
pub fn is_string_list(value: &DataValue) -> Option<Message> {
    let Some(items) = value.as_array() else {
        return Some(Message::new("validation.list"));
    };
    items
        .iter()
        .find(|item| !matches!(item, DataValue::String(_)))
        .map(|_| Message::new("validation.string"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(value: serde_json::Value) -> DataValue {
        DataValue::from(value)
    }

    #[test]
    fn test_absent_values_pass_everything_but_required() {
        let validators = vec![
            Validator::Boolean,
            Validator::String,
            Validator::Number,
            Validator::List,
            Validator::Language,
            Validator::Email,
            Validator::MinLength(3),
            Validator::one_of(vec!["a", "b"]),
            Validator::EntityReference,
            Validator::EntityReferenceList,
            Validator::StringList,
        ];
        for validator in &validators {
            assert_eq!(validator.check(None), None, "{:?}", validator);
            assert_eq!(validator.check(Some(&DataValue::Null)), None, "{:?}", validator);
        }
        assert!(Validator::Required.check(None).is_some());
        assert!(Validator::Required.check(Some(&DataValue::Null)).is_some());
        assert!(Validator::Required.check(Some(&v(json!("")))).is_none());
    }

    #[test]
    fn test_type_checks() {
        assert!(is_boolean(&v(json!(true))).is_none());
        assert!(is_boolean(&v(json!("true"))).is_some());
        assert!(is_string(&v(json!("x"))).is_none());
        assert!(is_string(&v(json!(1))).is_some());
        assert!(is_number(&v(json!(1.5))).is_none());
        assert!(is_number(&v(json!(-3))).is_none());
        assert!(is_number(&v(json!("1"))).is_some());
        assert!(is_list(&v(json!([]))).is_none());
        assert!(is_list(&v(json!({}))).is_some());
    }

    #[test]
    fn test_language_and_email() {
        assert!(is_language(&v(json!("en"))).is_none());
        assert!(is_language(&v(json!("eng"))).is_some());
        assert!(is_language(&v(json!(12))).is_some());

        assert!(is_email(&v(json!("test@example.com"))).is_none());
        assert_eq!(
            is_email(&v(json!("open"))).map(|m| m.key),
            Some("validation.email".to_string())
        );
        assert!(is_email(&v(json!("a@b"))).is_some());
    }

    #[test]
    fn test_min_length_interpolates_length() {
        assert!(has_min_length(&v(json!("abcd1234")), 8).is_none());
        let message = has_min_length(&v(json!("abcd")), 8).unwrap();
        assert_eq!(message.key, "validation.min_length");
        assert_eq!(message.param("length"), Some("8"));
        // 假值总是失败，即使要求的长度为 0
        assert!(has_min_length(&v(json!("")), 0).is_some());
        assert!(has_min_length(&v(json!([])), 1).is_some());
        assert!(has_min_length(&v(json!([{"id": "A", "kind": "unit"}])), 1).is_none());
        assert!(has_min_length(&v(json!(42)), 1).is_some());
    }

    #[test]
    fn test_one_of_lists_options() {
        let options = vec![DataValue::from("video"), DataValue::from("choice")];
        assert!(is_one_of(&v(json!("video")), &options).is_none());
        let message = is_one_of(&v(json!("audio")), &options).unwrap();
        assert_eq!(message.param("options"), Some("video, choice"));
    }

    #[test]
    fn test_entity_reference() {
        assert!(is_entity_reference(&v(json!({"id": "A", "kind": "unit"}))).is_none());
        assert_eq!(
            is_entity_reference(&v(json!({"id": 1, "kind": "unit"}))).map(|m| m.key),
            Some("validation.entity_id".to_string())
        );
        assert_eq!(
            is_entity_reference(&v(json!({"id": "A", "kind": "topic"}))).map(|m| m.key),
            Some("validation.entity_kind".to_string())
        );
        assert_eq!(
            is_entity_reference(&v(json!("A"))).map(|m| m.key),
            Some("validation.entity_id".to_string())
        );
    }

    #[test]
    fn test_entity_reference_list_reports_every_bad_element() {
        let value = v(json!([
            {"id": "A", "kind": "unit"},
            {"id": "B"},
            {"id": "C", "kind": "set"},
            7
        ]));
        match is_entity_reference_list(&value) {
            Some(Violation::Items(items)) => {
                let indexes: Vec<usize> = items.iter().map(|i| i.index).collect();
                assert_eq!(indexes, vec![1, 3]);
            }
            other => panic!("意外的结果: {:?}", other),
        }
        assert!(is_entity_reference_list(&v(json!([{"id": "A", "kind": "set"}]))).is_none());
        assert!(matches!(
            is_entity_reference_list(&v(json!("A"))),
            Some(Violation::Value(_))
        ));
    }

    #[test]
    fn test_string_list() {
        assert!(is_string_list(&v(json!(["A", "B"]))).is_none());
        assert!(is_string_list(&v(json!(["A", 2]))).is_some());
        assert!(is_string_list(&v(json!("A"))).is_some());
    }

    #[test]
    fn test_custom_validator_is_skipped_on_absence() {
        let positive = Validator::custom("positive", |value| match value {
            DataValue::Int(i) if *i > 0 => None,
            _ => Some(Message::new("validation.invalid")),
        });
        assert!(positive.check(None).is_none());
        assert!(positive.check(Some(&DataValue::Int(3))).is_none());
        assert!(positive.check(Some(&DataValue::Int(-3))).is_some());
        assert_eq!(format!("{:?}", positive), "Custom(positive)");
    }

    #[test]
    fn test_field_error_expansion() {
        let errors = FieldError::from_violation(
            "members",
            Violation::Items(vec![
                ItemError { index: 0, message: Message::new("validation.entity_kind") },
                ItemError { index: 2, message: Message::new("validation.entity_id") },
            ]),
        );
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].name, "members");
        assert_eq!(errors[1].index, Some(2));
    }
}
