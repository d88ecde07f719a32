//! 字段类型定义模块
//!
//! 定义模型字段的校验链、访问级别、默认值以及持久化前转换

use crate::types::DataValue;
use crate::validation::{FieldError, Validator};
use std::sync::Arc;

/// 字段访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAccess {
    /// 总是对外输出
    Public,
    /// 只在请求私有访问时输出
    Private,
    /// 从不对外输出（如密码）
    Hidden,
}

/// 调用方请求的访问层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessTier {
    #[default]
    Public,
    Private,
}

impl FieldAccess {
    /// 在给定访问层级下字段是否可见
    pub fn visible_to(&self, tier: AccessTier) -> bool {
        match self {
            FieldAccess::Public => true,
            FieldAccess::Private => tier == AccessTier::Private,
            FieldAccess::Hidden => false,
        }
    }
}

/// 默认值生成函数
pub type DefaultFn = Arc<dyn Fn() -> DataValue + Send + Sync>;

/// 持久化前转换函数，必须是幂等的
pub type TransformFn = Arc<dyn Fn(&DataValue) -> DataValue + Send + Sync>;

/// 字段默认值
#[derive(Clone)]
pub enum DefaultValue {
    /// 固定值
    Constant(DataValue),
    /// 每次读取时调用的生成函数
    Generator(DefaultFn),
}

impl DefaultValue {
    /// 产出一个默认值
    pub fn produce(&self) -> DataValue {
        match self {
            DefaultValue::Constant(value) => value.clone(),
            DefaultValue::Generator(generate) => generate(),
        }
    }
}

impl std::fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultValue::Constant(value) => write!(f, "Constant({})", value),
            DefaultValue::Generator(_) => write!(f, "Generator"),
        }
    }
}

/// 字段定义
#[derive(Clone)]
pub struct FieldDefinition {
    /// 字段名
    pub name: String,
    /// 按优先级排列的校验器
    pub validators: Vec<Validator>,
    /// 是否唯一
    pub unique: bool,
    /// 访问级别
    pub access: FieldAccess,
    /// 默认值
    pub default: Option<DefaultValue>,
    /// 持久化前转换
    pub transform: Option<TransformFn>,
}

impl std::fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("name", &self.name)
            .field("validators", &self.validators)
            .field("unique", &self.unique)
            .field("access", &self.access)
            .field("default", &self.default)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

impl FieldDefinition {
    /// 创建新的字段定义，默认公开、无校验器
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            validators: Vec::new(),
            unique: false,
            access: FieldAccess::Public,
            default: None,
            transform: None,
        }
    }

    /// 追加校验器
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// 设置为必填字段，`required` 总是排在校验链最前
    pub fn required(mut self) -> Self {
        if !self.is_required() {
            self.validators.insert(0, Validator::Required);
        }
        self
    }

    /// 设置为唯一字段
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// 只在私有访问时输出
    pub fn private(mut self) -> Self {
        self.access = FieldAccess::Private;
        self
    }

    /// 从不对外输出
    pub fn hidden(mut self) -> Self {
        self.access = FieldAccess::Hidden;
        self
    }

    /// 设置固定默认值
    pub fn default_value(mut self, value: impl Into<DataValue>) -> Self {
        self.default = Some(DefaultValue::Constant(value.into()));
        self
    }

    /// 设置默认值生成函数
    pub fn default_with<F>(mut self, generate: F) -> Self
    where
        F: Fn() -> DataValue + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Generator(Arc::new(generate)));
        self
    }

    /// 设置持久化前转换
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&DataValue) -> DataValue + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub fn is_required(&self) -> bool {
        self.validators
            .iter()
            .any(|v| matches!(v, Validator::Required))
    }

    /// 产出默认值，未声明时返回 None
    pub fn default_for(&self) -> Option<DataValue> {
        self.default.as_ref().map(DefaultValue::produce)
    }

    /// 按顺序执行校验链，在第一个失败的校验器处停止
    pub fn validate(&self, value: Option<&DataValue>) -> Vec<FieldError> {
        for validator in &self.validators {
            if let Some(violation) = validator.check(value) {
                return FieldError::from_violation(&self.name, violation);
            }
        }
        Vec::new()
    }

    /// 对存在的值执行转换
    pub fn apply_transform(&self, value: DataValue) -> DataValue {
        match (&self.transform, value.is_null()) {
            (Some(transform), false) => transform(&value),
            _ => value,
        }
    }
}

/// 模型元数据：一个集合对应的有序字段声明
#[derive(Debug, Clone)]
pub struct ModelMeta {
    /// 集合名
    pub collection_name: String,
    /// 字段定义，保持声明顺序
    pub fields: Vec<FieldDefinition>,
}

impl ModelMeta {
    /// 创建模型元数据，自动包含 `id`、`created`、`modified` 三个基础字段
    pub fn new(collection_name: &str) -> Self {
        Self {
            collection_name: collection_name.to_string(),
            fields: crate::model::convenience::base_fields(),
        }
    }

    /// 声明字段，同名字段会被替换
    pub fn field(mut self, definition: FieldDefinition) -> Self {
        match self.fields.iter_mut().find(|f| f.name == definition.name) {
            Some(existing) => *existing = definition,
            None => self.fields.push(definition),
        }
        self
    }

    /// 批量声明字段
    pub fn fields<I>(self, definitions: I) -> Self
    where
        I: IntoIterator<Item = FieldDefinition>,
    {
        definitions.into_iter().fold(self, |meta, def| meta.field(def))
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// 标记为唯一的字段
    pub fn unique_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.unique)
    }
}
