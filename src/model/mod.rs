//! 模型定义系统模块
//!
//! 以静态声明的元数据驱动文档模型：字段校验、访问控制、默认值、持久化前转换，
//! 以及基于存储网关的持久化生命周期

pub mod convenience;
pub mod field_types;
pub mod instance;
pub mod manager;
pub mod traits;

pub use convenience::*;
pub use field_types::{
    AccessTier, DefaultValue, FieldAccess, FieldDefinition, ModelMeta,
};
pub use instance::Model;
pub use manager::ModelManager;
pub use traits::ModelKind;
