//! 通用数据类型
//!
//! 定义与存储无关的值类型、记录、查询条件以及实体引用

pub mod data_value;
pub mod entity_ref;
pub mod query;

use std::collections::BTreeMap;

pub use data_value::DataValue;
pub use entity_ref::{EntityKind, EntityReference};
pub use query::{Filter, QueryCondition, QueryOperator};

/// 一条文档记录：字段名到值的有序映射
pub type Record = BTreeMap<String, DataValue>;
