use crate::types::data_value::DataValue;
use serde::{Deserialize, Serialize};

/// 查询条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryCondition {
    /// 字段名
    pub field: String,
    /// 操作符
    pub operator: QueryOperator,
    /// 值
    pub value: DataValue,
}

/// 查询操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryOperator {
    /// 等于（缺失字段视为 null）
    Eq,
    /// 不等于
    Ne,
    /// 在列表中，值必须为数组
    In,
    /// 数组字段与给定数组至少共享一个元素，值必须为数组
    ContainsAny,
}

impl QueryCondition {
    pub fn new(field: impl Into<String>, operator: QueryOperator, value: impl Into<DataValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// 相等条件
    pub fn eq(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self::new(field, QueryOperator::Eq, value)
    }

    /// 不等条件
    pub fn ne(field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        Self::new(field, QueryOperator::Ne, value)
    }

    /// 集合成员条件
    pub fn in_list<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DataValue>,
    {
        let values: Vec<DataValue> = values.into_iter().map(Into::into).collect();
        Self::new(field, QueryOperator::In, DataValue::Array(values))
    }

    /// 数组交集条件
    pub fn contains_any<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DataValue>,
    {
        let values: Vec<DataValue> = values.into_iter().map(Into::into).collect();
        Self::new(field, QueryOperator::ContainsAny, DataValue::Array(values))
    }

    /// 判断字段当前值是否满足条件
    pub fn matches(&self, actual: Option<&DataValue>) -> bool {
        let actual = actual.unwrap_or(&DataValue::Null);
        match self.operator {
            QueryOperator::Eq => actual == &self.value,
            QueryOperator::Ne => actual != &self.value,
            QueryOperator::In => match &self.value {
                DataValue::Array(candidates) => candidates.contains(actual),
                _ => false,
            },
            QueryOperator::ContainsAny => match (actual, &self.value) {
                (DataValue::Array(items), DataValue::Array(candidates)) => {
                    items.iter().any(|item| candidates.contains(item))
                }
                _ => false,
            },
        }
    }
}

/// 字段相等过滤器
///
/// `get`/`list` 使用的便捷构造器，最终展开为一组 AND 关系的 `QueryCondition`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<QueryCondition>,
}

impl Filter {
    /// 空过滤器，匹配集合中的全部记录
    pub fn new() -> Self {
        Self::default()
    }

    /// 按 id 过滤
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::new().eq("id", id.into())
    }

    /// 追加一个相等条件
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.conditions.push(QueryCondition::eq(field, value));
        self
    }

    /// 追加任意条件
    pub fn condition(mut self, condition: QueryCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[QueryCondition] {
        &self.conditions
    }

    pub fn into_conditions(self) -> Vec<QueryCondition> {
        self.conditions
    }
}
