//! MongoDB工具函数模块
//!
//! 包含BSON数据转换与查询条件转换的工具函数

use crate::error::CatalogResult;
use crate::quick_error;
use crate::types::*;
use mongodb::bson::{doc, Bson, Document};

/// 映射字段名，模型的 id 对应 MongoDB 的 _id
pub(crate) fn map_field_name(field_name: &str) -> &str {
    if field_name == "id" { "_id" } else { field_name }
}

/// 将DataValue转换为BSON值
pub(crate) fn data_value_to_bson(value: &DataValue) -> Bson {
    match value {
        DataValue::Null => Bson::Null,
        DataValue::Bool(b) => Bson::Boolean(*b),
        DataValue::Int(i) => Bson::Int64(*i),
        DataValue::UInt(u) => match i64::try_from(*u) {
            Ok(i) => Bson::Int64(i),
            Err(_) => Bson::Double(*u as f64),
        },
        DataValue::Float(f) => Bson::Double(*f),
        DataValue::String(s) => Bson::String(s.clone()),
        DataValue::DateTime(dt) => {
            Bson::DateTime(mongodb::bson::DateTime::from_system_time((*dt).into()))
        }
        DataValue::Json(json) => {
            // 尝试将JSON转换为BSON，失败时保存为字符串
            mongodb::bson::to_bson(json).unwrap_or_else(|_| Bson::String(json.to_string()))
        }
        DataValue::Array(arr) => Bson::Array(arr.iter().map(data_value_to_bson).collect()),
        DataValue::Object(obj) => {
            let mut bson_doc = Document::new();
            for (key, value) in obj {
                bson_doc.insert(key, data_value_to_bson(value));
            }
            Bson::Document(bson_doc)
        }
    }
}

/// 将BSON转换为DataValue
pub(crate) fn bson_to_data_value(bson: &Bson) -> DataValue {
    match bson {
        Bson::Null | Bson::Undefined => DataValue::Null,
        Bson::Boolean(b) => DataValue::Bool(*b),
        Bson::Int32(i) => DataValue::Int(*i as i64),
        Bson::Int64(i) => DataValue::Int(*i),
        Bson::Double(d) => DataValue::Float(*d),
        Bson::String(s) => DataValue::String(s.clone()),
        Bson::DateTime(dt) => DataValue::DateTime(chrono::DateTime::<chrono::Utc>::from(dt.to_system_time())),
        Bson::ObjectId(oid) => DataValue::String(oid.to_hex()),
        Bson::Array(arr) => DataValue::Array(arr.iter().map(bson_to_data_value).collect()),
        Bson::Document(doc) => DataValue::Object(
            doc.iter()
                .map(|(k, v)| (k.to_string(), bson_to_data_value(v)))
                .collect(),
        ),
        // 其他类型按扩展 JSON 保存
        other => DataValue::Json(other.clone().into_relaxed_extjson()),
    }
}

/// 将记录转换为Document，id 映射为 _id
pub(crate) fn record_to_document(record: &Record) -> Document {
    let mut doc = Document::new();
    for (key, value) in record {
        doc.insert(map_field_name(key), data_value_to_bson(value));
    }
    doc
}

/// 将Document转换为记录，_id 映射回 id
pub(crate) fn document_to_record(doc: &Document) -> Record {
    doc.iter()
        .map(|(key, value)| {
            let mapped_key = if key == "_id" { "id".to_string() } else { key.to_string() };
            (mapped_key, bson_to_data_value(value))
        })
        .collect()
}

/// 将单个查询条件转换为过滤文档
fn condition_to_document(condition: &QueryCondition) -> CatalogResult<Document> {
    let field = map_field_name(&condition.field);
    let value = data_value_to_bson(&condition.value);
    let filter = match condition.operator {
        QueryOperator::Eq => doc! { field: value },
        QueryOperator::Ne => doc! { field: { "$ne": value } },
        QueryOperator::In => match &condition.value {
            DataValue::Array(_) => doc! { field: { "$in": value } },
            other => {
                return Err(quick_error!(
                    query,
                    format!("In 操作符需要数组值，实际为 {}", other.type_name())
                ));
            }
        },
        QueryOperator::ContainsAny => match &condition.value {
            DataValue::Array(items)
                if !items.is_empty() && items.iter().all(|item| item.as_object().is_some()) =>
            {
                // 对象元素按字段匹配，避免依赖文档字段顺序
                let alternatives: Vec<Bson> = items.iter().map(data_value_to_bson).collect();
                doc! { field: { "$elemMatch": { "$or": alternatives } } }
            }
            DataValue::Array(_) => doc! { field: { "$in": value } },
            other => {
                return Err(quick_error!(
                    query,
                    format!("ContainsAny 操作符需要数组值，实际为 {}", other.type_name())
                ));
            }
        },
    };
    Ok(filter)
}

/// 将一组 AND 关系的查询条件转换为过滤文档
pub(crate) fn build_filter(conditions: &[QueryCondition]) -> CatalogResult<Document> {
    if conditions.is_empty() {
        return Ok(Document::new());
    }
    let clauses = conditions
        .iter()
        .map(|condition| condition_to_document(condition).map(Bson::Document))
        .collect::<CatalogResult<Vec<Bson>>>()?;
    Ok(doc! { "$and": clauses })
}
