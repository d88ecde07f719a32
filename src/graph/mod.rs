//! 实体关系图解析
//!
//! 按层批量展开集合的成员关系：每层最多发出两次批量查询，
//! 往返次数取决于图的深度而不是节点数。已访问的节点不会再次展开，
//! 因此环状引用也能终止。指向不存在实体的引用直接跳过。

use crate::adapter::StorageGateway;
use crate::entities::{Set, Unit, Versioned};
use crate::error::CatalogResult;
use crate::model::{Model, ModelKind, ModelManager};
use crate::types::*;
use chrono::{DateTime, Utc};
use rat_logger::debug;
use std::collections::{HashMap, HashSet};

fn entity_id(record: &Record) -> Option<&str> {
    record.get("entity_id").and_then(DataValue::as_str)
}

fn created(record: &Record) -> Option<&DateTime<Utc>> {
    record.get("created").and_then(DataValue::as_datetime)
}

/// 同一 entity_id 的多个版本只保留创建时间最新的一条
fn latest_versions(records: Vec<Record>) -> Vec<Record> {
    let mut order: Vec<String> = Vec::new();
    let mut latest: HashMap<String, Record> = HashMap::new();
    for record in records {
        let Some(id) = entity_id(&record).map(str::to_string) else {
            continue;
        };
        let newer = match latest.get(&id) {
            Some(existing) => created(&record) > created(existing),
            None => {
                order.push(id.clone());
                true
            }
        };
        if newer {
            latest.insert(id, record);
        }
    }
    order
        .into_iter()
        .filter_map(|id| latest.remove(&id))
        .collect()
}

/// 按 entity_id 批量查询版本化实体，结果顺序不保证与输入一致
pub async fn list_by_entity_ids<K: Versioned>(
    storage: &dyn StorageGateway,
    ids: &[String],
) -> CatalogResult<Vec<Model<K>>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let condition = QueryCondition::in_list("entity_id", ids.iter().cloned());
    let records = storage
        .list_by_filter(K::collection_name(), &[condition])
        .await?;
    Ok(latest_versions(records)
        .into_iter()
        .map(Model::from_record)
        .collect())
}

/// 直接或经由嵌套集合包含指定单元的全部集合
///
/// 成员条件会匹配到历史版本，因此每层先取出候选集合的最新版本，
/// 再用最新版本的成员判断是否仍然包含当前层的引用
pub async fn list_by_unit_id(
    storage: &dyn StorageGateway,
    unit_id: &str,
) -> CatalogResult<Vec<Model<Set>>> {
    let mut found = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut frontier = vec![EntityReference::unit(unit_id)];
    let mut depth = 0;

    while !frontier.is_empty() {
        depth += 1;
        debug!("展开包含关系: unit={}, 层级={}, 引用数量={}", unit_id, depth, frontier.len());
        let layer: Vec<EntityReference> = std::mem::take(&mut frontier);
        let condition = QueryCondition::contains_any("members", layer.iter().cloned());
        let records = storage
            .list_by_filter(Set::collection_name(), &[condition])
            .await?;

        let candidates: Vec<String> = latest_versions(records)
            .iter()
            .filter_map(|record| entity_id(record).map(str::to_string))
            .filter(|id| !visited.contains(id))
            .collect();
        if candidates.is_empty() {
            break;
        }

        for set in list_by_entity_ids::<Set>(storage, &candidates).await? {
            let contains = set.members().iter().any(|member| layer.contains(member));
            let Some(id) = set.get_str("entity_id").map(str::to_string) else {
                continue;
            };
            if contains && visited.insert(id.clone()) {
                frontier.push(EntityReference::set(id));
                found.push(set);
            }
        }
    }

    Ok(found)
}

/// 集合包含的全部单元，包括嵌套集合中的单元以及它们的先修单元
pub async fn list_units(
    storage: &dyn StorageGateway,
    set: &Model<Set>,
) -> CatalogResult<Vec<Model<Unit>>> {
    let mut visited_sets: HashSet<String> = HashSet::new();
    let mut visited_units: HashSet<String> = HashSet::new();
    if let Some(id) = set.get_str("entity_id") {
        visited_sets.insert(id.to_string());
    }

    let (mut set_frontier, mut unit_frontier) = split_members(set);
    let mut units = Vec::new();
    let mut depth = 0;

    loop {
        let set_ids: Vec<String> = set_frontier
            .drain(..)
            .filter(|id| visited_sets.insert(id.clone()))
            .collect();
        let unit_ids: Vec<String> = unit_frontier
            .drain(..)
            .filter(|id| visited_units.insert(id.clone()))
            .collect();
        if set_ids.is_empty() && unit_ids.is_empty() {
            break;
        }

        depth += 1;
        debug!("展开集合成员: 层级={}, 集合数量={}, 单元数量={}", depth, set_ids.len(), unit_ids.len());
        let (sets, layer_units) = futures::future::try_join(
            list_by_entity_ids::<Set>(storage, &set_ids),
            list_by_entity_ids::<Unit>(storage, &unit_ids),
        )
        .await?;

        for nested in &sets {
            let (nested_sets, nested_units) = split_members(nested);
            set_frontier.extend(nested_sets);
            unit_frontier.extend(nested_units);
        }
        for unit in layer_units {
            unit_frontier.extend(unit.require_ids());
            units.push(unit);
        }
    }

    Ok(units)
}

/// 把成员分为集合 id 与单元 id，卡片成员不参与展开
fn split_members(set: &Model<Set>) -> (Vec<String>, Vec<String>) {
    let mut sets = Vec::new();
    let mut units = Vec::new();
    for member in set.members() {
        match member.kind {
            EntityKind::Set => sets.push(member.id),
            EntityKind::Unit => units.push(member.id),
            EntityKind::Card => {}
        }
    }
    (sets, units)
}

impl<K: Versioned> ModelManager<K> {
    /// 按 entity_id 批量查询
    pub async fn list_by_entity_ids(
        storage: &dyn StorageGateway,
        ids: &[String],
    ) -> CatalogResult<Vec<Model<K>>> {
        list_by_entity_ids::<K>(storage, ids).await
    }
}

impl ModelManager<Set> {
    /// 直接或间接包含指定单元的全部集合
    pub async fn list_by_unit_id(
        storage: &dyn StorageGateway,
        unit_id: &str,
    ) -> CatalogResult<Vec<Model<Set>>> {
        list_by_unit_id(storage, unit_id).await
    }
}

impl Model<Set> {
    /// 集合包含的全部单元
    pub async fn list_units(&self, storage: &dyn StorageGateway) -> CatalogResult<Vec<Model<Unit>>> {
        list_units(storage, self).await
    }
}
