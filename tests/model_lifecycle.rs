//! 模型生命周期集成测试
//!
//! 插入、更新、保存、删除、查询与访问控制，全部基于内存网关

use async_trait::async_trait;
use rat_catalog::entities::PASSWORD_SENTINEL;
use rat_catalog::*;
use serde_json::json;

fn record(value: serde_json::Value) -> Record {
    match DataValue::from(value) {
        DataValue::Object(record) => record,
        other => panic!("需要对象: {:?}", other),
    }
}

fn error_keys(errors: &[FieldError], name: &str) -> Vec<String> {
    errors
        .iter()
        .filter(|e| e.name == name)
        .map(|e| e.message.key.clone())
        .collect()
}

#[tokio::test]
async fn test_user_insert_hashes_password_in_storage_only() {
    let gateway = MemoryGateway::new();
    let (user, errors) = ModelManager::<User>::insert(
        &gateway,
        record(json!({"name": "test", "email": "test@example.com", "password": "abcd1234"})),
    )
    .await
    .unwrap();

    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(user.get_str("password"), Some("abcd1234"));
    assert!(user.has_field("created"));
    assert!(user.has_field("modified"));
    let id = user.id().unwrap().to_string();
    assert_eq!(id.len(), 24);

    let stored = ModelManager::<User>::get(&gateway, Filter::by_id(id.as_str()))
        .await
        .unwrap()
        .unwrap();
    let hashed = stored.get_str("password").unwrap();
    assert!(hashed.starts_with(PASSWORD_SENTINEL));
    assert!(stored.is_password_valid("abcd1234"));
    assert_eq!(stored.peek_field("created"), user.peek_field("created"));
}

#[tokio::test]
async fn test_user_insert_reports_field_errors_without_persisting() {
    let gateway = MemoryGateway::new();
    let (user, errors) = ModelManager::<User>::insert(
        &gateway,
        record(json!({"email": "open", "password": "abcd"})),
    )
    .await
    .unwrap();

    assert_eq!(error_keys(&errors, "name"), vec!["validation.required"]);
    assert_eq!(error_keys(&errors, "email"), vec!["validation.email"]);
    assert_eq!(error_keys(&errors, "password"), vec!["validation.min_length"]);
    let password_error = errors.iter().find(|e| e.name == "password").unwrap();
    assert_eq!(password_error.message.param("length"), Some("8"));

    // 未持久化的实例仍然返回给调用方
    assert_eq!(user.get_str("email"), Some("open"));
    assert_eq!(gateway.count("users"), 0);
}

#[tokio::test]
async fn test_unique_fields_block_second_insert() {
    let gateway = MemoryGateway::new();
    let data = json!({"name": "test", "email": "test@example.com", "password": "abcd1234"});
    let (_, errors) = ModelManager::<User>::insert(&gateway, record(data.clone())).await.unwrap();
    assert!(errors.is_empty());

    let (_, errors) = ModelManager::<User>::insert(&gateway, record(data)).await.unwrap();
    assert_eq!(error_keys(&errors, "name"), vec!["validation.unique"]);
    assert_eq!(error_keys(&errors, "email"), vec!["validation.unique"]);
    assert_eq!(gateway.count("users"), 1);
}

#[tokio::test]
async fn test_shape_and_unique_errors_can_both_be_reported() {
    let gateway = MemoryGateway::new();
    gateway
        .insert("users", &record(json!({"id": "legacy", "name": "old", "email": "open"})))
        .await
        .unwrap();

    let (_, errors) = ModelManager::<User>::insert(
        &gateway,
        record(json!({"name": "new", "email": "open", "password": "abcd1234"})),
    )
    .await
    .unwrap();
    assert_eq!(
        error_keys(&errors, "email"),
        vec!["validation.email", "validation.unique"]
    );
}

#[tokio::test]
async fn test_failed_update_leaves_storage_unchanged() {
    let gateway = MemoryGateway::new();
    let (user, errors) = ModelManager::<User>::insert(
        &gateway,
        record(json!({"name": "test", "email": "test@example.com", "password": "abcd1234"})),
    )
    .await
    .unwrap();
    assert!(errors.is_empty());
    let id = user.id().unwrap().to_string();

    let (user, errors) = user
        .update(&gateway, record(json!({"email": "not-an-email"})))
        .await
        .unwrap();
    assert_eq!(error_keys(&errors, "email"), vec!["validation.email"]);
    assert_eq!(user.get_str("email"), Some("not-an-email"));

    let stored = ModelManager::<User>::get(&gateway, Filter::by_id(id.as_str()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.get_str("email"), Some("test@example.com"));
}

#[tokio::test]
async fn test_update_overwrites_record_and_keeps_uniqueness_against_itself() {
    let gateway = MemoryGateway::new();
    let (user, _) = ModelManager::<User>::insert(
        &gateway,
        record(json!({"name": "test", "email": "test@example.com", "password": "abcd1234"})),
    )
    .await
    .unwrap();
    let created = user.peek_field("created").cloned();

    let (user, errors) = user
        .update(&gateway, record(json!({"email": "other@example.com"})))
        .await
        .unwrap();
    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(user.peek_field("created").cloned(), created);

    let stored = ModelManager::<User>::get(&gateway, Filter::new().eq("email", "other@example.com"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id(), user.id());
    // 实例中保留明文，更新时重新加盐哈希
    assert!(stored.is_password_valid("abcd1234"));
    assert_eq!(gateway.count("users"), 1);
}

#[tokio::test]
async fn test_update_without_stored_record_is_an_error() {
    let gateway = MemoryGateway::new();
    let (user, errors) = ModelManager::<User>::insert(
        &gateway,
        record(json!({"name": "test", "email": "test@example.com", "password": "abcd1234"})),
    )
    .await
    .unwrap();
    assert!(errors.is_empty());
    assert!(user.delete(&gateway).await.unwrap());

    let result = user
        .update(&gateway, record(json!({"email": "other@example.com"})))
        .await;
    assert!(matches!(result, Err(CatalogError::QueryError { .. })));
    assert_eq!(gateway.count("users"), 0);

    // 从未插入的实例同样不能更新
    let unit = Model::<Unit>::from_record(record(json!({"name": "U", "body": "B"})));
    let result = unit.update(&gateway, record(json!({"body": "C"}))).await;
    assert!(result.unwrap_err().is_storage_error());
    assert_eq!(gateway.count("units"), 0);
}

#[tokio::test]
async fn test_save_inserts_then_overwrites() {
    let gateway = MemoryGateway::new();
    let (set, errors) = ModelManager::<Set>::insert(
        &gateway,
        record(json!({"body": "A beginning course focused on probability.", "members": [{"id": "A", "kind": "unit"}]})),
    )
    .await
    .unwrap();
    assert_eq!(error_keys(&errors, "name"), vec!["validation.required"]);
    assert_eq!(errors.len(), 1);

    let mut set = set;
    set.set_field("name", "Statistics");
    let (set, errors) = set.save(&gateway).await.unwrap();
    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(gateway.count("sets"), 1);

    let mut set = set;
    set.set_field("accepted", true);
    let (set, errors) = set.save(&gateway).await.unwrap();
    assert!(errors.is_empty());
    assert_eq!(gateway.count("sets"), 1);

    let stored = ModelManager::<Set>::get(&gateway, Filter::by_id(set.id().unwrap()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.peek_field("accepted"), Some(&DataValue::Bool(true)));
}

#[tokio::test]
async fn test_versioned_defaults_are_applied_on_insert() {
    let gateway = MemoryGateway::new();
    let (set, errors) = ModelManager::<Set>::insert(
        &gateway,
        record(json!({
            "name": "Statistics",
            "body": "A beginning course focused on probability.",
            "members": [{"id": "A", "kind": "unit"}],
            "previous_id": "fdsjKO"
        })),
    )
    .await
    .unwrap();
    assert!(errors.is_empty(), "{:?}", errors);
    assert!(set.get_str("entity_id").is_some());
    assert_eq!(set.get_str("language"), Some("en"));
    assert_eq!(set.peek_field("accepted"), Some(&DataValue::Bool(false)));
    assert_eq!(set.peek_field("tags"), Some(&DataValue::Array(vec![])));

    let stored = ModelManager::<Set>::get(&gateway, Filter::by_id(set.id().unwrap()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.get_str("entity_id"), set.get_str("entity_id"));
}

#[tokio::test]
async fn test_set_members_validation() {
    let gateway = MemoryGateway::new();
    let base = json!({"name": "Statistics", "body": "Probability"});

    let (_, errors) = ModelManager::<Set>::insert(&gateway, record(base.clone())).await.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(error_keys(&errors, "members"), vec!["validation.required"]);

    let mut empty = record(base.clone());
    empty.insert("members".to_string(), DataValue::Array(vec![]));
    let (_, errors) = ModelManager::<Set>::insert(&gateway, empty).await.unwrap();
    assert_eq!(error_keys(&errors, "members"), vec!["validation.min_length"]);

    let mut bad = record(base);
    bad.insert(
        "members".to_string(),
        DataValue::from(json!([{"id": "A", "kind": "unit"}, {"id": "B", "kind": "topic"}, {"kind": "set"}])),
    );
    let (_, errors) = ModelManager::<Set>::insert(&gateway, bad).await.unwrap();
    let indexes: Vec<Option<usize>> = errors.iter().map(|e| e.index).collect();
    assert_eq!(indexes, vec![Some(1), Some(2)]);
    assert_eq!(errors[0].message.key, "validation.entity_kind");
    assert_eq!(errors[1].message.key, "validation.entity_id");
    assert_eq!(gateway.count("sets"), 0);
}

#[tokio::test]
async fn test_card_and_topic_schemas() {
    let gateway = MemoryGateway::new();
    let (_, errors) = ModelManager::<Card>::insert(
        &gateway,
        record(json!({"unit_id": "RUF531", "name": "What is?", "body": "Testing 1234", "kind": "audio"})),
    )
    .await
    .unwrap();
    assert_eq!(error_keys(&errors, "kind"), vec!["validation.one_of"]);
    assert!(errors[0].message.param("options").unwrap().contains("video"));

    let (_, errors) = ModelManager::<Topic>::insert(
        &gateway,
        record(json!({"user_id": "U1", "name": "Hello", "entity": {"id": "RUF531", "kind": "unit"}})),
    )
    .await
    .unwrap();
    assert!(errors.is_empty(), "{:?}", errors);
}

#[tokio::test]
async fn test_round_trip_keeps_values_and_types() {
    let gateway = MemoryGateway::new();
    let (unit, errors) = ModelManager::<Unit>::insert(
        &gateway,
        record(json!({
            "name": "Probability",
            "body": "Counting outcomes",
            "tags": ["math", "stats"],
            "require_ids": ["A", "B"]
        })),
    )
    .await
    .unwrap();
    assert!(errors.is_empty(), "{:?}", errors);

    let stored = ModelManager::<Unit>::get(&gateway, Filter::by_id(unit.id().unwrap()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, unit);
    assert_eq!(stored.require_ids(), vec!["A".to_string(), "B".to_string()]);
}

#[tokio::test]
async fn test_delete_keeps_in_memory_data() {
    let gateway = MemoryGateway::new();
    let (user, _) = ModelManager::<User>::insert(
        &gateway,
        record(json!({"name": "test", "email": "test@example.com", "password": "abcd1234"})),
    )
    .await
    .unwrap();

    assert!(user.delete(&gateway).await.unwrap());
    assert!(!user.delete(&gateway).await.unwrap());
    assert_eq!(user.get_str("name"), Some("test"));
    let found = ModelManager::<User>::get(&gateway, Filter::new().eq("name", "test"))
        .await
        .unwrap();
    assert!(found.is_none());
    assert!(!Model::<User>::new().delete(&gateway).await.unwrap());
}

#[tokio::test]
async fn test_list_with_and_without_filters() {
    let gateway = MemoryGateway::new();
    for (name, email) in [("a", "a@example.com"), ("b", "b@example.com"), ("c", "c@example.com")] {
        let (_, errors) = ModelManager::<User>::insert(
            &gateway,
            record(json!({"name": name, "email": email, "password": "abcd1234"})),
        )
        .await
        .unwrap();
        assert!(errors.is_empty());
    }

    let all = ModelManager::<User>::list(&gateway, Filter::new()).await.unwrap();
    assert_eq!(all.len(), 3);
    let only_b = ModelManager::<User>::list(&gateway, Filter::new().eq("name", "b"))
        .await
        .unwrap();
    assert_eq!(only_b.len(), 1);
    assert_eq!(only_b[0].get_str("email"), Some("b@example.com"));
    let none = ModelManager::<User>::list(&gateway, Filter::new().eq("name", "b").eq("email", "a@example.com"))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_deliver_after_fetch() {
    let gateway = MemoryGateway::new();
    ModelManager::<User>::insert(
        &gateway,
        record(json!({"name": "test", "email": "test@example.com", "password": "abcd1234"})),
    )
    .await
    .unwrap();
    let stored = ModelManager::<User>::get(&gateway, Filter::new().eq("name", "test"))
        .await
        .unwrap()
        .unwrap();

    let public = stored.deliver(AccessTier::Public);
    assert!(public.contains_key("name"));
    assert!(public.contains_key("id"));
    assert!(!public.contains_key("email"));
    assert!(!public.contains_key("password"));

    let private = stored.deliver(AccessTier::Private);
    assert!(private.contains_key("email"));
    assert!(!private.contains_key("password"));
}

/// 所有操作都失败的网关
struct UnreachableGateway;

#[async_trait]
impl StorageGateway for UnreachableGateway {
    async fn insert(&self, _collection: &str, _record: &Record) -> CatalogResult<()> {
        Err(quick_error!(connection, "unreachable"))
    }

    async fn update(&self, _collection: &str, _id: &str, _record: &Record) -> CatalogResult<bool> {
        Err(quick_error!(connection, "unreachable"))
    }

    async fn delete(&self, _collection: &str, _id: &str) -> CatalogResult<bool> {
        Err(quick_error!(connection, "unreachable"))
    }

    async fn get_by_filter(
        &self,
        _collection: &str,
        _conditions: &[QueryCondition],
    ) -> CatalogResult<Option<Record>> {
        Err(quick_error!(connection, "unreachable"))
    }

    async fn list_by_filter(
        &self,
        _collection: &str,
        _conditions: &[QueryCondition],
    ) -> CatalogResult<Vec<Record>> {
        Err(quick_error!(connection, "unreachable"))
    }

    fn gateway_name(&self) -> &'static str {
        "unreachable"
    }
}

#[tokio::test]
async fn test_storage_failures_are_errors_not_field_errors() {
    let gateway = UnreachableGateway;
    let result = ModelManager::<User>::insert(
        &gateway,
        record(json!({"name": "test", "email": "test@example.com", "password": "abcd1234"})),
    )
    .await;
    assert!(matches!(result, Err(CatalogError::ConnectionError { .. })));

    // 没有唯一字段的模型在写入时失败
    let result = ModelManager::<Unit>::insert(&gateway, record(json!({"name": "U", "body": "B"}))).await;
    assert!(result.unwrap_err().is_storage_error());

    let result = ModelManager::<Unit>::list(&gateway, Filter::new()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_init_with_config_builds_memory_gateway() {
    let config = CatalogConfig::builder()
        .storage(StorageConfig::Memory)
        .language("en-US")
        .build()
        .unwrap();
    let gateway = init_with_config(&config).await.unwrap();
    assert_eq!(gateway.gateway_name(), "memory");

    let (unit, errors) = ModelManager::<Unit>::insert(gateway.as_ref(), record(json!({"name": "U", "body": "B"})))
        .await
        .unwrap();
    assert!(errors.is_empty());
    assert!(unit.id().is_some());
}
