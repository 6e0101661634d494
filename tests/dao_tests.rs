/// DAO behavior tests
///
/// End-to-end checks of the tenant DAO against the in-memory store.
/// Run with: cargo test --test dao_tests
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tenantdb::{
    Dao, FieldKind, FieldSpec, FieldTag, Pager, Record, RecordSchema, StoreClient, StoreConfig,
};

async fn setup() -> Dao {
    let client = StoreClient::in_memory(StoreConfig::default()).await.unwrap();
    Dao::new(Arc::new(client))
}

#[tokio::test]
async fn test_create_then_read_returns_same_record() {
    let dao = setup().await;
    let original = Record::new("note")
        .with("name", "groceries")
        .with("tags", json!(["home", "weekly"]))
        .with("meta", json!({"priority": 2, "pinned": false}));

    let mut record = original.clone();
    let id = dao.create("t1", Some(&mut record)).await.unwrap();
    assert!(!id.trim().is_empty());

    let stored = dao.read("t1", &id).await.unwrap();
    assert_eq!(stored.appid(), Some("t1"));
    assert!(stored.timestamp().is_some());
    for (field, value) in original.iter() {
        assert_eq!(stored.get(field), Some(value), "{field}");
    }
    assert_eq!(stored, record);
}

#[tokio::test]
async fn test_update_never_touches_locked_fields() {
    let schema = RecordSchema::core().field(
        "owner",
        FieldSpec::new(FieldKind::Text).tagged(FieldTag::Locked),
    );
    let client = StoreClient::in_memory(StoreConfig::default()).await.unwrap();
    let dao = Dao::with_schema(Arc::new(client), schema);

    let mut record = Record::new("note").with_id("n1").with("owner", "alice");
    record.set_timestamp(100);
    dao.create("t1", Some(&mut record)).await;

    let mut patch = record.clone();
    patch.set("owner", "mallory");
    patch.set_timestamp(999);
    patch.set("type", "other");
    patch.set_appid("t2");
    patch.set("name", "renamed");
    dao.update("t1", Some(&mut patch)).await;

    let stored = dao.read("t1", "n1").await.unwrap();
    assert_eq!(stored.get_str("owner"), Some("alice"));
    assert_eq!(stored.timestamp(), Some(100));
    assert_eq!(stored.type_name(), Some("note"));
    assert_eq!(stored.appid(), Some("t1"));
    assert_eq!(stored.get_str("name"), Some("renamed"));
}

#[tokio::test]
async fn test_update_writes_explicit_nulls_only() {
    let dao = setup().await;
    let mut record = Record::new("note").with_id("n1").with("a", 1).with("b", 2);
    dao.create("t1", Some(&mut record)).await;

    let mut patch = Record::default().with_id("n1").with("a", serde_json::Value::Null);
    dao.update("t1", Some(&mut patch)).await;

    let stored = dao.read("t1", "n1").await.unwrap();
    assert_eq!(stored.get("a"), Some(&serde_json::Value::Null));
    assert_eq!(stored.get("b"), Some(&json!(2)));
}

#[tokio::test]
async fn test_delete_then_read_is_none() {
    let dao = setup().await;
    let mut ids = Vec::new();
    for i in 0..5 {
        let mut record = Record::new("note").with("n", i);
        ids.push(dao.create("t1", Some(&mut record)).await.unwrap());
    }
    for id in &ids {
        let record = dao.read("t1", id).await.unwrap();
        dao.delete("t1", Some(&record)).await;
        assert_eq!(dao.read("t1", id).await, None);
    }
}

#[tokio::test]
async fn test_pagination_round_trip_for_every_page_size() {
    let dao = setup().await;
    let n = 23;
    let mut records: Vec<Record> = (0..n).map(|i| Record::new("note").with("n", i)).collect();
    dao.create_all("t1", records.iter_mut().map(Some)).await;

    let expected: HashSet<String> = records
        .iter()
        .map(|r| r.id().unwrap().to_string())
        .collect();

    for k in 1..n {
        let mut pager = Pager::with_limit(k);
        let mut seen = Vec::new();
        loop {
            let page = dao.read_page("t1", Some(&mut pager)).await;
            if page.is_empty() {
                break;
            }
            seen.extend(page.iter().map(|r| r.id().unwrap().to_string()));
        }
        let unique: HashSet<String> = seen.iter().cloned().collect();
        assert_eq!(seen.len(), n, "duplicates with page size {k}");
        assert_eq!(unique, expected, "omissions with page size {k}");
        assert_eq!(pager.count, n as u64);
    }
}

#[tokio::test]
async fn test_records_deleted_mid_scan_vanish() {
    let dao = setup().await;
    let mut records: Vec<Record> = ["a", "b", "c", "d"]
        .iter()
        .map(|id| Record::new("note").with_id(*id))
        .collect();
    dao.create_all("t1", records.iter_mut().map(Some)).await;

    let mut pager = Pager::with_limit(2);
    let first = dao.read_page("t1", Some(&mut pager)).await;
    let first_ids: Vec<&str> = first.iter().filter_map(Record::id).collect();
    assert_eq!(first_ids, vec!["a", "b"]);
    assert_eq!(pager.count, 2);

    dao.delete("t1", Some(&records[0])).await;
    dao.delete("t1", Some(&records[3])).await;

    let second = dao.read_page("t1", Some(&mut pager)).await;
    let second_ids: Vec<&str> = second.iter().filter_map(Record::id).collect();
    assert_eq!(second_ids, vec!["c"]);
    assert_eq!(pager.count, 3);

    let before = pager.clone();
    assert!(dao.read_page("t1", Some(&mut pager)).await.is_empty());
    assert_eq!(pager, before);
}

#[tokio::test]
async fn test_read_all_with_missing_id() {
    let dao = setup().await;
    for id in ["a", "c"] {
        let mut record = Record::new("note").with_id(id);
        dao.create("t1", Some(&mut record)).await;
    }

    let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let found = dao.read_all("t1", &ids, true).await;
    assert_eq!(found.len(), 2);
    assert!(found.contains_key("a"));
    assert!(found.contains_key("c"));
    assert!(!found.contains_key("b"));
}

#[tokio::test]
async fn test_two_record_scan_with_limit_one() {
    let dao = setup().await;
    let mut x1 = Record::new("note").with_id("x1");
    let mut x2 = Record::new("note").with_id("x2");
    dao.create("t1", Some(&mut x1)).await;
    dao.create("t1", Some(&mut x2)).await;

    let mut pager = Pager::with_limit(1);

    let first = dao.read_page("t1", Some(&mut pager)).await;
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].id(), Some("x1"));
    assert_eq!(pager.count, 1);

    let second = dao.read_page("t1", Some(&mut pager)).await;
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].id(), Some("x2"));
    assert_eq!(pager.count, 2);

    let before = pager.clone();
    let third = dao.read_page("t1", Some(&mut pager)).await;
    assert!(third.is_empty());
    assert_eq!(pager, before);
}

#[tokio::test]
async fn test_create_all_skips_null_entry() {
    let dao = setup().await;
    let mut records = vec![
        Some(Record::new("note").with_id("a")),
        None,
        Some(Record::new("note").with_id("b")),
    ];
    dao.create_all("t1", records.iter_mut().map(Option::as_mut)).await;

    assert!(dao.read("t1", "a").await.is_some());
    assert!(dao.read("t1", "b").await.is_some());
    assert_eq!(dao.client().namespaces().count("t1").await, 2);
}

#[tokio::test]
async fn test_tenants_are_isolated() {
    let dao = setup().await;
    let mut record = Record::new("note").with_id("shared");
    dao.create("t1", Some(&mut record)).await;

    assert!(dao.read("t1", "shared").await.is_some());
    assert!(dao.read("t2", "shared").await.is_none());
    assert!(dao.read_page("t2", None).await.is_empty());
    assert_eq!(dao.client().namespaces().count("t2").await, 0);
}

#[tokio::test]
async fn test_concurrent_creates_share_no_keys() {
    let dao = Arc::new(setup().await);
    let mut handles = Vec::new();
    for worker in 0..4 {
        let dao = Arc::clone(&dao);
        handles.push(tokio::spawn(async move {
            for i in 0..25 {
                let mut record = Record::new("note").with("w", worker).with("i", i);
                dao.create("t1", Some(&mut record)).await.unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let mut pager = Pager::with_limit(7);
    let mut total = 0;
    loop {
        let page = dao.read_page("t1", Some(&mut pager)).await;
        if page.is_empty() {
            break;
        }
        total += page.len();
    }
    assert_eq!(total, 100);
}
