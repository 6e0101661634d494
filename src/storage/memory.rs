use super::collection::Collection;
use super::engine::{
    BulkWriteResult, DocumentStore, FindOptions, UpdateResult, WriteModel,
};
use super::filter::Filter;
use crate::core::{Document, Result, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Embedded [`DocumentStore`] keeping every collection in memory.
pub struct InMemoryStore {
    database: String,
    /// Collections with individual locks; the outer lock only guards the name map.
    collections: RwLock<HashMap<String, Arc<RwLock<Collection>>>>,
    closed: AtomicBool,
}

impl InMemoryStore {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collections: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    async fn existing(&self, name: &str) -> Result<Option<Arc<RwLock<Collection>>>> {
        self.ensure_open()?;
        Ok(self.collections.read().await.get(name).cloned())
    }

    /// Handle to a collection, creating it on first write.
    async fn for_write(&self, name: &str) -> Result<Arc<RwLock<Collection>>> {
        if let Some(handle) = self.existing(name).await? {
            return Ok(handle);
        }
        let mut collections = self.collections.write().await;
        let handle = collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(Collection::new(name))));
        Ok(Arc::clone(handle))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new("default")
    }
}

fn apply_model(
    collection: &mut Collection,
    model: WriteModel,
    result: &mut BulkWriteResult,
) -> Result<()> {
    match model {
        WriteModel::InsertOne(document) => {
            collection.insert(document)?;
            result.inserted += 1;
        }
        WriteModel::UpdateOne { filter, set } => {
            let res = collection.update_one(&filter, set)?;
            result.matched += res.matched;
            result.modified += res.modified;
        }
        WriteModel::ReplaceOne {
            filter,
            replacement,
            upsert,
        } => {
            let res = collection.replace_one(&filter, replacement, upsert)?;
            result.matched += res.matched;
            result.modified += res.modified;
            result.upserted += res.upserted as u64;
        }
        WriteModel::DeleteOne(filter) => {
            result.deleted += collection.delete_one(&filter);
        }
        WriteModel::DeleteMany(filter) => {
            result.deleted += collection.delete_many(&filter);
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn database_name(&self) -> &str {
        &self.database
    }

    async fn list_collection_names(&self) -> Result<Vec<String>> {
        self.ensure_open()?;
        let mut names: Vec<String> = self.collections.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn create_collection(&self, name: &str) -> Result<()> {
        self.ensure_open()?;
        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            return Err(StoreError::NamespaceExists(name.to_string()));
        }
        collections.insert(name.to_string(), Arc::new(RwLock::new(Collection::new(name))));
        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> Result<()> {
        self.ensure_open()?;
        if self.collections.write().await.remove(name).is_none() {
            return Err(StoreError::NamespaceNotFound(name.to_string()));
        }
        Ok(())
    }

    async fn count_documents(&self, collection: &str) -> Result<u64> {
        match self.existing(collection).await? {
            Some(handle) => Ok(handle.read().await.len() as u64),
            None => Ok(0),
        }
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>> {
        match self.existing(collection).await? {
            Some(handle) => Ok(handle.read().await.find_first(filter).cloned()),
            None => Ok(None),
        }
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>> {
        match self.existing(collection).await? {
            Some(handle) => Ok(handle.read().await.scan(filter, options)),
            None => Ok(Vec::new()),
        }
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<()> {
        let handle = self.for_write(collection).await?;
        let mut coll = handle.write().await;
        coll.insert(document)
    }

    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
        ordered: bool,
    ) -> Result<u64> {
        let models = documents.into_iter().map(WriteModel::InsertOne).collect();
        let result = self.bulk_write(collection, models, ordered).await?;
        Ok(result.inserted)
    }

    async fn replace_one(
        &self,
        collection: &str,
        filter: &Filter,
        replacement: Document,
        upsert: bool,
    ) -> Result<UpdateResult> {
        if !upsert {
            let Some(handle) = self.existing(collection).await? else {
                return Ok(UpdateResult::default());
            };
            let mut coll = handle.write().await;
            return coll.replace_one(filter, replacement, false);
        }
        let handle = self.for_write(collection).await?;
        let mut coll = handle.write().await;
        coll.replace_one(filter, replacement, true)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateResult> {
        match self.existing(collection).await? {
            Some(handle) => handle.write().await.update_one(filter, set),
            None => Ok(UpdateResult::default()),
        }
    }

    async fn bulk_write(
        &self,
        collection: &str,
        models: Vec<WriteModel>,
        ordered: bool,
    ) -> Result<BulkWriteResult> {
        let handle = self.for_write(collection).await?;
        let mut coll = handle.write().await;

        let mut result = BulkWriteResult::default();
        let mut applied = 0usize;
        let mut failed = 0usize;
        let mut first_error: Option<StoreError> = None;

        for model in models {
            match apply_model(&mut coll, model, &mut result) {
                Ok(()) => applied += 1,
                Err(err) => {
                    failed += 1;
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                    if ordered {
                        break;
                    }
                }
            }
        }

        match first_error {
            None => Ok(result),
            Some(err) => Err(StoreError::BulkWrite {
                applied,
                failed,
                first_error: err.to_string(),
            }),
        }
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64> {
        match self.existing(collection).await? {
            Some(handle) => Ok(handle.write().await.delete_one(filter)),
            None => Ok(0),
        }
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64> {
        match self.existing(collection).await? {
            Some(handle) => Ok(handle.write().await.delete_many(filter)),
            None => Ok(0),
        }
    }

    async fn shutdown(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.collections.write().await.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value as JsonValue, json};

    fn doc(value: JsonValue) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_collection_lifecycle() {
        let store = InMemoryStore::new("db");
        assert_eq!(store.database_name(), "db");

        store.create_collection("a").await.unwrap();
        assert!(matches!(
            store.create_collection("a").await,
            Err(StoreError::NamespaceExists(_))
        ));
        assert_eq!(store.list_collection_names().await.unwrap(), vec!["a"]);

        store.drop_collection("a").await.unwrap();
        assert!(matches!(
            store.drop_collection("a").await,
            Err(StoreError::NamespaceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_write_creates_collection_read_does_not() {
        let store = InMemoryStore::default();
        assert_eq!(store.count_documents("x").await.unwrap(), 0);
        assert!(store.find_one("x", &Filter::All).await.unwrap().is_none());
        assert!(store.list_collection_names().await.unwrap().is_empty());

        store.insert_one("x", doc(json!({"_id": "1"}))).await.unwrap();
        assert_eq!(store.count_documents("x").await.unwrap(), 1);
        assert_eq!(store.list_collection_names().await.unwrap(), vec!["x"]);
    }

    #[tokio::test]
    async fn test_unordered_insert_many_keeps_going() {
        let store = InMemoryStore::default();
        let docs = vec![
            doc(json!({"_id": "a"})),
            doc(json!({"_id": "a"})),
            doc(json!({"_id": "b"})),
        ];
        let err = store.insert_many("c", docs, false).await.unwrap_err();
        assert!(matches!(err, StoreError::BulkWrite { applied: 2, failed: 1, .. }));
        assert_eq!(store.count_documents("c").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_ordered_bulk_write_stops_on_error() {
        let store = InMemoryStore::default();
        store.insert_one("c", doc(json!({"_id": "a", "n": 0}))).await.unwrap();
        store.insert_one("c", doc(json!({"_id": "b", "n": 0}))).await.unwrap();

        let models = vec![
            WriteModel::UpdateOne {
                filter: Filter::eq("_id", "a"),
                set: doc(json!({"n": 1})),
            },
            WriteModel::UpdateOne {
                filter: Filter::eq("_id", "a"),
                set: doc(json!({"_id": "zzz"})),
            },
            WriteModel::UpdateOne {
                filter: Filter::eq("_id", "b"),
                set: doc(json!({"n": 1})),
            },
        ];
        let err = store.bulk_write("c", models, true).await.unwrap_err();
        assert!(matches!(err, StoreError::BulkWrite { applied: 1, failed: 1, .. }));

        let a = store.find_one("c", &Filter::eq("_id", "a")).await.unwrap().unwrap();
        let b = store.find_one("c", &Filter::eq("_id", "b")).await.unwrap().unwrap();
        assert_eq!(a.get("n"), Some(&json!(1)));
        assert_eq!(b.get("n"), Some(&json!(0)));
    }

    #[tokio::test]
    async fn test_shutdown_closes_store() {
        let store = InMemoryStore::default();
        store.insert_one("c", doc(json!({"_id": "a"}))).await.unwrap();
        store.shutdown().await;
        store.shutdown().await;

        assert!(store.is_closed());
        assert_eq!(store.count_documents("c").await, Err(StoreError::Closed));
    }
}
