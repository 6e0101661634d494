use super::filter::Filter;
use crate::core::{Document, Result};
use async_trait::async_trait;

/// Sort direction for `find`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Options accepted by [`DocumentStore::find`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// Maximum number of documents returned. `None` means unbounded.
    pub limit: Option<usize>,
    /// Number of documents fetched per round trip. Stores that materialize
    /// results in one go may ignore it.
    pub batch_size: Option<usize>,
    pub sort: Option<(String, SortOrder)>,
    /// Fields to return; the primary key is always included.
    pub projection: Option<Vec<String>>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some((field.into(), order));
        self
    }

    pub fn projection<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

/// One operation of a bulk write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteModel {
    InsertOne(Document),
    /// `$set` the given fields on the first matching document.
    UpdateOne { filter: Filter, set: Document },
    ReplaceOne {
        filter: Filter,
        replacement: Document,
        upsert: bool,
    },
    DeleteOne(Filter),
    DeleteMany(Filter),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched: u64,
    pub modified: u64,
    /// True when an upsert inserted a new document.
    pub upserted: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkWriteResult {
    pub inserted: u64,
    pub matched: u64,
    pub modified: u64,
    pub upserted: u64,
    pub deleted: u64,
}

/// Store driver: a handle onto one database made of named document
/// collections.
///
/// Writes to a collection that does not exist create it. Reads from a missing
/// collection see no documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Name of the database this handle points at.
    fn database_name(&self) -> &str;

    async fn list_collection_names(&self) -> Result<Vec<String>>;

    async fn create_collection(&self, name: &str) -> Result<()>;

    async fn drop_collection(&self, name: &str) -> Result<()>;

    async fn count_documents(&self, collection: &str) -> Result<u64>;

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>>;

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>>;

    async fn insert_one(&self, collection: &str, document: Document) -> Result<()>;

    /// Insert many documents. Ordered inserts stop at the first failure;
    /// unordered inserts attempt every document and report all failures.
    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
        ordered: bool,
    ) -> Result<u64>;

    async fn replace_one(
        &self,
        collection: &str,
        filter: &Filter,
        replacement: Document,
        upsert: bool,
    ) -> Result<UpdateResult>;

    /// Partial merge: only the fields in `set` change on the stored document.
    async fn update_one(&self, collection: &str, filter: &Filter, set: Document)
    -> Result<UpdateResult>;

    async fn bulk_write(
        &self,
        collection: &str,
        models: Vec<WriteModel>,
        ordered: bool,
    ) -> Result<BulkWriteResult>;

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64>;

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64>;

    /// Release every resource held by the store.
    async fn shutdown(&self);
}
