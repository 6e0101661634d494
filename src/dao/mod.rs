//! Tenant-scoped CRUD, bulk CRUD and paginated scans over a [`StoreClient`].
//!
//! Every operation is one request/response against the store. Misuse (blank
//! tenant, blank id, missing record) is a silent no-op, and store faults are
//! logged and absorbed: callers get `None`, an empty collection, or nothing.

mod bulk;
mod page;
mod record_map;
mod root;

pub use record_map::RecordMap;

use crate::connection::StoreClient;
use crate::core::{Document, PRIMARY_KEY, Record, Result, generate_id, timestamp};
use crate::mapper::{FieldTag, RecordMapper, RecordSchema};
use crate::storage::{DocumentStore, Filter};
use std::sync::Arc;
use tracing::{Instrument, Level, event, info_span};

pub struct Dao {
    client: Arc<StoreClient>,
    mapper: RecordMapper,
}

impl Dao {
    /// DAO over the core record schema.
    pub fn new(client: Arc<StoreClient>) -> Self {
        Self::with_schema(client, RecordSchema::core())
    }

    pub fn with_schema(client: Arc<StoreClient>, schema: RecordSchema) -> Self {
        Self {
            client,
            mapper: RecordMapper::new(schema),
        }
    }

    pub fn client(&self) -> &Arc<StoreClient> {
        &self.client
    }

    pub fn mapper(&self) -> &RecordMapper {
        &self.mapper
    }

    /// Store a record, replacing any document with the same id.
    ///
    /// A blank id is replaced by a generated one, `timestamp` is set when
    /// absent, and `appid` is stamped with the tenant; the caller's record
    /// sees these changes. Returns the id, or `None` when nothing was written.
    pub async fn create(&self, tenant: &str, record: Option<&mut Record>) -> Option<String> {
        let record = record?;
        let namespace = self.namespace(tenant)?;
        prepare_for_create(record, tenant);

        let id = record.id()?.to_string();
        let document = self.mapper.to_document(Some(&*record), None, false, true);

        let span = info_span!("dao.create", tenant = %tenant, id = %id);
        async {
            match self.create_row(&namespace, &id, document).await {
                Ok(()) => {
                    event!(Level::DEBUG, "DAO.create()");
                    Some(id)
                }
                Err(err) => {
                    event!(Level::ERROR, error = %err, "create failed");
                    None
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Fetch a record by id.
    pub async fn read(&self, tenant: &str, id: &str) -> Option<Record> {
        if id.trim().is_empty() {
            return None;
        }
        let namespace = self.namespace(tenant)?;

        let span = info_span!("dao.read", tenant = %tenant, id = %id);
        async {
            match self.read_row(&namespace, id).await {
                Ok(document) => {
                    let record = self.mapper.from_document(document);
                    event!(
                        Level::DEBUG,
                        found = record.is_some(),
                        "DAO.read() {}",
                        record.as_ref().and_then(Record::type_name).unwrap_or("-")
                    );
                    record
                }
                Err(err) => {
                    event!(Level::ERROR, error = %err, "read failed");
                    None
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Merge the record's unlocked fields into the stored document.
    ///
    /// Stamps `updated`. Fields absent from the record are left as stored;
    /// fields set to null are written as null.
    pub async fn update(&self, tenant: &str, record: Option<&mut Record>) {
        let Some(record) = record else { return };
        let Some(id) = record.id().map(str::to_string) else {
            return;
        };
        let Some(namespace) = self.namespace(tenant) else {
            return;
        };

        record.set_updated(timestamp());
        let document = self
            .mapper
            .to_document(Some(&*record), Some(FieldTag::Locked), true, false);

        let span = info_span!("dao.update", tenant = %tenant, id = %id);
        async {
            match self.update_row(&namespace, &id, document).await {
                Ok(modified) => event!(Level::DEBUG, modified, "DAO.update()"),
                Err(err) => event!(Level::ERROR, error = %err, "update failed"),
            }
        }
        .instrument(span)
        .await
    }

    /// Remove the document with the record's id.
    pub async fn delete(&self, tenant: &str, record: Option<&Record>) {
        let Some(id) = record.and_then(Record::id) else {
            return;
        };
        let Some(namespace) = self.namespace(tenant) else {
            return;
        };

        let span = info_span!("dao.delete", tenant = %tenant, id = %id);
        async {
            match self.delete_row(&namespace, id).await {
                Ok(deleted) => event!(Level::DEBUG, deleted, "DAO.delete()"),
                Err(err) => event!(Level::ERROR, error = %err, "delete failed"),
            }
        }
        .instrument(span)
        .await
    }

    fn namespace(&self, tenant: &str) -> Option<String> {
        self.client.namespaces().resolve_name(tenant)
    }

    fn store(&self) -> Result<&dyn DocumentStore> {
        self.client.store()
    }

    async fn create_row(&self, namespace: &str, id: &str, document: Document) -> Result<()> {
        if document.is_empty() {
            return Ok(());
        }
        self.store()?
            .replace_one(namespace, &key_filter(id), document, true)
            .await?;
        Ok(())
    }

    async fn read_row(&self, namespace: &str, id: &str) -> Result<Option<Document>> {
        let document = self.store()?.find_one(namespace, &key_filter(id)).await?;
        Ok(document.filter(|d| !d.is_empty()))
    }

    async fn update_row(&self, namespace: &str, id: &str, document: Document) -> Result<u64> {
        if document.is_empty() {
            return Ok(0);
        }
        let result = self
            .store()?
            .update_one(namespace, &key_filter(id), document)
            .await?;
        Ok(result.modified)
    }

    async fn delete_row(&self, namespace: &str, id: &str) -> Result<u64> {
        self.store()?.delete_one(namespace, &key_filter(id)).await
    }
}

/// Defaults applied to every record on its way into the store.
fn prepare_for_create(record: &mut Record, tenant: &str) {
    if record.id().is_none() {
        let id = generate_id();
        event!(Level::DEBUG, id = %id, "generated id");
        record.set_id(id);
    }
    if record.timestamp().is_none() {
        record.set_timestamp(timestamp());
    }
    record.set_appid(tenant);
}

fn key_filter(id: &str) -> Filter {
    Filter::eq(PRIMARY_KEY, id)
}
