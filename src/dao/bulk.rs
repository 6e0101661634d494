use super::{Dao, RecordMap, key_filter, prepare_for_create};
use crate::core::{PRIMARY_KEY, Record, Result, timestamp};
use crate::mapper::FieldTag;
use crate::storage::{Filter, FindOptions, WriteModel};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::{Instrument, Level, event, info_span};

impl Dao {
    /// Insert many records in one unordered bulk insert.
    ///
    /// `None` entries are skipped; the others get the same defaults as
    /// [`Dao::create`]. If the insert faults the whole batch is reported as
    /// failed in the log; documents the store accepted before the fault stay.
    pub async fn create_all<'a, I>(&self, tenant: &str, records: I)
    where
        I: IntoIterator<Item = Option<&'a mut Record>>,
    {
        let Some(namespace) = self.namespace(tenant) else {
            return;
        };

        let mut documents = Vec::new();
        for record in records.into_iter().flatten() {
            prepare_for_create(record, tenant);
            let document = self.mapper.to_document(Some(&*record), None, false, true);
            if !document.is_empty() {
                documents.push(document);
            }
        }
        if documents.is_empty() {
            return;
        }

        let total = documents.len();
        let span = info_span!("dao.create_all", tenant = %tenant, total);
        async {
            let result: Result<u64> = async {
                self.store()?.insert_many(&namespace, documents, false).await
            }
            .await;
            match result {
                Ok(inserted) => event!(Level::DEBUG, inserted, "DAO.createAll()"),
                Err(err) => event!(Level::ERROR, error = %err, "createAll failed for the batch"),
            }
        }
        .instrument(span)
        .await
    }

    /// Fetch every record whose id is in `ids` with one query.
    ///
    /// Ids without a stored document are absent from the result. With
    /// `all_fields == false` only schema-declared fields are fetched.
    pub async fn read_all(&self, tenant: &str, ids: &[String], all_fields: bool) -> RecordMap {
        let requested: Vec<String> = ids
            .iter()
            .filter(|id| !id.trim().is_empty())
            .cloned()
            .collect();
        if requested.is_empty() {
            return RecordMap::new();
        }
        let Some(namespace) = self.namespace(tenant) else {
            return RecordMap::new();
        };

        let span = info_span!("dao.read_all", tenant = %tenant, requested = requested.len());
        async {
            let filter = Filter::any_of(PRIMARY_KEY, requested.iter().cloned());
            let mut options = FindOptions::new();
            options.projection = self.mapper.projection(all_fields);

            let result = async { self.store()?.find(&namespace, &filter, &options).await }.await;
            let documents = match result {
                Ok(documents) => documents,
                Err(err) => {
                    event!(Level::ERROR, error = %err, "readAll failed");
                    return RecordMap::new();
                }
            };

            let mut fetched = HashMap::with_capacity(documents.len());
            for document in documents {
                let Some(id) = document.get(PRIMARY_KEY).and_then(JsonValue::as_str) else {
                    continue;
                };
                let id = id.to_string();
                if let Some(record) = self.mapper.from_document(Some(document)) {
                    fetched.insert(id, record);
                }
            }

            let results = RecordMap::ordered_by(&requested, fetched);
            event!(Level::DEBUG, found = results.len(), "DAO.readAll()");
            results
        }
        .instrument(span)
        .await
    }

    /// Apply one partial update per record as a single ordered bulk write.
    ///
    /// Every present record is stamped with `updated`; records without an id
    /// are not written. The first fatal error stops the batch; updates applied
    /// before it stay.
    pub async fn update_all<'a, I>(&self, tenant: &str, records: I)
    where
        I: IntoIterator<Item = Option<&'a mut Record>>,
    {
        let Some(namespace) = self.namespace(tenant) else {
            return;
        };

        let mut models = Vec::new();
        let mut ids = Vec::new();
        for record in records.into_iter().flatten() {
            record.set_updated(timestamp());
            let Some(id) = record.id().map(str::to_string) else {
                continue;
            };
            let set = self
                .mapper
                .to_document(Some(&*record), Some(FieldTag::Locked), true, false);
            if set.is_empty() {
                continue;
            }
            models.push(WriteModel::UpdateOne {
                filter: key_filter(&id),
                set,
            });
            ids.push(id);
        }
        if models.is_empty() {
            return;
        }

        let span = info_span!("dao.update_all", tenant = %tenant, total = models.len());
        async {
            let result = async { self.store()?.bulk_write(&namespace, models, true).await }.await;
            match result {
                Ok(res) => event!(
                    Level::DEBUG,
                    modified = res.modified,
                    "DAO.updateAll() keys: {:?}",
                    ids
                ),
                Err(err) => event!(Level::ERROR, error = %err, "updateAll aborted"),
            }
        }
        .instrument(span)
        .await
    }

    /// Delete every document whose id matches one of the records.
    pub async fn delete_all<'a, I>(&self, tenant: &str, records: I)
    where
        I: IntoIterator<Item = Option<&'a Record>>,
    {
        let Some(namespace) = self.namespace(tenant) else {
            return;
        };
        let ids: Vec<String> = records
            .into_iter()
            .flatten()
            .filter_map(Record::id)
            .map(str::to_string)
            .collect();
        if ids.is_empty() {
            return;
        }

        let span = info_span!("dao.delete_all", tenant = %tenant, total = ids.len());
        async {
            let filter = Filter::any_of(PRIMARY_KEY, ids);
            let result = async { self.store()?.delete_many(&namespace, &filter).await }.await;
            match result {
                Ok(deleted) => event!(Level::DEBUG, deleted, "DAO.deleteAll()"),
                Err(err) => event!(Level::ERROR, error = %err, "deleteAll failed"),
            }
        }
        .instrument(span)
        .await
    }
}
