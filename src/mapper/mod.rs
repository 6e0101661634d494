//! Record <-> document mapping.
//!
//! The record's `id` is stored under `_id`. Inserted documents also carry a
//! `_ObjectId` pagination key, which never surfaces on a record.

mod schema;

pub use schema::{FieldKind, FieldSpec, FieldTag, RecordSchema};

use crate::core::record::fields;
use crate::core::{
    Document, ObjectId, PAGINATION_KEY, PRIMARY_KEY, Record, is_blank, json_type_name,
};
use log::debug;
use serde_json::Value as JsonValue;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RecordMapper {
    schema: Arc<RecordSchema>,
}

impl RecordMapper {
    pub fn new(schema: RecordSchema) -> Self {
        Self {
            schema: Arc::new(schema),
        }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Map a record to a document.
    ///
    /// Transient fields are never written, and fields tagged with `filter` are
    /// skipped. Blank values (null or whitespace-only strings) are dropped
    /// unless `include_null_fields` is set; a null id is never written. When
    /// `assign_pagination_key` is set, a non-empty document gets a fresh
    /// pagination key. A missing record maps to an empty document.
    pub fn to_document(
        &self,
        record: Option<&Record>,
        filter: Option<FieldTag>,
        include_null_fields: bool,
        assign_pagination_key: bool,
    ) -> Document {
        let mut document = Document::new();
        let Some(record) = record else {
            return document;
        };

        for (name, value) in record.iter() {
            if self.schema.has_tag(name, FieldTag::Transient) {
                continue;
            }
            if filter.is_some_and(|tag| self.schema.has_tag(name, tag)) {
                continue;
            }
            if is_blank(value) && !include_null_fields {
                continue;
            }

            if name == fields::ID {
                if value.is_null() {
                    continue;
                }
                document.insert(PRIMARY_KEY.to_string(), JsonValue::String(id_string(value)));
            } else if name == PAGINATION_KEY || name == PRIMARY_KEY {
                // Reserved store fields cannot be set through a record.
                continue;
            } else {
                document.insert(name.clone(), value.clone());
            }
        }

        if assign_pagination_key && !document.is_empty() {
            document.insert(
                PAGINATION_KEY.to_string(),
                JsonValue::String(ObjectId::new().to_hex()),
            );
        }
        document
    }

    /// Map a stored document back to a record; `None` for a missing or empty
    /// document. Values keep their stored JSON types.
    pub fn from_document(&self, document: Option<Document>) -> Option<Record> {
        let document = document.filter(|d| !d.is_empty())?;

        let mut record = Record::default();
        for (name, value) in document {
            if name == PAGINATION_KEY {
                continue;
            }
            let name = if name == PRIMARY_KEY {
                fields::ID.to_string()
            } else {
                name
            };
            if let Some(spec) = self.schema.get(&name)
                && !spec.kind.accepts(&value)
            {
                debug!(
                    "Field '{}' declared as {:?} holds a {} value",
                    name,
                    spec.kind,
                    json_type_name(&value)
                );
            }
            record.set(name, value);
        }
        Some(record)
    }

    /// Stored field names to fetch: `None` for every field, otherwise the
    /// schema-declared ones.
    pub fn projection(&self, all_fields: bool) -> Option<Vec<String>> {
        if all_fields {
            return None;
        }
        Some(
            self.schema
                .stored_fields()
                .map(|name| {
                    if name == fields::ID {
                        PRIMARY_KEY.to_string()
                    } else {
                        name.to_string()
                    }
                })
                .collect(),
        )
    }
}

impl Default for RecordMapper {
    fn default() -> Self {
        Self::new(RecordSchema::core())
    }
}

/// Primary keys are always stored as strings.
fn id_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Pagination key of a stored document, if it has one.
pub fn pagination_key(document: &Document) -> Option<&str> {
    document.get(PAGINATION_KEY).and_then(JsonValue::as_str)
}
