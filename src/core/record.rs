use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Business-level field names shared by every record.
pub mod fields {
    pub const ID: &str = "id";
    pub const TYPE: &str = "type";
    pub const APPID: &str = "appid";
    pub const PARENTID: &str = "parentid";
    pub const CREATORID: &str = "creatorid";
    pub const TIMESTAMP: &str = "timestamp";
    pub const UPDATED: &str = "updated";
    pub const NAME: &str = "name";
    pub const TAGS: &str = "tags";
    pub const VOTES: &str = "votes";
    pub const VERSION: &str = "version";
}

/// A self-describing business entity.
///
/// Fields are plain JSON values; `id`, `type`, `appid`, `timestamp` and
/// `updated` have typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, JsonValue>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        let mut record = Self::default();
        let type_name: String = type_name.into();
        record.set(fields::TYPE, type_name);
        record
    }

    pub fn from_fields(fields: Map<String, JsonValue>) -> Self {
        Self { fields }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.set_id(id);
        self
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.set(field, value);
        self
    }

    /// The id, if present and a non-blank string.
    pub fn id(&self) -> Option<&str> {
        self.get_str(fields::ID).filter(|s| !s.trim().is_empty())
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        let id: String = id.into();
        self.set(fields::ID, id);
    }

    pub fn type_name(&self) -> Option<&str> {
        self.get_str(fields::TYPE)
    }

    pub fn appid(&self) -> Option<&str> {
        self.get_str(fields::APPID)
    }

    pub fn set_appid(&mut self, appid: impl Into<String>) {
        let appid: String = appid.into();
        self.set(fields::APPID, appid);
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.get_i64(fields::TIMESTAMP)
    }

    pub fn set_timestamp(&mut self, timestamp: i64) {
        self.set(fields::TIMESTAMP, timestamp);
    }

    pub fn updated(&self) -> Option<i64> {
        self.get_i64(fields::UPDATED)
    }

    pub fn set_updated(&mut self, updated: i64) {
        self.set(fields::UPDATED, updated);
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(JsonValue::as_str)
    }

    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(JsonValue::as_i64)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<JsonValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<JsonValue> {
        self.fields.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> &Map<String, JsonValue> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, JsonValue> {
        self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, JsonValue>> for Record {
    fn from(fields: Map<String, JsonValue>) -> Self {
        Self::from_fields(fields)
    }
}
