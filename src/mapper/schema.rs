use crate::core::record::fields;
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, BTreeSet};

/// Declared JSON type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Boolean,
    Object,
    List,
    Any,
}

impl FieldKind {
    /// Whether a stored value has this kind. Null fits every kind.
    pub fn accepts(&self, value: &JsonValue) -> bool {
        match (self, value) {
            (_, JsonValue::Null) | (Self::Any, _) => true,
            (Self::Text, JsonValue::String(_)) => true,
            (Self::Integer, JsonValue::Number(n)) => n.is_i64() || n.is_u64(),
            (Self::Float, JsonValue::Number(_)) => true,
            (Self::Boolean, JsonValue::Bool(_)) => true,
            (Self::Object, JsonValue::Object(_)) => true,
            (Self::List, JsonValue::Array(_)) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldTag {
    /// Written on create, never by an update.
    Locked,
    /// Never written to the store.
    Transient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub tags: BTreeSet<FieldTag>,
}

impl FieldSpec {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            tags: BTreeSet::new(),
        }
    }

    pub fn tagged(mut self, tag: FieldTag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn has_tag(&self, tag: FieldTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Field descriptor consulted by the mapper: name -> (kind, tags).
///
/// Fields missing from the schema are dynamic; they are stored as-is and
/// never filtered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSchema {
    fields: BTreeMap<String, FieldSpec>,
}

impl RecordSchema {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The fields every record shares.
    pub fn core() -> Self {
        use FieldKind::*;
        use FieldTag::Locked;

        Self::empty()
            .field(fields::ID, FieldSpec::new(Text).tagged(Locked))
            .field(fields::TYPE, FieldSpec::new(Text).tagged(Locked))
            .field(fields::APPID, FieldSpec::new(Text).tagged(Locked))
            .field(fields::PARENTID, FieldSpec::new(Text).tagged(Locked))
            .field(fields::CREATORID, FieldSpec::new(Text).tagged(Locked))
            .field(fields::TIMESTAMP, FieldSpec::new(Integer).tagged(Locked))
            .field(fields::UPDATED, FieldSpec::new(Integer))
            .field(fields::NAME, FieldSpec::new(Text))
            .field(fields::TAGS, FieldSpec::new(List))
            .field(fields::VOTES, FieldSpec::new(Integer))
            .field(fields::VERSION, FieldSpec::new(Integer))
    }

    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn has_tag(&self, name: &str, tag: FieldTag) -> bool {
        self.get(name).is_some_and(|spec| spec.has_tag(tag))
    }

    /// Declared fields that are written to the store.
    pub fn stored_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, spec)| !spec.has_tag(FieldTag::Transient))
            .map(|(name, _)| name.as_str())
    }
}
