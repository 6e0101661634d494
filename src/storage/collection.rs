use super::engine::{FindOptions, SortOrder, UpdateResult};
use super::filter::{Filter, compare_field, values_equal};
use crate::core::{Document, PAGINATION_KEY, PRIMARY_KEY, Result, StoreError, generate_id};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};

/// A named set of documents with a unique primary-key index.
///
/// Documents keep the slot they were inserted into; scans without a sort
/// return them in slot order.
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    documents: BTreeMap<usize, Document>,
    next_slot: usize,
    primary_index: HashMap<String, usize>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: BTreeMap::new(),
            next_slot: 0,
            primary_index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn insert(&mut self, mut document: Document) -> Result<()> {
        let key = match document.get(PRIMARY_KEY).cloned() {
            Some(JsonValue::Null) | None => {
                let id = JsonValue::String(generate_id());
                let key = index_key(&id);
                document.insert(PRIMARY_KEY.to_string(), id);
                key
            }
            Some(id) => index_key(&id),
        };

        if self.primary_index.contains_key(&key) {
            return Err(StoreError::DuplicateKey {
                namespace: self.name.clone(),
                key: display_key(&document),
            });
        }

        let slot = self.next_slot;
        self.next_slot += 1;
        self.documents.insert(slot, document);
        self.primary_index.insert(key, slot);
        Ok(())
    }

    pub fn find_first(&self, filter: &Filter) -> Option<&Document> {
        self.first_slot(filter).and_then(|slot| self.documents.get(&slot))
    }

    pub fn scan(&self, filter: &Filter, options: &FindOptions) -> Vec<Document> {
        let mut matched: Vec<&Document> = self
            .matching_slots(filter)
            .into_iter()
            .filter_map(|slot| self.documents.get(&slot))
            .collect();

        if let Some((field, order)) = &options.sort {
            matched.sort_by(|a, b| {
                let ord = compare_field(a, b, field);
                match order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            });
        }

        let limit = options.limit.unwrap_or(usize::MAX);
        matched
            .into_iter()
            .take(limit)
            .map(|doc| project(doc, options.projection.as_deref()))
            .collect()
    }

    pub fn replace_one(
        &mut self,
        filter: &Filter,
        mut replacement: Document,
        upsert: bool,
    ) -> Result<UpdateResult> {
        match self.first_slot(filter) {
            Some(slot) => {
                let existing_id = self.documents[&slot].get(PRIMARY_KEY).cloned();
                match (replacement.get(PRIMARY_KEY).cloned(), existing_id) {
                    (Some(new_id), Some(old_id)) if !values_equal(&new_id, &old_id) => {
                        return Err(StoreError::ImmutableField(PRIMARY_KEY.to_string()));
                    }
                    (None, Some(old_id)) => {
                        replacement.insert(PRIMARY_KEY.to_string(), old_id);
                    }
                    _ => {}
                }
                // A document keeps its pagination key for life.
                if let Some(key) = self.documents[&slot].get(PAGINATION_KEY).cloned() {
                    replacement.insert(PAGINATION_KEY.to_string(), key);
                }
                let modified = self.documents[&slot] != replacement;
                self.documents.insert(slot, replacement);
                Ok(UpdateResult {
                    matched: 1,
                    modified: modified as u64,
                    upserted: false,
                })
            }
            None if upsert => {
                if !replacement.contains_key(PRIMARY_KEY)
                    && let Some(key) = filter.key_equality(PRIMARY_KEY)
                {
                    replacement.insert(PRIMARY_KEY.to_string(), key.clone());
                }
                self.insert(replacement)?;
                Ok(UpdateResult {
                    matched: 0,
                    modified: 0,
                    upserted: true,
                })
            }
            None => Ok(UpdateResult::default()),
        }
    }

    pub fn update_one(&mut self, filter: &Filter, set: Document) -> Result<UpdateResult> {
        if set.is_empty() {
            return Err(StoreError::InvalidDocument(
                "update document must not be empty".to_string(),
            ));
        }

        let Some(slot) = self.first_slot(filter) else {
            return Ok(UpdateResult::default());
        };

        let document = self
            .documents
            .get_mut(&slot)
            .ok_or_else(|| StoreError::InvalidDocument("dangling index entry".to_string()))?;

        if let (Some(new_id), Some(old_id)) = (set.get(PRIMARY_KEY), document.get(PRIMARY_KEY))
            && !values_equal(new_id, old_id)
        {
            return Err(StoreError::ImmutableField(PRIMARY_KEY.to_string()));
        }

        let mut modified = false;
        for (field, value) in set {
            if document.get(&field) != Some(&value) {
                document.insert(field, value);
                modified = true;
            }
        }

        Ok(UpdateResult {
            matched: 1,
            modified: modified as u64,
            upserted: false,
        })
    }

    pub fn delete_one(&mut self, filter: &Filter) -> u64 {
        match self.first_slot(filter) {
            Some(slot) => {
                self.remove_slot(slot);
                1
            }
            None => 0,
        }
    }

    pub fn delete_many(&mut self, filter: &Filter) -> u64 {
        let slots = self.matching_slots(filter);
        for slot in &slots {
            self.remove_slot(*slot);
        }
        slots.len() as u64
    }

    fn remove_slot(&mut self, slot: usize) {
        if let Some(document) = self.documents.remove(&slot)
            && let Some(id) = document.get(PRIMARY_KEY)
        {
            self.primary_index.remove(&index_key(id));
        }
    }

    fn first_slot(&self, filter: &Filter) -> Option<usize> {
        if let Some(key) = filter.key_equality(PRIMARY_KEY) {
            return self.primary_index.get(&index_key(key)).copied();
        }
        self.documents
            .iter()
            .find(|(_, doc)| filter.matches(doc))
            .map(|(slot, _)| *slot)
    }

    fn matching_slots(&self, filter: &Filter) -> Vec<usize> {
        if let Some(key) = filter.key_equality(PRIMARY_KEY) {
            return self
                .primary_index
                .get(&index_key(key))
                .copied()
                .into_iter()
                .collect();
        }
        self.documents
            .iter()
            .filter(|(_, doc)| filter.matches(doc))
            .map(|(slot, _)| *slot)
            .collect()
    }
}

/// Canonical, type-tagged index form of a primary-key value. Numbers that
/// compare equal share a form, strings never collide with other types.
fn index_key(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => format!("s:{s}"),
        JsonValue::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => format!("n:{i}"),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 9.0e15 => format!("n:{}", f as i64),
            _ => format!("n:{n}"),
        },
        other => format!("j:{other}"),
    }
}

fn display_key(document: &Document) -> String {
    match document.get(PRIMARY_KEY) {
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn project(document: &Document, projection: Option<&[String]>) -> Document {
    match projection {
        None => document.clone(),
        Some(fields) => document
            .iter()
            .filter(|(name, _)| name.as_str() == PRIMARY_KEY || fields.iter().any(|f| f == *name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
    }
}
