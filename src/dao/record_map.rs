use crate::core::Record;
use std::collections::HashMap;

/// Records keyed by id, iterated in the order the ids were requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordMap {
    order: Vec<String>,
    records: HashMap<String, Record>,
}

impl RecordMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from fetched records, ordered by the first occurrence of each id
    /// in `requested`. Fetched ids that were not requested go last.
    pub(crate) fn ordered_by(requested: &[String], mut fetched: HashMap<String, Record>) -> Self {
        let mut map = Self::new();
        for id in requested {
            if let Some(record) = fetched.remove(id) {
                map.insert(id.clone(), record);
            }
        }
        let mut leftovers: Vec<_> = fetched.into_iter().collect();
        leftovers.sort_by(|a, b| a.0.cmp(&b.0));
        for (id, record) in leftovers {
            map.insert(id, record);
        }
        map
    }

    fn insert(&mut self, id: String, record: Record) {
        if self.records.insert(id.clone(), record).is_none() {
            self.order.push(id);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn contains_key(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id).map(|r| (id.as_str(), r)))
    }

    pub fn into_records(mut self) -> Vec<Record> {
        self.order
            .iter()
            .filter_map(|id| self.records.remove(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetched(ids: &[&str]) -> HashMap<String, Record> {
        ids.iter()
            .map(|id| (id.to_string(), Record::new("note").with_id(*id)))
            .collect()
    }

    #[test]
    fn test_follows_request_order() {
        let requested: Vec<String> = ["c", "a", "b", "a"].iter().map(|s| s.to_string()).collect();
        let map = RecordMap::ordered_by(&requested, fetched(&["a", "b", "c"]));
        assert_eq!(map.ids().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_missing_ids_absent() {
        let requested: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let map = RecordMap::ordered_by(&requested, fetched(&["a", "c"]));
        assert!(map.contains_key("a"));
        assert!(!map.contains_key("b"));
        assert_eq!(map.get("c").and_then(Record::id), Some("c"));
        assert_eq!(map.into_records().len(), 2);
    }
}
