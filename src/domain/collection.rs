use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::ArticleRecord;

/// Articles keyed by link.
///
/// Iterates in first-insertion order. Inserting a link that is already
/// present replaces its record but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    records: HashMap<String, ArticleRecord>,
    order: Vec<String>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a record. Returns the replaced record, if any.
    pub fn insert(&mut self, record: ArticleRecord) -> Option<ArticleRecord> {
        let link = record.link.clone();
        let previous = self.records.insert(link.clone(), record);
        if previous.is_none() {
            self.order.push(link);
        }
        previous
    }

    pub fn get(&self, link: &str) -> Option<&ArticleRecord> {
        self.records.get(link)
    }

    pub fn contains(&self, link: &str) -> bool {
        self.records.contains_key(link)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArticleRecord> {
        self.order.iter().filter_map(|link| self.records.get(link))
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for record in self.iter() {
            map.serialize_entry(&record.link, record)?;
        }
        map.end()
    }
}

/// Counters of one collection run. Lives only for the duration of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunState {
    /// Ceiling on the number of inserts
    pub target_count: usize,
    /// Successful inserts so far, overwrites of a known link included
    pub collected_count: usize,
    /// Index into the rendered list: items before it have been visited
    pub processed_offset: usize,
}

impl RunState {
    pub fn new(target_count: usize) -> Self {
        Self {
            target_count,
            collected_count: 0,
            processed_offset: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.collected_count >= self.target_count
    }
}
