use std::collections::HashMap;

use serde::{Serialize, Serializer};

use super::score::ScoreRecord;

/// Placeholder key → display value.
///
/// Iteration follows first-insertion order. Re-inserting an existing key
/// overwrites its value in place, so later sources win without moving the
/// key. The placeholder resolver relies on this order when several keys
/// match in the same window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl LookupMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key).copied() {
            Some(pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Flatten records into the map, three keys per record.
    pub fn extend_records<'a>(&mut self, records: impl IntoIterator<Item = &'a ScoreRecord>) {
        for record in records {
            for (key, value) in record.entries() {
                self.insert(key, value);
            }
        }
    }
}

impl FromIterator<(String, String)> for LookupMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = LookupMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl Serialize for LookupMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
