//! Insertion-ordered string-keyed index.
//!
//! Values live in a `Vec` in first-insertion order with a `HashMap` from key to
//! position, so lookups are fast and the JSON object comes out in the order
//! keys were first seen. Overwriting a key keeps its original position.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone)]
pub struct OrderedIndex<V> {
    positions: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedIndex<V> {
    fn default() -> Self {
        Self {
            positions: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedIndex<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for `key`. Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.positions.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Mutable access to the value for `key`, inserting `V::default()` first
    /// if the key is new.
    pub fn entry_or_default(&mut self, key: impl Into<String>) -> &mut V
    where
        V: Default,
    {
        let key = key.into();
        let i = match self.positions.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.positions.insert(key.clone(), i);
                self.entries.push((key, V::default()));
                i
            }
        };
        &mut self.entries[i].1
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.positions.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Iterate `(key, value)` pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Serialize> Serialize for OrderedIndex<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
