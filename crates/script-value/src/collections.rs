//! `Dict` and `Set`: insertion-ordered containers keyed by hashable script values.

use crate::error::{Result, ValueError};
use crate::value::Value;
use indexmap::{IndexMap, IndexSet};

/// An insertion-ordered mapping with unique keys.
///
/// Re-inserting an existing key replaces its value but keeps the key's original
/// position, so the last write wins without reordering iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dict {
    entries: IndexMap<Value, Value>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Build a dict from key/value pairs, failing on the first unhashable key.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        let mut dict = Dict::new();
        for (key, value) in entries {
            dict.insert(key, value)?;
        }
        Ok(dict)
    }

    /// Insert or overwrite an entry, returning the previous value for the key.
    pub fn insert(&mut self, key: Value, value: Value) -> Result<Option<Value>> {
        if !key.is_hashable() {
            return Err(ValueError::Unhashable(key.kind()));
        }
        Ok(self.entries.insert(key, value))
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Lookup by text key, the common case for keyword-style dicts.
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.entries.get(&Value::Text(key.to_owned()))
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Value, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, Value, Value> {
        self.entries.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, Value, Value> {
        self.entries.values()
    }
}

impl<'a> IntoIterator for &'a Dict {
    type Item = (&'a Value, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// An insertion-ordered collection of unique hashable values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Set {
    items: IndexSet<Value>,
}

impl Set {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: IndexSet::with_capacity(capacity),
        }
    }

    /// Insert an element. Returns `Ok(false)` when it was already present and an
    /// error when the element is unhashable.
    pub fn insert(&mut self, value: Value) -> Result<bool> {
        if !value.is_hashable() {
            return Err(ValueError::Unhashable(value.kind()));
        }
        Ok(self.items.insert(value))
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> indexmap::set::Iter<'_, Value> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Set {
    type Item = &'a Value;
    type IntoIter = indexmap::set::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
