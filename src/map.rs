//! Ordered map type for TON object properties.
//!
//! This module provides [`TonMap`], a wrapper around [`IndexMap`] that
//! maintains insertion order for object properties. TON requires this:
//! Pretty-mode output must be deterministic, and property order is part of
//! what round-trips (spelling aside, `parse(serialize(doc))` walks the
//! same properties in the same order).
//!
//! Duplicate assignment keeps the key's original position and replaces the
//! value, the "last assignment wins" rule of the format.
//!
//! ## Examples
//!
//! ```rust
//! use ton_format::{TonMap, TonValue};
//!
//! let mut map = TonMap::new();
//! map.insert("name".to_string(), TonValue::from("Alice"));
//! map.insert("age".to_string(), TonValue::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use indexmap::IndexMap;
use std::collections::HashMap;

/// An insertion-ordered map of property names to TON values.
///
/// # Examples
///
/// ```rust
/// use ton_format::{TonMap, TonValue};
///
/// let mut map = TonMap::new();
/// map.insert("first".to_string(), TonValue::from(1));
/// map.insert("second".to_string(), TonValue::from(2));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TonMap(IndexMap<String, crate::TonValue>);

impl TonMap {
    /// Creates an empty `TonMap`.
    #[must_use]
    pub fn new() -> Self {
        TonMap(IndexMap::new())
    }

    /// Creates an empty `TonMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        TonMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a name-value pair. If the name already exists the old value
    /// is returned and the name keeps its original position.
    pub fn insert(&mut self, key: String, value: crate::TonValue) -> Option<crate::TonValue> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::TonValue> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut crate::TonValue> {
        self.0.get_mut(key)
    }

    /// Returns `true` if the map contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes `key`, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<crate::TonValue> {
        self.0.shift_remove(key)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the names, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, crate::TonValue> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, crate::TonValue> {
        self.0.values()
    }

    /// Returns an iterator over the entries, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::TonValue> {
        self.0.iter()
    }

    /// Returns an iterator over the entries with mutable values.
    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, crate::TonValue> {
        self.0.iter_mut()
    }
}

impl From<HashMap<String, crate::TonValue>> for TonMap {
    fn from(map: HashMap<String, crate::TonValue>) -> Self {
        TonMap(map.into_iter().collect())
    }
}

impl IntoIterator for TonMap {
    type Item = (String, crate::TonValue);
    type IntoIter = indexmap::map::IntoIter<String, crate::TonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TonMap {
    type Item = (&'a String, &'a crate::TonValue);
    type IntoIter = indexmap::map::Iter<'a, String, crate::TonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, crate::TonValue)> for TonMap {
    fn from_iter<T: IntoIterator<Item = (String, crate::TonValue)>>(iter: T) -> Self {
        TonMap(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TonValue;

    #[test]
    fn test_insertion_order() {
        let mut map = TonMap::new();
        map.insert("zulu".to_string(), TonValue::from(1));
        map.insert("alpha".to_string(), TonValue::from(2));
        map.insert("mike".to_string(), TonValue::from(3));

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn test_last_write_wins_keeps_position() {
        let mut map = TonMap::new();
        map.insert("a".to_string(), TonValue::from(1));
        map.insert("b".to_string(), TonValue::from(2));
        let old = map.insert("a".to_string(), TonValue::from(3));

        assert_eq!(old, Some(TonValue::from(1)));
        assert_eq!(map.get("a"), Some(&TonValue::from(3)));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut map = TonMap::new();
        map.insert("a".to_string(), TonValue::from(1));
        map.insert("b".to_string(), TonValue::from(2));
        map.insert("c".to_string(), TonValue::from(3));
        map.remove("b");

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }
}
