//! Ordered map type for object values.
//!
//! [`ValueMap`] wraps an [`IndexMap`] so members keep their insertion order. Output
//! that walks an object (its `Display` text, serialization) is therefore
//! deterministic.
//!
//! ## Examples
//!
//! ```rust
//! use smart_format::{Value, ValueMap};
//!
//! let mut map = ValueMap::new();
//! map.insert("Name".to_string(), Value::from("Alice"));
//! map.insert("Age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("Name").and_then(|v| v.as_str()), Some("Alice"));
//! assert_eq!(map.get_ignore_case("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::Value;

/// An insertion-ordered map of member names to values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueMap(IndexMap<String, Value>);

impl ValueMap {
    #[must_use]
    pub fn new() -> Self {
        ValueMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ValueMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a member, returning the previous value for `key` if there was one.
    /// A replaced member keeps its original position.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Looks up `key` ignoring case. An exact match wins; otherwise the first member
    /// in insertion order whose name matches case-insensitively is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smart_format::{Value, ValueMap};
    ///
    /// let mut map = ValueMap::new();
    /// map.insert("city".to_string(), Value::from("lower"));
    /// map.insert("City".to_string(), Value::from("exact"));
    ///
    /// assert_eq!(map.get_ignore_case("City"), Some(&Value::from("exact")));
    /// assert_eq!(map.get_ignore_case("CITY"), Some(&Value::from("lower")));
    /// ```
    #[must_use]
    pub fn get_ignore_case(&self, key: &str) -> Option<&Value> {
        self.0.get(key).or_else(|| {
            let lowered = key.to_lowercase();
            self.0
                .iter()
                .find(|(name, _)| name.to_lowercase() == lowered)
                .map(|(_, value)| value)
        })
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl From<HashMap<String, Value>> for ValueMap {
    fn from(map: HashMap<String, Value>) -> Self {
        ValueMap(map.into_iter().collect())
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        ValueMap(IndexMap::from_iter(iter))
    }
}
