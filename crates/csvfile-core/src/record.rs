//! Record (dict row) type

use std::collections::BTreeMap;
use std::ops::Index;

use indexmap::IndexMap;

use crate::cell::CellValue;

/// An ordered mapping from column name to typed value
///
/// Keys keep their first insertion position; inserting an existing key
/// replaces its value in place. Two records are equal when their entries
/// match in order.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: IndexMap<String, CellValue>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record with room for `capacity` fields
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    /// Set a field, returning the previous value if the key existed
    pub fn insert<K, V>(&mut self, name: K, value: V) -> Option<CellValue>
    where
        K: Into<String>,
        V: Into<CellValue>,
    {
        self.fields.insert(name.into(), value.into())
    }

    /// Get a field by name
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields.get(name)
    }

    /// Get a mutable reference to a field by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut CellValue> {
        self.fields.get_mut(name)
    }

    /// Remove a field, keeping the order of the others
    pub fn remove(&mut self, name: &str) -> Option<CellValue> {
        self.fields.shift_remove(name)
    }

    /// Check if a field exists
    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over field names in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterate over values in order
    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.fields.values()
    }

    /// Iterate over `(name, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Index<&str> for Record {
    type Output = CellValue;

    fn index(&self, name: &str) -> &CellValue {
        match self.get(name) {
            Some(v) => v,
            None => panic!("no field named `{name}` in record"),
        }
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        record.extend(iter);
        record
    }
}

impl<K: Into<String>, V: Into<CellValue>> Extend<(K, V)> for Record {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Into<String>, V: Into<CellValue>, const N: usize> From<[(K, V); N]> for Record {
    fn from(fields: [(K, V); N]) -> Self {
        fields.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<CellValue>> From<Vec<(K, V)>> for Record {
    fn from(fields: Vec<(K, V)>) -> Self {
        fields.into_iter().collect()
    }
}

impl From<BTreeMap<String, CellValue>> for Record {
    fn from(map: BTreeMap<String, CellValue>) -> Self {
        map.into_iter().collect()
    }
}

impl IntoIterator for Record {
    type Item = (String, CellValue);
    type IntoIter = indexmap::map::IntoIter<String, CellValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut record = Record::from([("a", 1), ("b", 2)]);
        assert_eq!(record.insert("a", 3), Some(CellValue::Integer(1)));
        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(record["a"], CellValue::Integer(3));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let record: Record = vec![("x", "first"), ("y", "mid"), ("x", "last")].into();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("x").and_then(CellValue::as_str), Some("last"));
    }

    #[test]
    fn test_remove_and_lookup() {
        let mut record = Record::from([("a", 1), ("b", 2), ("c", 3)]);
        assert_eq!(record.remove("b"), Some(CellValue::Integer(2)));
        assert!(!record.contains_key("b"));
        assert_eq!(record.get("zzz"), None);
        let values: Vec<_> = record.values().cloned().collect();
        assert_eq!(values, vec![CellValue::Integer(1), CellValue::Integer(3)]);
    }

    #[test]
    fn test_order_matters_for_equality() {
        let a = Record::from([("a", 1), ("b", 2)]);
        let b = Record::from([("b", 2), ("a", 1)]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_wide_record_lookup() {
        let record: Record = (0..500).map(|i| (format!("c{i}"), i)).collect();
        assert_eq!(record.len(), 500);
        assert_eq!(record["c499"], CellValue::Integer(499));
        assert_eq!(record.keys().nth(250), Some("c250"));
        assert_eq!(record.into_iter().last(), Some(("c499".to_string(), CellValue::Integer(499))));
    }

    #[test]
    fn test_get_mut() {
        let mut record = Record::from([("n", 1)]);
        if let Some(v) = record.get_mut("n") {
            *v = CellValue::Null;
        }
        assert!(record["n"].is_null());
    }
}
