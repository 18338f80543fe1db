//! Contains the `DataTable` struct, the in-memory map owned by a single shard.
use std::collections::HashMap;

/// DataTable newtype holding the composite key to value entries of one shard.
#[derive(Debug, Clone, Default)]
pub struct DataTable(HashMap<String, String>);

impl DataTable {
    /// Create a new data table with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self(HashMap::with_capacity(capacity))
    }

    /// Create a new empty data table
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Get a value by key
    pub fn get_value(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    /// Set a key-value pair, returns the old value if it existed
    pub fn set_value(&mut self, key: String, value: String) -> Option<String> {
        self.0.insert(key, value)
    }

    /// Insert only when the key is absent. Returns false and leaves the table untouched otherwise.
    pub fn insert_if_absent(&mut self, key: String, value: String) -> bool {
        use std::collections::hash_map::Entry;
        match self.0.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Overwrite only when the key is present, returning the previous value.
    pub fn replace_value(&mut self, key: &str, value: String) -> Option<String> {
        self.0
            .get_mut(key)
            .map(|slot| std::mem::replace(slot, value))
    }

    /// Delete a key-value pair, returns the old value if it existed
    pub fn delete_value(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Check if a key exists
    pub fn has_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Get the number of keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries whose key starts with `prefix`.
    pub fn entries_with_prefix(&self, prefix: &str) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Copy of every entry, used by snapshots.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Clear all data from the table
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_if_absent_keeps_first_value() {
        let mut table = DataTable::new();
        assert!(table.insert_if_absent("a".into(), "1".into()));
        assert!(!table.insert_if_absent("a".into(), "2".into()));
        assert_eq!(table.get_value("a").as_deref(), Some("1"));
    }

    #[test]
    fn test_replace_value_requires_presence() {
        let mut table = DataTable::new();
        assert_eq!(table.replace_value("a", "1".into()), None);
        assert!(table.is_empty());

        table.set_value("a".into(), "1".into());
        assert_eq!(table.replace_value("a", "2".into()).as_deref(), Some("1"));
        assert_eq!(table.get_value("a").as_deref(), Some("2"));
    }

    #[test]
    fn test_entries_with_prefix() {
        let mut table = DataTable::with_capacity(4);
        table.set_value("alice.p1.x".into(), "1".into());
        table.set_value("alice.p2.x".into(), "2".into());
        table.set_value("bob.p1.x".into(), "3".into());

        let hits = table.entries_with_prefix("alice.p1.");
        assert_eq!(hits, vec![("alice.p1.x".to_string(), "1".to_string())]);
        assert_eq!(table.entries().len(), 3);
    }
}
