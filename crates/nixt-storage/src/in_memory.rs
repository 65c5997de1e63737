use nixt_traits::{KeyValueStore, StoreResult};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_remove() {
        let store = MemoryKeyValueStore::new();
        assert!(store.is_empty());

        store.set("refreshToken", "r1").unwrap();
        assert!(store.contains_key("refreshToken"));
        assert_eq!(store.get("refreshToken").unwrap().as_deref(), Some("r1"));

        store.remove("refreshToken").unwrap();
        assert_eq!(store.len(), 0);
    }
}
