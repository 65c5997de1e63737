//! redb-backed durable key-value store.

use anyhow::Result;
use nixt_traits::{KeyValueStore, StoreError, StoreResult};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const LOCAL_STORAGE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("local_storage");

/// Durable store with one redb write transaction per mutation.
#[derive(Debug, Clone)]
pub struct RedbKeyValueStore {
    db: Arc<Database>,
}

impl RedbKeyValueStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let db = Arc::new(Database::create(path)?);
        debug!(path = %path.display(), "Opened local storage database");
        Self::new(db)
    }

    /// Wrap an already opened database, creating the table if needed.
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(LOCAL_STORAGE_TABLE)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    fn put_raw(&self, key: &str, data: &[u8]) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(LOCAL_STORAGE_TABLE)?;
            table.insert(key, data)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LOCAL_STORAGE_TABLE)?;

        if let Some(value) = table.get(key)? {
            Ok(Some(value.value().to_vec()))
        } else {
            Ok(None)
        }
    }

    fn delete_raw(&self, key: &str) -> Result<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(LOCAL_STORAGE_TABLE)?;
            table.remove(key)?.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }

    /// List stored keys with an optional prefix filter.
    pub fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LOCAL_STORAGE_TABLE)?;
        let mut keys = Vec::new();

        for entry in table.iter()? {
            let (key, _) = entry?;
            let key = key.value();
            if prefix.is_none_or(|p| key.starts_with(p)) {
                keys.push(key.to_string());
            }
        }

        Ok(keys)
    }
}

impl KeyValueStore for RedbKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let Some(bytes) = self.get_raw(key).map_err(StoreError::backend)? else {
            return Ok(None);
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| StoreError::Backend(format!("value for '{key}' is not UTF-8: {e}")))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.put_raw(key, value.as_bytes())
            .map_err(StoreError::backend)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.delete_raw(key).map_err(StoreError::backend)?;
        Ok(())
    }
}
