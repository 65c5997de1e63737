//! Storage trait abstractions.
//!
//! `KeyValueStore` is the durable local storage the session store, the auth
//! client and the preferences read and write. Implementations are provided by
//! downstream crates (e.g., nixt-storage).

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, StoreError};

// ── KeyValueStore ───────────────────────────────────────────────────

/// Durable string key-value storage.
///
/// Every key holds an independent value; there is no schema versioning and
/// no cross-key transaction.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

// ── JSON helpers ────────────────────────────────────────────────────

pub trait KeyValueStoreExt: KeyValueStore {
    /// Read and decode a JSON blob. A missing key yields `Ok(None)`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StoreError::Decode {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Encode a value as JSON and store it under `key`.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}
