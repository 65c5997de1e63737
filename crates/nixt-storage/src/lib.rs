//! Nixt Storage - Durable local storage layer
//!
//! This crate provides the persistence layer for Nixt. It stands in for the
//! browser's local storage: a flat string key-value space where each key is
//! read and written independently.
//!
//! # Backends
//!
//! - `RedbKeyValueStore` - redb embedded database, one `local_storage` table
//! - `MemoryKeyValueStore` - process-local map, for tests and dry runs
//!
//! # Keys
//!
//! See [`keys`] for the fixed key names shared with the web application.

pub mod in_memory;
pub mod keys;
pub mod kv_store;
pub mod paths;

pub use in_memory::MemoryKeyValueStore;
pub use kv_store::RedbKeyValueStore;
pub use nixt_traits::{KeyValueStore, KeyValueStoreExt, StoreError, StoreResult};
