//! Nixt Traits - Shared trait definitions and core abstractions.
//!
//! This crate provides the interfaces shared across the Nixt workspace:
//! - `KeyValueStore`, the durable string key-value capability that replaces
//!   browser local storage
//! - `KeyValueStoreExt`, JSON helpers available on every store
//! - `StoreError`, the error type every store reports

pub mod error;
pub mod store;

pub use error::{Result as StoreResult, StoreError};
pub use store::{KeyValueStore, KeyValueStoreExt};
