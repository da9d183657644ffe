//! Keyed durable storage.
//!
//! Drafts and named templates are stored as opaque JSON blobs under string
//! keys. The core only needs `get`/`set`/`delete`, so any backend that can
//! provide those is a valid store.

mod memory;
mod sqlite;

use std::future::Future;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::Result;

/// A keyed blob store.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Vec<u8>) -> impl Future<Output = Result<()>> + Send;

    /// Removes `key`. Returns true if a value was removed.
    fn delete(&self, key: &str) -> impl Future<Output = Result<bool>> + Send;
}
