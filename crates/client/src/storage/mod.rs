//! Durable local key-value storage.
//!
//! The store persists its state through the [`KeyValueStorage`] trait:
//! async get/set/remove of string values by string key, the same surface
//! the mobile platform's async storage exposes. Every write replaces the
//! complete value for a key, so there are no read-modify-write races to
//! guard against.
//!
//! Two implementations are provided:
//!
//! - [`FileStorage`] - one file per key under a data directory, with
//!   atomic writes (temp file + rename)
//! - [`MemoryStorage`] - a `HashMap` behind a mutex, for tests and
//!   ephemeral runs

mod file;
mod memory;

use std::future::Future;

use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors raised at the storage boundary.
///
/// Raw I/O errors are converted here and never escape to consumers of the
/// store in any other shape.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying read or write failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized for storage.
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Async key-value storage with full-value writes.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Remove the value stored under `key`. Removing an absent key is not
    /// an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}
