//! Durable key-value storage backends
//!
//! The store only needs a minimal contract: string keys, string
//! values, last-write-wins per key, durable across restarts. The
//! persistence layer treats every backend failure as non-fatal, so
//! backends report errors honestly and leave recovery policy to the
//! caller.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

/// Backend failure modes.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous key-value storage.
///
/// Writes must be visible to a subsequent `get` of the same key; no
/// atomicity is required beyond single-key last-write-wins.
pub trait StorageBackend {
    /// Read the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the entry for `key`. Absent keys are not an error.
    fn delete(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Shared-handle passthrough, so a caller can keep a handle to a
/// backend that a store owns (e.g. to inspect it in tests or share one
/// backend between stores with distinct keys).
impl<B: StorageBackend> StorageBackend for Rc<RefCell<B>> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.borrow_mut().set(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.borrow_mut().delete(key)
    }
}
