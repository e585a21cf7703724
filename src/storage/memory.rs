//! In-memory backend for tests and development.

use std::collections::HashMap;

use super::{StorageBackend, StorageError};

/// Non-durable `HashMap` backend.
///
/// Doubles as the test harness for failure handling: flipping
/// [`fail_writes`] makes every `set`/`delete` report
/// [`StorageError::Unavailable`] without touching stored entries.
///
/// [`fail_writes`]: MemoryBackend::set_fail_writes
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Induce write failures (tests only, but harmless elsewhere).
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable("writes disabled".into()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable("writes disabled".into()));
        }
        self.entries.remove(key);
        Ok(())
    }
}
