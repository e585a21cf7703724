//! Persisted reactive store for UI display preferences
//!
//! Core modules:
//! - `store`: Generic reactive state container with subscribers
//! - `persist`: Write-through persistence middleware (hydrate + snapshot)
//! - `storage`: Durable key-value backends (file, in-memory)
//! - `control_center`: The 3-field display-adjustment instance
//!
//! The mechanism is two layers composed by decoration: a [`Store`]
//! holds the live state and notifies subscribers synchronously on
//! every mutation; a [`PersistedStore`] wraps it, hydrating from a
//! [`StorageBackend`] at construction and writing the full state back
//! after every change. [`ControlCenterStore`] is the thin concrete
//! configuration of that mechanism.

pub mod control_center;
pub mod persist;
pub mod storage;
pub mod store;

pub use control_center::{ControlCenterState, ControlCenterStore};
pub use persist::PersistedStore;
pub use storage::{FileBackend, MemoryBackend, StorageBackend, StorageError};
pub use store::{Store, Subscription};
