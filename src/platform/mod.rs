//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Durable key-value storage (LocalStorage on web, memory elsewhere)
//! - Gate elements and toast notifications (DOM, web only)

pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use storage::{KeyValueStore, MemoryStore, StorageError};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
