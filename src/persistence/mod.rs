//! Persistence module
//!
//! Timer state and configuration survive restarts through a small key-value
//! store injected into the application state.

pub mod snapshot;
pub mod store;

// Re-export main types
pub use snapshot::{load_timer, save_config, save_state};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
