//! Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a key-value store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read store at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write store at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store at {path} is not a valid JSON object: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode store contents: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Errors raised while accessing the shared application state.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("Failed to lock {0}")]
    LockPoisoned(&'static str),
}
