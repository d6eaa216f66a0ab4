//! Persistence port and slots.
//!
//! - `KeyValueStore`: get/set port (`MemoryStore`, `FileStore`)
//! - `Slot`: the four versioned keys and their load/save helpers

pub mod slots;
pub mod store;

use std::path::PathBuf;

use thiserror::Error;

pub use slots::{clear, load_or_default, save, try_load, Slot};
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Storage failure.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem error.
    #[error("{}: {source}", .path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Value could not be encoded.
    #[error("{key}: {source}")]
    Json {
        /// Slot key.
        key: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}
