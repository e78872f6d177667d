//! Storage layer.
//!
//! [`UpdateStore`] defines the whole-document load/save interface every
//! handler works against. The production implementation is
//! [`json_file::JsonFileStore`]; tests swap in [`memory::MemoryStore`].
//! To move to another backend (an embedded KV store, a locked file, …),
//! implement [`UpdateStore`] for the new type and change the constructor in
//! `main.rs`.

pub mod json_file;
#[cfg(test)]
pub mod memory;
pub mod normalize;
pub mod update;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

pub use json_file::JsonFileStore;
pub use update::{now_iso, Update, UpdatesDocument, MAX_ID};

/// Errors surfaced by an [`UpdateStore`].
///
/// A corrupted document is *not* an error: it loads as an empty board.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode updates document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Load/save of the complete update document.
///
/// Every request performs a full load → mutate → save cycle; no
/// implementation is required to serialise concurrent writers.
#[async_trait]
pub trait UpdateStore: Send + Sync + 'static {
    /// Read the current document. A missing backing store is an empty board.
    async fn load(&self) -> Result<UpdatesDocument, StoreError>;

    /// Replace the stored document with `document`.
    async fn save(&self, document: &UpdatesDocument) -> Result<(), StoreError>;
}
