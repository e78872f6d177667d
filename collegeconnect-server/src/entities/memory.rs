//! In-memory [`UpdateStore`] doubles for tests.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{StoreError, UpdateStore, UpdatesDocument};

#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<UpdatesDocument>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: UpdatesDocument) -> Self {
        Self {
            document: Mutex::new(document),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn snapshot(&self) -> UpdatesDocument {
        self.document.lock().map(|d| d.clone()).unwrap_or_default()
    }

    /// Number of `save` calls observed so far.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpdateStore for MemoryStore {
    async fn load(&self) -> Result<UpdatesDocument, StoreError> {
        Ok(self.snapshot())
    }

    async fn save(&self, document: &UpdatesDocument) -> Result<(), StoreError> {
        if let Ok(mut current) = self.document.lock() {
            *current = document.clone();
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Loads a fixed document and refuses every save, like a read-only data file.
#[derive(Debug, Default)]
pub struct ReadOnlyStore {
    document: UpdatesDocument,
}

impl ReadOnlyStore {
    pub fn with_document(document: UpdatesDocument) -> Self {
        Self { document }
    }
}

#[async_trait]
impl UpdateStore for ReadOnlyStore {
    async fn load(&self) -> Result<UpdatesDocument, StoreError> {
        Ok(self.document.clone())
    }

    async fn save(&self, _document: &UpdatesDocument) -> Result<(), StoreError> {
        Err(StoreError::Io {
            path: PathBuf::from("data.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only file system"),
        })
    }
}
