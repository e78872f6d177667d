//! Flat-file implementation of [`UpdateStore`].
//!
//! The whole board lives in one pretty-printed JSON document. Writes replace
//! the file in place, so a crash mid-write can leave it truncated; the next
//! load then treats it as corrupted and starts from an empty board.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use super::normalize::normalize_records;
use super::{now_iso, StoreError, UpdateStore, UpdatesDocument};

/// JSON-file-backed update store.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Use `path` as the backing document, creating it with an empty board
    /// when it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };
        let exists = tokio::fs::try_exists(&store.path)
            .await
            .map_err(|source| store.io_error(source))?;
        if !exists {
            store.save(&UpdatesDocument::default()).await?;
            info!(path = %store.path.display(), "created new data file");
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file receiving the corrected document on normalization,
    /// e.g. `data.json` → `data.json.bak`.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".bak");
        PathBuf::from(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Best-effort rewrite after normalization: backup first, then the
    /// canonical file. Failures are logged and never returned.
    async fn persist_normalized(&self, document: &UpdatesDocument) {
        let backup = self.backup_path();
        match write_document(&backup, document).await {
            Ok(()) => info!(backup = %backup.display(), "normalized data file and saved backup"),
            Err(e) => warn!(error = %e, "failed to write normalized backup"),
        }
        if let Err(e) = self.save(document).await {
            warn!(error = %e, "failed to persist normalized data file");
        }
    }
}

#[async_trait]
impl UpdateStore for JsonFileStore {
    async fn load(&self) -> Result<UpdatesDocument, StoreError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(UpdatesDocument::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let raw: Value = match serde_json::from_str(&text) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "data file was corrupted, resetting");
                return Ok(UpdatesDocument::default());
            }
        };

        let mut records = match raw {
            Value::Object(mut root) => match root.remove("updates") {
                Some(Value::Array(records)) => records,
                _ => Vec::new(),
            },
            _ => {
                warn!(path = %self.path.display(), "data file root is not an object, resetting");
                return Ok(UpdatesDocument::default());
            }
        };

        let changed = normalize_records(&mut records, &now_iso());
        let document = UpdatesDocument::from_records(records);
        if changed {
            self.persist_normalized(&document).await;
        }
        Ok(document)
    }

    async fn save(&self, document: &UpdatesDocument) -> Result<(), StoreError> {
        write_document(&self.path, document).await
    }
}

async fn write_document(path: &Path, document: &UpdatesDocument) -> Result<(), StoreError> {
    let body = serde_json::to_string_pretty(document)?;
    tokio::fs::write(path, body)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entities::Update;
    use serde_json::json;
    use tempfile::TempDir;

    async fn store_in(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::open(dir.path().join("data.json")).await.unwrap()
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn open_creates_empty_document() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        assert_eq!(read_json(store.path()), json!({"updates": []}));
        assert!(store.load().await.unwrap().updates.is_empty());
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore {
            path: dir.path().join("absent.json"),
        };
        assert!(store.load().await.unwrap().updates.is_empty());
    }

    #[tokio::test]
    async fn corrupted_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().await.unwrap().updates.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_keeps_insertion_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        let doc = UpdatesDocument {
            updates: vec![
                Update {
                    id: 2,
                    title: "second".into(),
                    content: "".into(),
                    kind: "General".into(),
                    datetime: "2025-01-01T00:00:00".into(),
                },
                Update {
                    id: 1,
                    title: "first".into(),
                    content: "body".into(),
                    kind: "alert".into(),
                    datetime: "2025-02-01T00:00:00".into(),
                },
            ],
        };
        store.save(&doc).await.unwrap();
        assert_eq!(store.load().await.unwrap(), doc);
        assert!(!store.backup_path().exists());
    }

    #[tokio::test]
    async fn legacy_description_is_migrated_on_disk() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        std::fs::write(
            store.path(),
            json!({"updates": [{"title": "Old", "description": "x"}]}).to_string(),
        )
        .unwrap();

        let doc = store.load().await.unwrap();
        assert_eq!(doc.updates.len(), 1);
        assert_eq!(doc.updates[0].content, "x");
        assert_eq!(doc.updates[0].id, 1);
        assert_eq!(doc.updates[0].kind, "general");

        let on_disk = read_json(store.path());
        assert_eq!(on_disk["updates"][0]["content"], "x");
        assert!(on_disk["updates"][0].get("description").is_none());

        let backup = read_json(&store.backup_path());
        assert_eq!(backup, on_disk);

        // A second load finds nothing left to repair.
        assert_eq!(store.load().await.unwrap(), doc);
    }

    #[tokio::test]
    async fn mistyped_fields_survive_a_later_save() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        std::fs::write(
            store.path(),
            json!({"updates": [{
                "id": 1, "title": "Exam", "content": 101, "type": 5,
                "datetime": "2025-01-01T00:00:00",
            }]})
            .to_string(),
        )
        .unwrap();

        let doc = store.load().await.unwrap();
        assert_eq!(doc.updates.len(), 1);
        assert_eq!(doc.updates[0].content, "101");
        assert_eq!(doc.updates[0].kind, "5");
        assert_eq!(read_json(&store.backup_path())["updates"][0]["content"], "101");

        store.save(&doc).await.unwrap();
        let on_disk = read_json(store.path());
        assert_eq!(on_disk["updates"][0]["title"], "Exam");
        assert_eq!(on_disk["updates"][0]["content"], "101");
    }

    #[tokio::test]
    async fn unwritable_backup_does_not_fail_load() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir).await;
        std::fs::create_dir(store.backup_path()).unwrap();
        std::fs::write(
            store.path(),
            json!({"updates": [{"title": "Old", "description": "x"}]}).to_string(),
        )
        .unwrap();

        let doc = store.load().await.unwrap();
        assert_eq!(doc.updates.len(), 1);
        assert_eq!(doc.updates[0].content, "x");
        assert!(store.backup_path().is_dir());
        assert_eq!(read_json(store.path())["updates"][0]["content"], "x");
    }
}
