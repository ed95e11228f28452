use chrono::{DateTime, Utc};
use serde_json::Value;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use crate::storage::{StorageError, StoredFileInfo};
use crate::utils::check_storage_key;

/// Blob store keeping each payload as one JSON file under a root directory.
///
/// Keys are plain file names. Writing an existing key replaces it.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where a key lives, as reported back to clients
    pub fn location(&self, key: &str) -> String {
        self.root.join(key).display().to_string()
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        check_storage_key(key).map_err(|reason| {
            warn!("Rejected storage key '{}': {}", key, reason);
            StorageError::InvalidKey(format!("{key}: {reason}"))
        })?;
        Ok(self.root.join(key))
    }

    /// Write a payload pretty-printed under `key`, returning its location
    #[instrument(skip(self, data), fields(root = %self.root.display()))]
    pub async fn write_json(&self, key: &str, data: &Value) -> Result<String, StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).await?;

        let bytes = serde_json::to_vec_pretty(data)?;
        let size = bytes.len();

        // Each write gets its own temp file beside the target; the rename is
        // atomic, so overlapping writers to one key leave the last one in place
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = NamedTempFile::new_in(&root)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(std::io::Error::other)??;

        info!("Stored {} bytes as {}", size, key);
        Ok(self.location(key))
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn read_json(&self, key: &str) -> Result<Value, StorageError> {
        let path = self.path_for(key)?;

        let content = match fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("File not found: {}", key);
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        debug!("Read {} bytes from {}", content.len(), key);
        serde_json::from_slice(&content).map_err(|e| {
            warn!("Invalid JSON in file {}: {}", key, e);
            StorageError::InvalidJson(key.to_string())
        })
    }

    /// All stored payloads, sorted by file name
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn list(&self) -> Result<Vec<StoredFileInfo>, StorageError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Storage root does not exist yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let filename = entry.file_name().to_string_lossy().into_owned();
            if check_storage_key(&filename).is_err() {
                continue;
            }

            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            files.push(StoredFileInfo {
                filename,
                size: metadata.len(),
                created: metadata.created().ok().map(DateTime::<Utc>::from),
                updated: metadata.modified().ok().map(DateTime::<Utc>::from),
                content_type: "application/json".to_string(),
            });
        }

        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        debug!("Listed {} files from storage", files.len());
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let payload = json!({"daily": {"time": ["2023-01-01"], "temperature_2m_max": [5.2]}});
        let location = store.write_json("a.json", &payload).await.unwrap();

        assert!(location.ends_with("a.json"));
        assert_eq!(store.read_json("a.json").await.unwrap(), payload);
        assert!(dir.path().join("a.json").exists());
    }

    #[tokio::test]
    async fn test_same_key_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.write_json("a.json", &json!({"v": 1})).await.unwrap();
        store.write_json("a.json", &json!({"v": 2})).await.unwrap();

        assert_eq!(store.read_json("a.json").await.unwrap(), json!({"v": 2}));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_overlapping_writes_to_one_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        for round in 0..20 {
            let writers: Vec<_> = (0..4)
                .map(|writer| {
                    let store = store.clone();
                    tokio::spawn(async move {
                        store
                            .write_json("same.json", &json!({"round": round, "writer": writer}))
                            .await
                    })
                })
                .collect();

            for handle in writers {
                handle.await.unwrap().unwrap();
            }

            let stored = store.read_json("same.json").await.unwrap();
            assert_eq!(stored["round"], round);
        }

        // No temp files left behind
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(matches!(
            store.read_json("missing.json").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(matches!(
            store.read_json("../outside.json").await,
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            store.write_json("x.txt", &json!({})).await,
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_json_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        let store = FileStore::new(dir.path());

        assert!(matches!(
            store.read_json("bad.json").await,
            Err(StorageError::InvalidJson(_))
        ));
    }

    #[tokio::test]
    async fn test_list_skips_non_json_and_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("not-created"));
        assert!(store.list().await.unwrap().is_empty());

        let store = FileStore::new(dir.path());
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        store.write_json("b.json", &json!({})).await.unwrap();
        store.write_json("a.json", &json!({"k": true})).await.unwrap();

        let files = store.list().await.unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
        assert!(files[0].size > 0);
        assert_eq!(files[0].content_type, "application/json");
    }
}
