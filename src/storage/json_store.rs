use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::catalog::{Game, GAME_SCHEMA_VERSION};
use crate::storage::{Collection, GameStore, StorageBackend, StoreError};

/// On-disk layout of one collection file.
#[derive(Serialize, Deserialize)]
struct CollectionFile {
    schema_version: u8,
    games: Vec<Game>,
}

#[derive(Serialize)]
struct CollectionFileRef<'a> {
    schema_version: u8,
    games: &'a [Game],
}

/// Flat-file catalog store: each collection is one serialized JSON blob.
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Open the store rooted at `data_dir`, creating the directory if needed.
    pub async fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir).await?;
        Ok(Self { data_dir })
    }

    fn collection_path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(format!("{}.json", collection.name()))
    }

    fn lock_path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(format!(".{}.lock", collection.name()))
    }

    /// Replace the file at `target` with `content`.
    ///
    /// Writers serialize on a sidecar lock file, so `target` only ever holds a
    /// complete document: it is produced by renaming a fully synced sibling.
    fn commit_file(target: &Path, lock: &Path, content: &str) -> Result<(), StoreError> {
        use std::fs::{File, OpenOptions};
        use std::io::Write;

        let guard = OpenOptions::new().create(true).truncate(false).write(true).open(lock)?;
        guard.lock_exclusive()?;

        let dir = target.parent().unwrap_or_else(|| Path::new("."));
        let stem = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "collection".to_string());

        let mut staged = None;
        for attempt in 0..64u8 {
            let candidate = dir.join(format!(".{}.{}.{}.partial", stem, std::process::id(), attempt));
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(file) => {
                    staged = Some((candidate, file));
                    break;
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(StoreError::Io(e)),
            }
        }
        let (staged_path, mut staged_file) = staged.ok_or_else(|| {
            StoreError::Io(std::io::Error::new(
                ErrorKind::AlreadyExists,
                format!("no free staging name next to {}", target.display()),
            ))
        })?;

        let written = staged_file
            .write_all(content.as_bytes())
            .and_then(|_| staged_file.sync_all())
            .and_then(|_| std::fs::rename(&staged_path, target));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&staged_path);
            return Err(StoreError::Io(e));
        }

        // Directory fsync is not supported everywhere
        if let Ok(dir_handle) = File::open(dir) {
            let _ = dir_handle.sync_all();
        }
        guard.unlock()?;
        Ok(())
    }
}

#[async_trait]
impl GameStore for JsonFileStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Json
    }

    async fn exists(&self, collection: Collection) -> Result<bool, StoreError> {
        match fs::metadata(self.collection_path(collection)).await {
            Ok(meta) => Ok(meta.len() > 0),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn read_all(&self, collection: Collection) -> Result<Vec<Game>, StoreError> {
        let path = self.collection_path(collection);
        let data = match fs::read_to_string(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };
        // Files copied in by hand may be empty or NUL-padded
        let cleaned = data.trim_start_matches('\0');
        if cleaned.trim().is_empty() {
            return Ok(Vec::new());
        }
        let file: CollectionFile = serde_json::from_str(cleaned)?;
        if file.schema_version != GAME_SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                collection,
                expected: GAME_SCHEMA_VERSION,
                found: file.schema_version,
            });
        }
        Ok(file.games)
    }

    async fn replace_all(&self, collection: Collection, games: &[Game]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&CollectionFileRef {
            schema_version: GAME_SCHEMA_VERSION,
            games,
        })?;
        Self::commit_file(
            &self.collection_path(collection),
            &self.lock_path(collection),
            &content,
        )
    }
}
