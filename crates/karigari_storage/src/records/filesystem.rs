//! Filesystem-backed record store: one JSON document per record.

use async_trait::async_trait;
use chrono::Utc;
use karigari_core::Record;
use karigari_error::{KarigariResult, RecordError, RecordErrorKind};
use karigari_interface::RecordStore;
use std::marker::PhantomData;
use std::path::PathBuf;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Record store that persists each record as
/// `{base}/{collection}/{id}.json`.
///
/// Writes go through a temp file + rename for atomicity, and all
/// mutations serialize on a per-store mutex so `update` is an atomic
/// read-modify-write.
pub struct FileSystemRecordStore<R: Record> {
    dir: PathBuf,
    write_lock: Mutex<()>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> FileSystemRecordStore<R> {
    /// Create a store rooted at `{base}/{collection}`, creating the
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    pub fn new(base: impl Into<PathBuf>) -> KarigariResult<Self> {
        let dir = base.into().join(R::COLLECTION);
        std::fs::create_dir_all(&dir).map_err(|e| {
            RecordError::new(RecordErrorKind::Io(format!("{}: {}", dir.display(), e)))
        })?;

        tracing::info!(path = %dir.display(), collection = R::COLLECTION, "Created record store");
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
            _record: PhantomData,
        })
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    async fn read(&self, id: Uuid) -> KarigariResult<Option<R>> {
        let path = self.path_for(id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(RecordError::new(RecordErrorKind::Io(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };

        let record = serde_json::from_slice(&bytes).map_err(|e| {
            RecordError::new(RecordErrorKind::Deserialize(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        Ok(Some(record))
    }

    async fn write(&self, record: &R) -> KarigariResult<()> {
        let path = self.path_for(record.id());
        let bytes = serde_json::to_vec_pretty(record).map_err(|e| {
            RecordError::new(RecordErrorKind::Serialize(format!(
                "{}/{}: {}",
                R::COLLECTION,
                record.id(),
                e
            )))
        })?;

        // Temp file + rename keeps readers from seeing partial documents
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &bytes).await.map_err(|e| {
            RecordError::new(RecordErrorKind::Io(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;
        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            RecordError::new(RecordErrorKind::Io(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;
        Ok(())
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for FileSystemRecordStore<R> {
    #[tracing::instrument(skip(self, record), fields(collection = R::COLLECTION, id = %record.id()))]
    async fn insert(&self, record: &R) -> KarigariResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write(record).await
    }

    async fn get(&self, id: Uuid) -> KarigariResult<Option<R>> {
        self.read(id).await
    }

    #[tracing::instrument(skip(self, patch), fields(collection = R::COLLECTION, id = %id))]
    async fn update(&self, id: Uuid, patch: R::Patch) -> KarigariResult<R> {
        let _guard = self.write_lock.lock().await;

        let mut record = self.read(id).await?.ok_or_else(|| {
            RecordError::new(RecordErrorKind::NotFound(format!(
                "{}/{}",
                R::COLLECTION,
                id
            )))
        })?;

        record.apply(patch);
        record.touch(Utc::now());
        self.write(&record).await?;
        Ok(record)
    }

    async fn list_owned(&self, owner_id: &str) -> KarigariResult<Vec<R>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(|e| {
            RecordError::new(RecordErrorKind::Io(format!(
                "{}: {}",
                self.dir.display(),
                e
            )))
        })?;

        let mut owned = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            RecordError::new(RecordErrorKind::Io(format!(
                "{}: {}",
                self.dir.display(),
                e
            )))
        })? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| Uuid::parse_str(s).ok())
            else {
                continue;
            };
            if let Some(record) = self.read(id).await? {
                if record.owner_id() == owner_id {
                    owned.push(record);
                }
            }
        }

        owned.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(owned)
    }
}
