//! Filesystem-based media storage implementation.
//!
//! This backend stores media files in a content-addressable filesystem
//! structure, organized by media type and content hash for automatic
//! deduplication. Stored files are exposed under a configured public base
//! URL (the server mounts the storage root at `/media`).

use crate::{MediaMetadata, MediaReference, MediaStorage, MediaType};
use karigari_error::{KarigariResult, StorageError, StorageErrorKind};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem storage backend.
///
/// Stores media files in a content-addressable structure:
/// `{base_path}/{type}/{hash[0:2]}/{hash[2:4]}/{hash}`
///
/// # Features
///
/// - **Content-addressable**: Files stored by SHA-256 hash
/// - **Automatic deduplication**: Same content = same hash = same file
/// - **Atomic writes**: Uses temp file + rename for atomicity
/// - **Public URLs**: `{public_base_url}/{relative path}` for every blob
pub struct FileSystemStorage {
    base_path: PathBuf,
    public_base_url: String,
}

impl FileSystemStorage {
    /// Create a new filesystem storage backend.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Arguments
    ///
    /// * `base_path` - Root directory for media storage
    /// * `public_base_url` - URL prefix under which `base_path` is served
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(base_path, public_base_url))]
    pub fn new(
        base_path: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
    ) -> KarigariResult<Self> {
        let base_path = base_path.into();
        let public_base_url = public_base_url.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Created filesystem storage");
        Ok(Self {
            base_path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Compute SHA-256 hash of data.
    fn compute_hash(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    /// Relative path for a given hash and media type.
    ///
    /// Structure: `{type}/{hash[0:2]}/{hash[2:4]}/{hash}`
    fn relative_path(hash: &str, media_type: MediaType) -> String {
        format!(
            "{}/{}/{}/{}",
            media_type.dir_name(),
            &hash[0..2],
            &hash[2..4],
            hash
        )
    }

    fn reference(
        &self,
        hash: String,
        relative: String,
        size: usize,
        metadata: &MediaMetadata,
    ) -> MediaReference {
        let public_url = format!("{}/{}", self.public_base_url, relative);
        MediaReference {
            id: Uuid::new_v4(),
            content_hash: hash,
            storage_backend: "filesystem".to_string(),
            storage_path: relative,
            public_url,
            size_bytes: size as i64,
            media_type: metadata.media_type,
            mime_type: metadata.mime_type.clone(),
        }
    }

    fn absolute(&self, relative: &str) -> PathBuf {
        self.base_path.join(relative)
    }

    /// Verify content hash matches expected hash.
    fn verify_hash(data: &[u8], expected_hash: &str) -> KarigariResult<()> {
        let actual_hash = Self::compute_hash(data);
        if actual_hash != expected_hash {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(format!(
                "Hash mismatch: expected {}, got {}",
                expected_hash, actual_hash
            )))
            .into());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl MediaStorage for FileSystemStorage {
    #[tracing::instrument(skip(self, data, metadata), fields(size = data.len(), media_type = %metadata.media_type))]
    async fn store(
        &self,
        data: &[u8],
        metadata: &MediaMetadata,
    ) -> KarigariResult<MediaReference> {
        let hash = Self::compute_hash(data);
        let relative = Self::relative_path(&hash, metadata.media_type);
        let path = self.absolute(&relative);

        // If file already exists, just return a reference (deduplication)
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(
                hash = %hash,
                path = %path.display(),
                "Media already exists, returning existing reference"
            );
            return Ok(self.reference(hash, relative, data.len(), metadata));
        }

        // Create parent directories
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(
            hash = %hash,
            path = %path.display(),
            size = data.len(),
            media_type = %metadata.media_type,
            "Stored media file"
        );

        Ok(self.reference(hash, relative, data.len(), metadata))
    }

    #[tracing::instrument(skip(self, reference), fields(hash = %reference.content_hash, path = %reference.storage_path))]
    async fn retrieve(&self, reference: &MediaReference) -> KarigariResult<Vec<u8>> {
        let path = self.absolute(&reference.storage_path);

        let data = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(reference.storage_path.clone()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        // Verify content hash
        Self::verify_hash(&data, &reference.content_hash)?;

        tracing::debug!(
            hash = %reference.content_hash,
            size = data.len(),
            "Retrieved media file"
        );

        Ok(data)
    }

    #[tracing::instrument(skip(self, reference), fields(hash = %reference.content_hash, path = %reference.storage_path))]
    async fn delete(&self, reference: &MediaReference) -> KarigariResult<()> {
        let path = self.absolute(&reference.storage_path);

        tokio::fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(reference.storage_path.clone()))
            } else {
                StorageError::new(StorageErrorKind::FileWrite(format!(
                    "delete {}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        tracing::info!(hash = %reference.content_hash, "Deleted media file");

        Ok(())
    }

    #[tracing::instrument(skip(self, reference), fields(hash = %reference.content_hash))]
    async fn exists(&self, reference: &MediaReference) -> KarigariResult<bool> {
        let path = self.absolute(&reference.storage_path);
        Ok(tokio::fs::try_exists(&path).await.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, FileSystemStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage =
            FileSystemStorage::new(dir.path(), "http://localhost:8080/media").unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn store_and_retrieve_round_trip() -> anyhow::Result<()> {
        let (_dir, storage) = storage();
        let data = b"not actually a png".to_vec();

        let reference = storage.store(&data, &MediaMetadata::png()).await?;
        assert_eq!(reference.storage_backend, "filesystem");
        assert!(reference.public_url.starts_with("http://localhost:8080/media/images/"));

        let retrieved = storage.retrieve(&reference).await?;
        assert_eq!(retrieved, data);
        Ok(())
    }

    #[tokio::test]
    async fn identical_content_deduplicates() -> anyhow::Result<()> {
        let (_dir, storage) = storage();
        let data = b"same bytes".to_vec();

        let first = storage.store(&data, &MediaMetadata::png()).await?;
        let second = storage.store(&data, &MediaMetadata::png()).await?;

        assert_eq!(first.content_hash, second.content_hash);
        assert_eq!(first.storage_path, second.storage_path);
        Ok(())
    }

    #[tokio::test]
    async fn store_file_reads_local_path() -> anyhow::Result<()> {
        let (_dir, storage) = storage();
        let spool_dir = tempfile::tempdir()?;
        let spooled = spool_dir.path().join("upload.png");
        tokio::fs::write(&spooled, b"spooled bytes").await?;

        let reference = storage.store_file(&spooled, &MediaMetadata::png()).await?;
        assert_eq!(storage.retrieve(&reference).await?, b"spooled bytes");
        // Spool files are the caller's to clean up
        assert!(spooled.exists());
        Ok(())
    }

    #[tokio::test]
    async fn retrieve_missing_is_not_found() {
        let (_dir, storage) = storage();
        let data = b"ephemeral".to_vec();
        let reference = storage.store(&data, &MediaMetadata::png()).await.unwrap();
        storage.delete(&reference).await.unwrap();

        assert!(!storage.exists(&reference).await.unwrap());
        assert!(storage.retrieve(&reference).await.is_err());
    }
}
