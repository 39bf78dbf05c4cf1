//! Storage trait definition.

use crate::{MediaMetadata, MediaReference};
use karigari_error::{KarigariResult, StorageError, StorageErrorKind};
use std::path::Path;

/// Trait for pluggable media storage backends.
///
/// Implementations handle the storage and retrieval of binary media data.
/// Every successful store returns a [`MediaReference`] carrying a publicly
/// resolvable URL; structured metadata about what the blob *means* lives
/// in the record store, not here.
#[async_trait::async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store media and return a reference.
    ///
    /// The implementation should:
    /// - Compute a content hash for deduplication
    /// - Store the binary data in its backend
    /// - Return a reference carrying the blob's public URL
    async fn store(
        &self,
        data: &[u8],
        metadata: &MediaMetadata,
    ) -> KarigariResult<MediaReference>;

    /// Store media from a local file (e.g., a spooled upload).
    ///
    /// The local file is NOT removed; the caller owns its lifecycle
    /// (see `UploadSpool` for the guaranteed-cleanup wrapper).
    async fn store_file(
        &self,
        path: &Path,
        metadata: &MediaMetadata,
    ) -> KarigariResult<MediaReference> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        self.store(&data, metadata).await
    }

    /// Retrieve media by reference.
    async fn retrieve(&self, reference: &MediaReference) -> KarigariResult<Vec<u8>>;

    /// Delete media by reference.
    async fn delete(&self, reference: &MediaReference) -> KarigariResult<()>;

    /// Check if media exists.
    async fn exists(&self, reference: &MediaReference) -> KarigariResult<bool>;
}
