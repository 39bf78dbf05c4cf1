//! Temp-file spooling for inbound uploads.
//!
//! Uploads are parked in a local spool file before transfer to the blob
//! backend. Removal of the spool file is a scoped-resource obligation:
//! it must happen on success, validation failure, and downstream failure
//! alike, so [`SpooledFile`] removes itself on `Drop` as a backstop for
//! the explicit [`SpooledFile::remove`] call on the happy path.

use karigari_error::{KarigariResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Spool directory for inbound uploads.
pub struct UploadSpool {
    dir: PathBuf,
}

impl UploadSpool {
    /// Create a spool rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> KarigariResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;
        Ok(Self { dir })
    }

    /// Write `bytes` to a fresh spool file, preserving the upload's
    /// original extension for the blob backend's benefit.
    ///
    /// # Errors
    ///
    /// Returns error if the spool file cannot be written.
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn spool(&self, original_name: &str, bytes: &[u8]) -> KarigariResult<SpooledFile> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        let path = self.dir.join(format!("{}{}", Uuid::new_v4(), extension));

        tokio::fs::write(&path, bytes).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %path.display(), "Spooled upload");
        Ok(SpooledFile {
            path,
            removed: false,
        })
    }
}

/// A spooled upload file that removes itself when dropped.
pub struct SpooledFile {
    path: PathBuf,
    removed: bool,
}

impl SpooledFile {
    /// Path of the spooled file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the spool file now and report failures.
    ///
    /// Prefer this on deliberate exit paths; `Drop` covers the rest
    /// silently.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be removed.
    pub async fn remove(mut self) -> KarigariResult<()> {
        self.removed = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::new(StorageErrorKind::SpoolCleanup(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
            .into()),
        }
    }
}

impl Drop for SpooledFile {
    fn drop(&mut self) {
        if !self.removed {
            if let Err(e) = std::fs::remove_file(&self.path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Failed to remove spool file on drop"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn explicit_remove_deletes_the_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let spool = UploadSpool::new(dir.path())?;

        let file = spool.spool("saree.png", b"bytes").await?;
        let path = file.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(path.extension().unwrap(), "png");

        file.remove().await?;
        assert!(!path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn drop_removes_the_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let spool = UploadSpool::new(dir.path())?;

        let path = {
            let file = spool.spool("upload", b"bytes").await?;
            file.path().to_path_buf()
            // file dropped here, simulating an error path
        };
        assert!(!path.exists());
        Ok(())
    }
}
