//! Content-addressable media storage and record stores for Karigari.
//!
//! This crate provides the persistence backends behind the orchestrators:
//!
//! - **Media storage**: pluggable blob backends behind the [`MediaStorage`]
//!   trait. Files are stored by SHA-256 hash for automatic deduplication,
//!   written atomically, and surfaced through publicly resolvable URLs.
//! - **Upload spooling**: [`UploadSpool`] parks inbound uploads in local
//!   temp files whose deletion is guaranteed on every exit path.
//! - **Record stores**: document-oriented [`RecordStore`] backends
//!   (in-memory and one-JSON-file-per-record) whose patch application is
//!   an atomic read-modify-write.
//!
//! # Example
//!
//! ```rust
//! use karigari_storage::{FileSystemStorage, MediaStorage, MediaMetadata, MediaType};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = FileSystemStorage::new("/tmp/media", "http://localhost:8080/media")?;
//! let metadata = MediaMetadata {
//!     media_type: MediaType::Image,
//!     mime_type: "image/png".to_string(),
//!     filename: Some("saree.png".to_string()),
//! };
//!
//! let data = vec![0u8; 1024]; // PNG data
//! let reference = storage.store(&data, &metadata).await?;
//! assert!(reference.public_url.starts_with("http://localhost:8080/media/"));
//!
//! let retrieved = storage.retrieve(&reference).await?;
//! assert_eq!(data, retrieved);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod media_type;
mod metadata;
mod records;
mod reference;
mod spool;
mod storage;

pub use filesystem::FileSystemStorage;
pub use karigari_error::{StorageError, StorageErrorKind};
pub use karigari_interface::RecordStore;
pub use media_type::MediaType;
pub use metadata::MediaMetadata;
pub use records::{FileSystemRecordStore, MemoryRecordStore};
pub use reference::MediaReference;
pub use spool::{SpooledFile, UploadSpool};
pub use storage::MediaStorage;
