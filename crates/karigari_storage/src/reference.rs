//! Media reference types.

use crate::MediaType;
use uuid::Uuid;

/// Reference to stored media.
///
/// Contains everything needed to retrieve the blob from its backend, plus
/// the publicly resolvable URL callers hand out.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaReference {
    /// Unique identifier for this media reference
    pub id: Uuid,
    /// SHA-256 hash of the content (for deduplication)
    pub content_hash: String,
    /// Storage backend name (e.g., "filesystem", "s3")
    pub storage_backend: String,
    /// Backend-relative path/key to the media
    pub storage_path: String,
    /// Publicly resolvable URL of the media
    pub public_url: String,
    /// Size of the media in bytes
    pub size_bytes: i64,
    /// Type of media
    pub media_type: MediaType,
    /// MIME type
    pub mime_type: String,
}
