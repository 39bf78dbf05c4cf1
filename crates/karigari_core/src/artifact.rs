//! Source artifacts and generated design mockups.

use crate::ProductKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a source artifact.
///
/// `generating` is reachable exactly once: generation is only permitted
/// from `uploaded`. `failed` is terminal and reached when every mockup in
/// a batch fails.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStatus {
    /// Uploaded, awaiting generation
    #[display("uploaded")]
    Uploaded,
    /// A generation batch is in flight
    #[display("generating")]
    Generating,
    /// At least one mockup was generated
    #[display("completed")]
    Completed,
    /// Every mockup in the batch failed
    #[display("failed")]
    Failed,
}

/// One AI-generated product mockup. Appended to its artifact, never
/// mutated in place.
///
/// # Examples
///
/// ```
/// use karigari_core::{GeneratedImage, ProductKind};
/// use chrono::Utc;
///
/// let image = GeneratedImage {
///     url: "https://media.example/abc.png".to_string(),
///     product_kind: ProductKind::Bag,
///     created_at: Utc::now(),
/// };
/// assert_eq!(image.product_kind.tag(), "bag");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    /// Publicly resolvable URL of the mockup
    pub url: String,
    /// Product the design was rendered onto
    pub product_kind: ProductKind,
    /// When the mockup was generated
    pub created_at: DateTime<Utc>,
}

/// An uploaded source image awaiting or having undergone design generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceArtifact {
    /// Record identifier
    pub id: Uuid,
    /// Identifier of the owning user; all access is owner-restricted
    pub owner_id: String,
    /// Publicly resolvable URL of the uploaded source image
    pub source_url: String,
    /// Mockups generated from this artifact, in generation order
    pub generated_images: Vec<GeneratedImage>,
    /// Lifecycle status
    pub status: ArtifactStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl SourceArtifact {
    /// Create a fresh artifact in `uploaded` status.
    pub fn new(owner_id: impl Into<String>, source_url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            source_url: source_url.into(),
            generated_images: Vec::new(),
            status: ArtifactStatus::Uploaded,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Patch for a [`SourceArtifact`].
///
/// Merge semantics: `status: None` leaves the status untouched;
/// `append_images` entries are appended in order and never replace
/// existing entries.
///
/// # Examples
///
/// ```
/// use karigari_core::{ArtifactPatch, ArtifactStatus};
///
/// let patch = ArtifactPatch::status(ArtifactStatus::Generating);
/// assert!(patch.append_images.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArtifactPatch {
    /// New status, if the status should change
    pub status: Option<ArtifactStatus>,
    /// Mockups to append
    pub append_images: Vec<GeneratedImage>,
}

impl ArtifactPatch {
    /// Patch that only changes the status.
    pub fn status(status: ArtifactStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Patch that appends mockups and sets a new status.
    pub fn append(images: Vec<GeneratedImage>, status: ArtifactStatus) -> Self {
        Self {
            status: Some(status),
            append_images: images,
        }
    }
}
