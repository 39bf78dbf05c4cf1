//! Design generation orchestrator: source image to product mockups.

use crate::prompt;
use chrono::Utc;
use karigari_core::{
    ArtifactPatch, ArtifactStatus, GeneratedImage, ImageRequest, ProductKind, SourceArtifact,
};
use karigari_error::{
    AccessError, BackendError, KarigariResult, ModelError, ModelErrorKind, NotFoundError,
    ValidationError,
};
use karigari_interface::{ImageGenerator, RecordStore};
use karigari_storage::{MediaMetadata, MediaStorage, MediaType, UploadSpool};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Operational limits for design generation.
#[derive(Debug, Clone)]
pub struct DesignLimits {
    /// Upper bound on mockups per generation request
    pub max_mockups: u32,
    /// Deadline for each image model call
    pub call_timeout: Duration,
}

impl Default for DesignLimits {
    fn default() -> Self {
        Self {
            max_mockups: 5,
            call_timeout: Duration::from_secs(60),
        }
    }
}

/// One failed iteration in a mockup batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockupFailure {
    /// Zero-based iteration index that failed
    pub index: u32,
    /// Human-readable failure message
    pub message: String,
}

/// Aggregate result of a mockup generation batch.
///
/// Generation is best-effort: the batch completes when at least one
/// mockup succeeds, and `failures` reports the iterations that did not.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockupBatch {
    /// The artifact the mockups belong to
    pub artifact_id: Uuid,
    /// Successfully generated mockups, in generation order
    pub generated: Vec<GeneratedImage>,
    /// Per-iteration failures
    pub failures: Vec<MockupFailure>,
}

/// Orchestrates the design workflow: upload a source image, generate
/// product mockups from it, and read the results back.
///
/// All collaborators are injected as shared handles constructed once at
/// startup.
pub struct DesignStudio {
    records: Arc<dyn RecordStore<SourceArtifact>>,
    media: Arc<dyn MediaStorage>,
    imager: Arc<dyn ImageGenerator>,
    spool: UploadSpool,
    limits: DesignLimits,
}

impl DesignStudio {
    /// Create a studio over the given collaborators.
    pub fn new(
        records: Arc<dyn RecordStore<SourceArtifact>>,
        media: Arc<dyn MediaStorage>,
        imager: Arc<dyn ImageGenerator>,
        spool: UploadSpool,
        limits: DesignLimits,
    ) -> Self {
        Self {
            records,
            media,
            imager,
            spool,
            limits,
        }
    }

    /// Store an uploaded source image and create its artifact record.
    ///
    /// The upload is spooled to a local temp file before transfer to the
    /// blob store; the spool file is removed on success and failure alike.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty upload, or a storage error
    /// if the blob write fails.
    #[tracing::instrument(skip(self, bytes), fields(owner = owner_id, size = bytes.len()))]
    pub async fn upload_source(
        &self,
        owner_id: &str,
        filename: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> KarigariResult<SourceArtifact> {
        if bytes.is_empty() {
            return Err(ValidationError::new("No image file uploaded").into());
        }

        let spooled = self.spool.spool(filename, bytes).await?;
        let metadata = MediaMetadata {
            media_type: MediaType::Image,
            mime_type: mime_type.to_string(),
            filename: Some(filename.to_string()),
        };

        let stored = self.media.store_file(spooled.path(), &metadata).await;

        // Spool removal is owed on success and failure alike; a cleanup
        // failure after a successful store is logged, not surfaced.
        if let Err(e) = spooled.remove().await {
            tracing::warn!(error = %e, "Spool cleanup failed after upload");
        }

        let reference = stored?;
        let artifact = SourceArtifact::new(owner_id, reference.public_url);
        self.records.insert(&artifact).await?;

        tracing::info!(artifact_id = %artifact.id, "Uploaded source artifact");
        Ok(artifact)
    }

    /// Generate up to `count` mockups (capped at the configured maximum)
    /// for an owned artifact.
    ///
    /// Generation is best-effort: each iteration is one model call plus
    /// one blob write, and a failed iteration is recorded rather than
    /// aborting the batch. The artifact completes when at least one
    /// mockup succeeds and fails only when every iteration does.
    ///
    /// # Errors
    ///
    /// Not-found/forbidden for missing or foreign artifacts, a validation
    /// error when the artifact is not in `uploaded` status (generation is
    /// permitted exactly once), or a backend error when the whole batch
    /// fails.
    #[tracing::instrument(skip(self), fields(owner = owner_id, artifact = %artifact_id, product = %product))]
    pub async fn generate_mockups(
        &self,
        owner_id: &str,
        artifact_id: Uuid,
        product: &ProductKind,
        count: u32,
    ) -> KarigariResult<MockupBatch> {
        let artifact = self.load_owned(owner_id, artifact_id).await?;

        if artifact.status != ArtifactStatus::Uploaded {
            return Err(ValidationError::new(format!(
                "design {} is {} and cannot be generated again",
                artifact_id, artifact.status
            ))
            .into());
        }
        if count == 0 {
            return Err(ValidationError::new("count must be at least 1").into());
        }
        let requested = count.min(self.limits.max_mockups);

        self.records
            .update(artifact_id, ArtifactPatch::status(ArtifactStatus::Generating))
            .await?;

        let prompt = prompt::mockup_prompt(product);
        let mut generated = Vec::new();
        let mut failures = Vec::new();

        for index in 0..requested {
            match self.render_one(&prompt, product).await {
                Ok(image) => generated.push(image),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Mockup generation failed");
                    failures.push(MockupFailure {
                        index,
                        message: e.to_string(),
                    });
                }
            }
        }

        if generated.is_empty() {
            self.records
                .update(artifact_id, ArtifactPatch::status(ArtifactStatus::Failed))
                .await?;
            let first = failures
                .first()
                .map(|f| f.message.clone())
                .unwrap_or_default();
            return Err(BackendError::new(format!(
                "all {} mockup generations failed: {}",
                requested, first
            ))
            .into());
        }

        self.records
            .update(
                artifact_id,
                ArtifactPatch::append(generated.clone(), ArtifactStatus::Completed),
            )
            .await?;

        tracing::info!(
            generated = generated.len(),
            failed = failures.len(),
            "Mockup batch complete"
        );

        Ok(MockupBatch {
            artifact_id,
            generated,
            failures,
        })
    }

    /// All artifacts belonging to the caller, newest first.
    pub async fn list_designs(&self, owner_id: &str) -> KarigariResult<Vec<SourceArtifact>> {
        self.records.list_owned(owner_id).await
    }

    /// One owned artifact.
    ///
    /// # Errors
    ///
    /// Not-found for missing artifacts, forbidden for foreign ones.
    pub async fn get_design(
        &self,
        owner_id: &str,
        artifact_id: Uuid,
    ) -> KarigariResult<SourceArtifact> {
        self.load_owned(owner_id, artifact_id).await
    }

    /// One model call plus one blob write.
    async fn render_one(
        &self,
        prompt: &str,
        product: &ProductKind,
    ) -> KarigariResult<GeneratedImage> {
        let request = ImageRequest::new(prompt);

        let response = match tokio::time::timeout(
            self.limits.call_timeout,
            self.imager.generate_image(&request),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(ModelError::new(ModelErrorKind::Timeout(
                    self.limits.call_timeout.as_secs(),
                ))
                .into());
            }
        };

        let payload = response
            .images
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::new(ModelErrorKind::EmptyResponse))?;

        let metadata = MediaMetadata {
            media_type: MediaType::Image,
            mime_type: payload
                .mime
                .clone()
                .unwrap_or_else(|| "image/png".to_string()),
            filename: None,
        };
        let reference = self.media.store(&payload.data, &metadata).await?;

        Ok(GeneratedImage {
            url: reference.public_url,
            product_kind: product.clone(),
            created_at: Utc::now(),
        })
    }

    async fn load_owned(
        &self,
        owner_id: &str,
        artifact_id: Uuid,
    ) -> KarigariResult<SourceArtifact> {
        let artifact = self
            .records
            .get(artifact_id)
            .await?
            .ok_or_else(|| NotFoundError::new(format!("design {}", artifact_id)))?;

        if artifact.owner_id != owner_id {
            return Err(AccessError::forbidden(format!(
                "design {} belongs to another user",
                artifact_id
            ))
            .into());
        }

        Ok(artifact)
    }
}
