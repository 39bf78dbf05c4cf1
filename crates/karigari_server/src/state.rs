//! Shared application state: the process-wide collaborator handles.

use crate::ServerConfig;
use crate::config::IdentityMode;
use crate::identity::{RemoteTokenVerifier, StaticTokenVerifier};
use karigari_content::{DesignLimits, DesignStudio, StoryStudio};
use karigari_core::{SourceArtifact, StoryRecord};
use karigari_error::KarigariResult;
use karigari_interface::TokenVerifier;
use karigari_models::{GeminiClient, ImagenClient};
use karigari_storage::{FileSystemRecordStore, FileSystemStorage, UploadSpool};
use std::sync::Arc;
use std::time::Duration;

/// Process-wide handles, constructed once at startup and injected into
/// handlers by reference. Cloning shares the same underlying stores and
/// clients.
#[derive(Clone)]
pub struct AppState {
    /// Design workflow orchestrator
    pub designs: Arc<DesignStudio>,
    /// Story workflow orchestrator
    pub stories: Arc<StoryStudio>,
    /// Identity backend
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// Build the full production state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage root cannot be created or a model
    /// client cannot be constructed (e.g., missing API key).
    pub fn from_config(config: &ServerConfig) -> KarigariResult<Self> {
        let call_timeout = Duration::from_secs(config.model_call_timeout_secs);
        let tier = Some(config.models.provider_tier.as_str());

        let media = Arc::new(FileSystemStorage::new(
            &config.media_root,
            &config.public_base_url,
        )?);
        let design_records = Arc::new(FileSystemRecordStore::<SourceArtifact>::new(
            &config.records_root,
        )?);
        let story_records = Arc::new(FileSystemRecordStore::<StoryRecord>::new(
            &config.records_root,
        )?);
        let spool = UploadSpool::new(&config.uploads_root)?;

        let writer = Arc::new(GeminiClient::new_with_config(
            &config.models.text_model,
            tier,
        )?);
        let imager = Arc::new(ImagenClient::new_with_config(
            &config.models.image_model,
            tier,
        )?);

        let designs = Arc::new(DesignStudio::new(
            design_records,
            media,
            imager,
            spool,
            DesignLimits {
                max_mockups: config.max_mockups_per_request,
                call_timeout,
            },
        ));
        let stories = Arc::new(StoryStudio::new(story_records, writer, call_timeout));

        let verifier: Arc<dyn TokenVerifier> = match config.identity.mode {
            IdentityMode::Static => {
                Arc::new(StaticTokenVerifier::new(config.identity.tokens.clone()))
            }
            IdentityMode::Remote => {
                Arc::new(RemoteTokenVerifier::new(config.identity.endpoint.clone()))
            }
        };

        Ok(Self {
            designs,
            stories,
            verifier,
        })
    }

    /// Assemble state from pre-built parts (tests, alternative wiring).
    pub fn new(
        designs: Arc<DesignStudio>,
        stories: Arc<StoryStudio>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            designs,
            stories,
            verifier,
        }
    }
}
