//! Story generation orchestrator: input text to marketing copy.

use crate::prompt::{self, CraftBrief};
use crate::parse;
use karigari_core::{GenerateRequest, Platform, PlatformCaption, StoryPatch, StoryRecord};
use karigari_error::{
    AccessError, KarigariResult, ModelError, ModelErrorKind, NotFoundError, ValidationError,
};
use karigari_interface::{RecordStore, TextGenerator};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Orchestrates the story workflow: generate a description, captions,
/// and hashtags from the artisan's input, then tailor captions per
/// platform on demand.
///
/// All collaborators are injected as shared handles constructed once at
/// startup.
pub struct StoryStudio {
    records: Arc<dyn RecordStore<StoryRecord>>,
    writer: Arc<dyn TextGenerator>,
    call_timeout: Duration,
}

impl StoryStudio {
    /// Create a studio over the given collaborators.
    pub fn new(
        records: Arc<dyn RecordStore<StoryRecord>>,
        writer: Arc<dyn TextGenerator>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            records,
            writer,
            call_timeout,
        }
    }

    /// Generate a complete story record from the artisan's input.
    ///
    /// Issues three model calls (description, captions, hashtags). The
    /// calls are mutually independent, so they run concurrently and are
    /// assembled by call identity; the persisted result is deterministic
    /// regardless of completion order, and a failure is attributed to the
    /// call that produced it.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `text` is empty, or the failing
    /// call's model error; nothing is persisted on failure.
    #[tracing::instrument(skip(self, text), fields(owner = owner_id))]
    pub async fn generate_story(
        &self,
        owner_id: &str,
        text: &str,
        product_name: &str,
        craft_type: &str,
    ) -> KarigariResult<StoryRecord> {
        if text.trim().is_empty() {
            return Err(ValidationError::new("Text input is required").into());
        }

        let brief = CraftBrief {
            text,
            product_name,
            craft_type,
        };

        let (description, captions_text, hashtags_text) = tokio::try_join!(
            self.call_model("description", prompt::description_prompt(&brief)),
            self.call_model("captions", prompt::captions_prompt(&brief)),
            self.call_model("hashtags", prompt::hashtags_prompt(&brief)),
        )?;

        let captions = parse::parse_captions(&captions_text);
        let hashtags = parse::parse_hashtags(&hashtags_text);

        let story = StoryRecord::new(
            owner_id,
            text,
            product_name,
            craft_type,
            description,
            captions,
            hashtags,
        );
        self.records.insert(&story).await?;

        tracing::info!(
            story_id = %story.id,
            captions = story.captions.len(),
            hashtags = story.hashtags.len(),
            "Generated story"
        );
        Ok(story)
    }

    /// Generate platform-tailored captions for an owned story and merge
    /// them into its platform-captions map.
    ///
    /// The prompt is built from the record's stored original input. An
    /// existing entry for the same platform is overwritten; entries for
    /// other platforms are untouched.
    ///
    /// # Errors
    ///
    /// Not-found/forbidden for missing or foreign stories, or the model
    /// call's error.
    #[tracing::instrument(skip(self), fields(owner = owner_id, story = %story_id, platform = %platform))]
    pub async fn add_platform_captions(
        &self,
        owner_id: &str,
        story_id: Uuid,
        platform: &Platform,
    ) -> KarigariResult<Vec<PlatformCaption>> {
        let story = self.load_owned(owner_id, story_id).await?;

        let brief = CraftBrief {
            text: &story.original_text,
            product_name: &story.product_name,
            craft_type: &story.craft_type,
        };

        let reply = self
            .call_model(
                "platform captions",
                prompt::platform_captions_prompt(&brief, platform),
            )
            .await?;
        let captions = parse::parse_platform_captions(&reply, platform);

        self.records
            .update(story_id, StoryPatch::platform(platform.key(), captions.clone()))
            .await?;

        tracing::info!(count = captions.len(), "Added platform captions");
        Ok(captions)
    }

    /// All stories belonging to the caller, newest first.
    pub async fn list_stories(&self, owner_id: &str) -> KarigariResult<Vec<StoryRecord>> {
        self.records.list_owned(owner_id).await
    }

    /// One owned story.
    ///
    /// # Errors
    ///
    /// Not-found for missing stories, forbidden for foreign ones.
    pub async fn get_story(&self, owner_id: &str, story_id: Uuid) -> KarigariResult<StoryRecord> {
        self.load_owned(owner_id, story_id).await
    }

    /// One text model call under the configured deadline, with failures
    /// attributed to the named call.
    async fn call_model(&self, which: &'static str, prompt: String) -> KarigariResult<String> {
        let request = GenerateRequest::from_prompt(prompt);

        let result =
            match tokio::time::timeout(self.call_timeout, self.writer.generate(&request)).await {
                Ok(result) => result,
                Err(_) => Err(ModelError::new(ModelErrorKind::Timeout(
                    self.call_timeout.as_secs(),
                ))
                .into()),
            };

        match result {
            Ok(response) => Ok(response.text()),
            Err(e) => {
                tracing::error!(call = which, error = %e, "Story model call failed");
                Err(e)
            }
        }
    }

    async fn load_owned(&self, owner_id: &str, story_id: Uuid) -> KarigariResult<StoryRecord> {
        let story = self
            .records
            .get(story_id)
            .await?
            .ok_or_else(|| NotFoundError::new(format!("story {}", story_id)))?;

        if story.owner_id != owner_id {
            return Err(AccessError::forbidden(format!(
                "story {} belongs to another user",
                story_id
            ))
            .into());
        }

        Ok(story)
    }
}
