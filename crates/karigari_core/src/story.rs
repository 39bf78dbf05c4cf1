//! Story records: generated marketing text for a product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One platform-tailored caption with its own hashtags.
///
/// Text and hashtags come from the same generated caption block and are
/// never split across parses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformCaption {
    /// Caption body with hashtags stripped
    pub text: String,
    /// Hashtag tokens extracted from the same block, in order
    pub hashtags: Vec<String>,
    /// Canonical lowercase platform tag
    pub platform: String,
}

/// One generation session for marketing text: description, generic
/// captions, hashtags, and optional per-platform caption sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRecord {
    /// Record identifier
    pub id: Uuid,
    /// Identifier of the owning user; all access is owner-restricted
    pub owner_id: String,
    /// The artisan's free-form input text
    pub original_text: String,
    /// Product name (may be empty)
    pub product_name: String,
    /// Craft type (may be empty)
    pub craft_type: String,
    /// Generated product description
    pub description: String,
    /// Generic captions, in order of appearance in the model output
    pub captions: Vec<String>,
    /// Hashtag tokens, in order of appearance in the model output
    pub hashtags: Vec<String>,
    /// Platform tag -> ordered platform captions
    #[serde(default)]
    pub platform_captions: BTreeMap<String, Vec<PlatformCaption>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl StoryRecord {
    /// Create a fresh story record with no platform captions.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner_id: impl Into<String>,
        original_text: impl Into<String>,
        product_name: impl Into<String>,
        craft_type: impl Into<String>,
        description: impl Into<String>,
        captions: Vec<String>,
        hashtags: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            original_text: original_text.into(),
            product_name: product_name.into(),
            craft_type: craft_type.into(),
            description: description.into(),
            captions,
            hashtags,
            platform_captions: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Patch for a [`StoryRecord`].
///
/// Merge semantics: each key present in `platform_captions` overwrites
/// that platform's entry; absent keys are untouched.
///
/// # Examples
///
/// ```
/// use karigari_core::StoryPatch;
///
/// let patch = StoryPatch::platform("instagram", Vec::new());
/// assert!(patch.platform_captions.contains_key("instagram"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StoryPatch {
    /// Platform entries to overwrite
    pub platform_captions: BTreeMap<String, Vec<PlatformCaption>>,
}

impl StoryPatch {
    /// Patch that replaces a single platform's captions.
    pub fn platform(key: impl Into<String>, captions: Vec<PlatformCaption>) -> Self {
        let mut platform_captions = BTreeMap::new();
        platform_captions.insert(key.into(), captions);
        Self { platform_captions }
    }
}
