//! The `Record` trait: identity, ownership, and patch application.

use crate::{ArtifactPatch, SourceArtifact, StoryPatch, StoryRecord};
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// A structured record that can live in a document-oriented store.
///
/// Records carry their own identity and owner, and mutate only through an
/// explicit patch type with defined merge semantics. Stores apply patches
/// inside an atomic read-modify-write and refresh `updated_at` via
/// [`Record::touch`].
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Patch type with defined merge semantics.
    type Patch: Send + 'static;

    /// Collection name in the record store.
    const COLLECTION: &'static str;

    /// Record identifier.
    fn id(&self) -> Uuid;

    /// Identifier of the owning user.
    fn owner_id(&self) -> &str;

    /// Creation timestamp, used for newest-first owner listings.
    fn created_at(&self) -> DateTime<Utc>;

    /// Apply a patch. Fields absent from the patch are untouched.
    fn apply(&mut self, patch: Self::Patch);

    /// Refresh the update timestamp.
    fn touch(&mut self, at: DateTime<Utc>);
}

impl Record for SourceArtifact {
    type Patch = ArtifactPatch;

    const COLLECTION: &'static str = "designs";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn apply(&mut self, patch: ArtifactPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.generated_images.extend(patch.append_images);
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

impl Record for StoryRecord {
    type Patch = StoryPatch;

    const COLLECTION: &'static str = "stories";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn apply(&mut self, patch: StoryPatch) {
        for (platform, captions) in patch.platform_captions {
            self.platform_captions.insert(platform, captions);
        }
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArtifactStatus, GeneratedImage, PlatformCaption, ProductKind};

    fn mockup(url: &str) -> GeneratedImage {
        GeneratedImage {
            url: url.to_string(),
            product_kind: ProductKind::Bag,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn artifact_patch_appends_without_replacing() {
        let mut artifact = SourceArtifact::new("user-1", "https://media/src.png");
        artifact.apply(ArtifactPatch::append(
            vec![mockup("a"), mockup("b")],
            ArtifactStatus::Completed,
        ));
        artifact.apply(ArtifactPatch {
            status: None,
            append_images: vec![mockup("c")],
        });

        let urls: Vec<_> = artifact.generated_images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, ["a", "b", "c"]);
        assert_eq!(artifact.status, ArtifactStatus::Completed);
    }

    #[test]
    fn story_patch_overwrites_only_its_platform() {
        let mut story = StoryRecord::new(
            "user-1",
            "Handwoven cotton saree",
            "Cotton Saree",
            "textile",
            "A rich description",
            vec!["A".to_string()],
            vec!["#Handmade".to_string()],
        );

        let caption = |text: &str, platform: &str| PlatformCaption {
            text: text.to_string(),
            hashtags: vec![],
            platform: platform.to_string(),
        };

        story.apply(StoryPatch::platform(
            "instagram",
            vec![caption("first", "instagram")],
        ));
        story.apply(StoryPatch::platform(
            "facebook",
            vec![caption("fb", "facebook")],
        ));
        story.apply(StoryPatch::platform(
            "instagram",
            vec![caption("second", "instagram")],
        ));

        assert_eq!(story.platform_captions.len(), 2);
        assert_eq!(story.platform_captions["instagram"][0].text, "second");
        assert_eq!(story.platform_captions["facebook"][0].text, "fb");
    }
}
