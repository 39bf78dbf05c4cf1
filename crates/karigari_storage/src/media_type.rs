//! Media type enumeration.

/// Type of media content handled by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum MediaType {
    /// Image content (PNG, JPEG, WebP, etc.)
    #[display("image")]
    Image,
    /// Audio content (MP3, WAV, OGG, etc.)
    #[display("audio")]
    Audio,
}

impl MediaType {
    /// Convert to string representation for storage paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Audio => "audio",
        }
    }

    /// Directory name under the storage root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            MediaType::Image => "images",
            MediaType::Audio => "audio",
        }
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaType::Image),
            "audio" => Ok(MediaType::Audio),
            _ => Err(format!("Unknown media type: {}", s)),
        }
    }
}
