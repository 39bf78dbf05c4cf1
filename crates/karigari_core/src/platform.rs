//! Social platform tags for platform-specific captions.

use serde::{Deserialize, Serialize};

/// A social media platform a caption set is tailored to.
///
/// Parsing is case-insensitive; unknown platforms are preserved (lowercased)
/// so their captions still get a stable map key and a generic tone.
///
/// # Examples
///
/// ```
/// use karigari_core::Platform;
///
/// assert_eq!(Platform::parse("Instagram"), Platform::Instagram);
/// assert_eq!(Platform::parse("TWITTER"), Platform::Twitter);
/// assert_eq!(
///     Platform::parse("Pinterest"),
///     Platform::Other("pinterest".to_string())
/// );
/// assert_eq!(Platform::Instagram.key(), "instagram");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    /// Instagram
    Instagram,
    /// Facebook
    Facebook,
    /// Twitter / X
    Twitter,
    /// Any other platform, lowercased
    Other(String),
}

impl Platform {
    /// Parse a platform name, case-insensitively. Never fails.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "instagram" => Platform::Instagram,
            "facebook" => Platform::Facebook,
            "twitter" => Platform::Twitter,
            other => Platform::Other(other.to_string()),
        }
    }

    /// Canonical lowercase key used in the platform-captions map.
    pub fn key(&self) -> &str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl From<String> for Platform {
    fn from(name: String) -> Self {
        Platform::parse(&name)
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.key().to_string()
    }
}
