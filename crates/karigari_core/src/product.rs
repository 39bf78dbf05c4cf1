//! Product kind tags for mockup generation.

use serde::{Deserialize, Serialize};

/// The product a design mockup is rendered onto.
///
/// Known kinds carry a curated prompt fragment; anything else is preserved
/// verbatim as `Other` and rendered with a generic fragment.
///
/// # Examples
///
/// ```
/// use karigari_core::ProductKind;
///
/// assert_eq!(ProductKind::parse("bag"), ProductKind::Bag);
/// assert_eq!(ProductKind::parse("WALLART"), ProductKind::WallArt);
/// assert_eq!(
///     ProductKind::parse("lampshade"),
///     ProductKind::Other("lampshade".to_string())
/// );
/// assert_eq!(ProductKind::Bag.to_string(), "bag");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductKind {
    /// Handbag or tote bag
    Bag,
    /// Silk scarf
    Scarf,
    /// Decorative cushion or pillow cover
    Cushion,
    /// Framed wall art
    WallArt,
    /// Contemporary clothing
    Clothing,
    /// Any other product; the original tag is preserved
    Other(String),
}

impl ProductKind {
    /// Parse a product tag, case-insensitively. Never fails; unknown tags
    /// become `Other` with the original string preserved.
    pub fn parse(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "bag" => ProductKind::Bag,
            "scarf" => ProductKind::Scarf,
            "cushion" => ProductKind::Cushion,
            "wallart" => ProductKind::WallArt,
            "clothing" => ProductKind::Clothing,
            _ => ProductKind::Other(tag.to_string()),
        }
    }

    /// Canonical tag string.
    pub fn tag(&self) -> &str {
        match self {
            ProductKind::Bag => "bag",
            ProductKind::Scarf => "scarf",
            ProductKind::Cushion => "cushion",
            ProductKind::WallArt => "wallArt",
            ProductKind::Clothing => "clothing",
            ProductKind::Other(tag) => tag,
        }
    }
}

impl std::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl From<String> for ProductKind {
    fn from(tag: String) -> Self {
        ProductKind::parse(&tag)
    }
}

impl From<ProductKind> for String {
    fn from(kind: ProductKind) -> Self {
        kind.tag().to_string()
    }
}
