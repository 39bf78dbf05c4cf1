//! Output types from model responses.

use serde::{Deserialize, Serialize};

/// Supported output types from generative models.
///
/// # Examples
///
/// ```
/// use karigari_core::Output;
///
/// let text = Output::Text("A rich product description".to_string());
/// let image = Output::Image {
///     mime: Some("image/png".to_string()),
///     data: vec![0x89, 0x50, 0x4E, 0x47],
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Plain text output.
    Text(String),

    /// Generated image output.
    Image {
        /// MIME type of the image
        mime: Option<String>,
        /// Binary image data
        data: Vec<u8>,
    },
}

impl Output {
    /// The text content, if this output is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Output::Text(text) => Some(text),
            _ => None,
        }
    }
}
