//! Request and response types for image generation.

use serde::{Deserialize, Serialize};

/// A single image generation request.
///
/// # Examples
///
/// ```
/// use karigari_core::ImageRequest;
///
/// let request = ImageRequest::new("A photorealistic mockup of a tote bag");
/// assert_eq!(request.sample_count, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// The prompt describing the desired image
    pub prompt: String,
    /// How many samples to request in one call
    pub sample_count: u32,
    /// Model identifier to use (client default when None)
    pub model: Option<String>,
}

impl ImageRequest {
    /// Create a request for a single sample of the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            sample_count: 1,
            model: None,
        }
    }
}

/// One generated image payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload {
    /// MIME type of the image (e.g., "image/png")
    pub mime: Option<String>,
    /// Decoded binary image data
    pub data: Vec<u8>,
}

/// The image generation response.
///
/// # Examples
///
/// ```
/// use karigari_core::{ImagePayload, ImageResponse};
///
/// let response = ImageResponse {
///     images: vec![ImagePayload {
///         mime: Some("image/png".to_string()),
///         data: vec![0x89, 0x50, 0x4E, 0x47],
///     }],
/// };
/// assert_eq!(response.images.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResponse {
    /// The generated images, in the order the model produced them
    pub images: Vec<ImagePayload>,
}
