//! Trait definitions for generative model backends.

use async_trait::async_trait;
use karigari_core::{GenerateRequest, GenerateResponse, ImageRequest, ImageResponse};
use karigari_error::KarigariResult;

/// Core trait for text generation backends.
///
/// This provides the minimal interface for synchronous text generation.
/// Both capabilities of the model service are call-and-response; there is
/// no streaming requirement in this pipeline.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate model output given a multimodal request.
    async fn generate(&self, req: &GenerateRequest) -> KarigariResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier (e.g., "gemini-2.5-flash").
    fn model_name(&self) -> &str;
}

/// Trait for image generation backends.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one or more images from a prompt.
    async fn generate_image(&self, req: &ImageRequest) -> KarigariResult<ImageResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier (e.g., "imagen-3.0-generate-002").
    fn model_name(&self) -> &str;
}
