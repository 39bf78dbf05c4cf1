//! Imagen image generation client.
//!
//! Talks to the Generative Language API `:predict` endpoint used by the
//! Imagen model family. The request/response wire format is small enough
//! that this client speaks it directly over reqwest rather than going
//! through an SDK.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::instrument;

use karigari_core::{ImagePayload, ImageRequest, ImageResponse};
use karigari_error::{KarigariResult, ModelError, ModelErrorKind};
use karigari_interface::ImageGenerator;
use karigari_rate_limit::{KarigariConfig, RateLimiter, TierConfig};

use crate::ModelResult;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Wire format of one predict instance.
#[derive(Debug, Clone, Serialize)]
struct PredictInstance {
    prompt: String,
}

/// Wire format of predict parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
}

/// Wire format of a predict request.
#[derive(Debug, Clone, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

/// Wire format of one returned prediction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: String,
    #[serde(default)]
    mime_type: Option<String>,
}

/// Wire format of a predict response.
#[derive(Debug, Clone, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

/// Client for the Imagen image generation API.
///
/// Rate limited and retried the same way as the text client; the tier's
/// per-model overrides apply under the configured image model name.
pub struct ImagenClient {
    http: reqwest::Client,
    limiter: RateLimiter<TierConfig>,
    api_key: String,
    base_url: String,
    model_name: String,
}

impl std::fmt::Debug for ImagenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagenClient")
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ImagenClient {
    /// Create a new Imagen client without configured rate limiting.
    ///
    /// Reads the API key from the `GEMINI_API_KEY` environment variable
    /// and applies the built-in free-tier limits.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not set.
    #[instrument(name = "imagen_client_new", skip(default_model))]
    pub fn new(default_model: impl Into<String>) -> KarigariResult<Self> {
        Self::new_internal(default_model, None).map_err(Into::into)
    }

    /// Create a new Imagen client with rate limiting from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not set.
    #[instrument(name = "imagen_client_new_with_config", skip(default_model))]
    pub fn new_with_config(
        default_model: impl Into<String>,
        tier_name: Option<&str>,
    ) -> KarigariResult<Self> {
        let tier_config = KarigariConfig::load()
            .ok()
            .and_then(|config| config.get_tier("gemini", tier_name));

        Self::new_internal(default_model, tier_config).map_err(Into::into)
    }

    fn new_internal(
        default_model: impl Into<String>,
        tier_config: Option<TierConfig>,
    ) -> ModelResult<Self> {
        let api_key =
            env::var("GEMINI_API_KEY").map_err(|_| ModelError::new(ModelErrorKind::MissingApiKey))?;

        let model_name = default_model.into();
        let base_tier = tier_config.unwrap_or_else(|| TierConfig {
            name: "Free".to_string(),
            rpm: Some(5),
            tpm: None,
            rpd: Some(50),
            max_concurrent: Some(1),
            daily_quota_usd: None,
            cost_per_million_input_tokens: None,
            cost_per_million_output_tokens: None,
            models: std::collections::HashMap::new(),
        });
        // Image calls are rate limited under the image model's overrides
        let limiter = RateLimiter::new(base_tier.for_model(&model_name));

        Ok(Self {
            http: reqwest::Client::new(),
            limiter,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model_name,
        })
    }

    /// Point the client at a different API base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn predict_url(&self, model: &str) -> String {
        format!("{}/models/{}:predict", self.base_url, model)
    }

    async fn predict(&self, req: &ImageRequest) -> ModelResult<ImageResponse> {
        let model = req.model.as_deref().unwrap_or(&self.model_name);
        let url = self.predict_url(model);

        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: req.prompt.clone(),
            }],
            parameters: PredictParameters {
                sample_count: req.sample_count.max(1),
            },
        };

        // Prompt length is the only token-ish signal the predict API has
        let estimate = (req.prompt.len() / 4).max(1) as u64;

        let response: PredictResponse = self
            .limiter
            .execute(estimate, || async {
                let response = self
                    .http
                    .post(&url)
                    .header("x-goog-api-key", &self.api_key)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| {
                        ModelError::new(ModelErrorKind::ApiRequest(format!(
                            "predict request failed: {}",
                            e
                        )))
                    })?;

                let status = response.status();
                if !status.is_success() {
                    let message = response.text().await.unwrap_or_default();
                    return Err(ModelError::new(ModelErrorKind::HttpError {
                        status_code: status.as_u16(),
                        message,
                    }));
                }

                response.json::<PredictResponse>().await.map_err(|e| {
                    ModelError::new(ModelErrorKind::ApiRequest(format!(
                        "failed to decode predict response: {}",
                        e
                    )))
                })
            })
            .await?;

        if response.predictions.is_empty() {
            return Err(ModelError::new(ModelErrorKind::EmptyResponse));
        }

        let mut images = Vec::with_capacity(response.predictions.len());
        for prediction in response.predictions {
            let data = BASE64
                .decode(prediction.bytes_base64_encoded.as_bytes())
                .map_err(|e| ModelError::new(ModelErrorKind::Base64Decode(e.to_string())))?;
            images.push(ImagePayload {
                mime: prediction.mime_type.or_else(|| Some("image/png".to_string())),
                data,
            });
        }

        tracing::debug!(model, count = images.len(), "Generated images");

        Ok(ImageResponse { images })
    }
}

#[async_trait]
impl ImageGenerator for ImagenClient {
    async fn generate_image(&self, req: &ImageRequest) -> KarigariResult<ImageResponse> {
        self.predict(req).await.map_err(Into::into)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
