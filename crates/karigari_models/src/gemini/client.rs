//! Google Gemini text generation client.
//!
//! This module provides a client for the Google Gemini API with support for:
//! - Per-request model selection (different requests can use different models)
//! - Client pooling with lazy initialization (one client per model)
//! - Per-model rate limiting (each model has independent rate limits)
//! - Thread-safe concurrent access
//!
//! # Architecture
//!
//! The [`GeminiClient`] maintains a pool of model-specific clients, each
//! wrapped in its own rate limiter. When a request specifies a model (via
//! `GenerateRequest.model`), the client either retrieves the existing
//! client for that model or creates a new one on-demand.

use async_trait::async_trait;
use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex};
use tracing::instrument;

use gemini_rust::{Gemini, client::Model};

use karigari_core::{GenerateRequest, GenerateResponse, Input, Output, Role};
use karigari_error::{KarigariResult, ModelError, ModelErrorKind};
use karigari_interface::TextGenerator;
use karigari_rate_limit::{KarigariConfig, RateLimiter, Tier, TierConfig};

use crate::ModelResult;

//
// ─── TIERED GEMINI ──────────────────────────────────────────────────────────────
//

/// Couples a Gemini API client with its rate limiting tier.
///
/// This wraps a `Gemini` client and a tier together, enabling the
/// `RateLimiter` to own both the client and its rate limit configuration,
/// so clients cannot be accessed without going through rate limiting.
#[derive(Clone)]
pub struct TieredGemini<T: Tier> {
    /// The Gemini API client
    pub client: Gemini,
    /// The tier configuration for rate limiting
    pub tier: T,
}

impl<T: Tier + std::fmt::Debug> std::fmt::Debug for TieredGemini<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredGemini")
            .field("tier", &self.tier)
            .finish_non_exhaustive()
    }
}

impl<T: Tier> Tier for TieredGemini<T> {
    fn rpm(&self) -> Option<u32> {
        self.tier.rpm()
    }

    fn tpm(&self) -> Option<u64> {
        self.tier.tpm()
    }

    fn rpd(&self) -> Option<u32> {
        self.tier.rpd()
    }

    fn max_concurrent(&self) -> Option<u32> {
        self.tier.max_concurrent()
    }

    fn daily_quota_usd(&self) -> Option<f64> {
        self.tier.daily_quota_usd()
    }

    fn cost_per_million_input_tokens(&self) -> Option<f64> {
        self.tier.cost_per_million_input_tokens()
    }

    fn cost_per_million_output_tokens(&self) -> Option<f64> {
        self.tier.cost_per_million_output_tokens()
    }

    fn name(&self) -> &str {
        self.tier.name()
    }
}

//
// ─── CLIENT ─────────────────────────────────────────────────────────────────────
//

/// Client for the Google Gemini API with per-model client pooling.
///
/// Maintains a cache of model-specific Gemini clients, each with its own
/// rate limiter. Clients are created lazily on first use for each model.
pub struct GeminiClient {
    /// Cache of model-specific clients with rate limiting
    clients: Arc<Mutex<HashMap<String, RateLimiter<TieredGemini<TierConfig>>>>>,
    /// API key for creating new clients
    api_key: String,
    /// Default model name when req.model is None
    model_name: String,
    /// Base tier configuration (tier-level defaults + model-specific overrides)
    base_tier: TierConfig,
    /// Retry configuration
    no_retry: bool,
    max_retries: Option<usize>,
    retry_backoff_ms: Option<u64>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model_name", &self.model_name)
            .field("base_tier", &self.base_tier.name().to_string())
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Convert a model name string to a gemini-rust Model enum variant.
    ///
    /// Maps common model name strings to their corresponding Model enum
    /// variants. Uses Model::Custom for unrecognized model names,
    /// automatically adding the "models/" prefix required by the API.
    fn model_name_to_enum(name: &str) -> Model {
        match name {
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            // For other model names, use Custom variant with "models/" prefix
            other => {
                if other.starts_with("models/") {
                    Model::Custom(other.to_string())
                } else {
                    Model::Custom(format!("models/{}", other))
                }
            }
        }
    }

    /// Create a new Gemini client without configured rate limiting.
    ///
    /// Reads the API key from the `GEMINI_API_KEY` environment variable
    /// and applies the built-in free-tier limits.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not set.
    #[instrument(name = "gemini_client_new", skip(default_model))]
    pub fn new(default_model: impl Into<String>) -> KarigariResult<Self> {
        Self::new_with_tier(default_model, None).map_err(Into::into)
    }

    /// Create a new Gemini client with rate limiting from configuration.
    ///
    /// Loads tier configuration from karigari.toml and applies rate
    /// limiting, including model-specific rate limit overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not set.
    #[instrument(name = "gemini_client_new_with_config", skip(default_model))]
    pub fn new_with_config(
        default_model: impl Into<String>,
        tier_name: Option<&str>,
    ) -> KarigariResult<Self> {
        let tier_config = KarigariConfig::load()
            .ok()
            .and_then(|config| config.get_tier("gemini", tier_name));

        Self::new_with_tier(default_model, tier_config).map_err(Into::into)
    }

    /// Create a new Gemini client with an explicit tier configuration.
    fn new_with_tier(
        default_model: impl Into<String>,
        tier_config: Option<TierConfig>,
    ) -> ModelResult<Self> {
        let api_key =
            env::var("GEMINI_API_KEY").map_err(|_| ModelError::new(ModelErrorKind::MissingApiKey))?;

        let base_tier = tier_config.unwrap_or_else(free_tier_defaults);

        Ok(Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
            api_key,
            model_name: default_model.into(),
            base_tier,
            no_retry: false,
            max_retries: None,
            retry_backoff_ms: None,
        })
    }

    /// Override the retry policy.
    ///
    /// # Arguments
    ///
    /// * `no_retry` - Disable automatic retry
    /// * `max_retries` - Override maximum retry attempts
    /// * `retry_backoff_ms` - Override initial backoff delay
    pub fn with_retry(
        mut self,
        no_retry: bool,
        max_retries: Option<usize>,
        retry_backoff_ms: Option<u64>,
    ) -> Self {
        self.no_retry = no_retry;
        self.max_retries = max_retries;
        self.retry_backoff_ms = retry_backoff_ms;
        self
    }

    /// Extract text content from an input.
    fn extract_text(input: &Input) -> Option<String> {
        match input {
            Input::Text(text) => Some(text.clone()),
            _ => None,
        }
    }

    /// Check if input contains non-text media.
    fn has_media(inputs: &[Input]) -> bool {
        inputs.iter().any(|i| !matches!(i, Input::Text(_)))
    }

    /// Estimate token count from text (rough approximation: chars / 4).
    ///
    /// This is a conservative estimate. Actual token count may be lower.
    fn estimate_tokens(text: &str) -> u64 {
        (text.len() / 4).max(1) as u64
    }

    /// Get or lazily create the rate-limited client for a model.
    fn pooled_client(
        &self,
        model_name: &str,
    ) -> ModelResult<RateLimiter<TieredGemini<TierConfig>>> {
        let mut clients = self.clients.lock().map_err(|_| {
            ModelError::new(ModelErrorKind::ClientCreation(
                "client pool lock poisoned".to_string(),
            ))
        })?;

        if let Some(limiter) = clients.get(model_name) {
            return Ok(limiter.clone());
        }

        let model_enum = Self::model_name_to_enum(model_name);
        let client = Gemini::with_model(&self.api_key, model_enum)
            .map_err(|e| ModelError::new(ModelErrorKind::ClientCreation(e.to_string())))?;

        // Apply model-specific tier overrides if the config has them
        let model_tier = self.base_tier.for_model(model_name);
        let tiered = TieredGemini {
            client,
            tier: model_tier,
        };

        let limiter = RateLimiter::new_with_retry(
            tiered,
            self.no_retry,
            self.max_retries,
            self.retry_backoff_ms,
        );
        clients.insert(model_name.to_string(), limiter.clone());
        Ok(limiter)
    }

    /// Internal generate method that returns model-specific errors.
    async fn generate_internal(&self, req: &GenerateRequest) -> ModelResult<GenerateResponse> {
        // Determine which model to use
        let model_name = req.model.as_ref().unwrap_or(&self.model_name);

        let rate_limited_client = self.pooled_client(model_name)?;

        // Estimate tokens for rate limiting
        let estimated_tokens: u64 = req
            .messages
            .iter()
            .flat_map(|msg| &msg.content)
            .filter_map(Self::extract_text)
            .map(|text| Self::estimate_tokens(&text))
            .sum();

        // Add max_tokens if specified (output token estimate)
        let total_estimate = estimated_tokens + req.max_tokens.unwrap_or(1000) as u64;

        // Clone data needed in the closure
        let messages = req.messages.clone();
        let temperature = req.temperature;
        let max_tokens = req.max_tokens;

        // Execute with rate limiting and automatic retry
        let response = rate_limited_client
            .execute(total_estimate, || async {
                // Access the client through the rate limiter
                let client = &rate_limited_client.inner().client;

                // Start building the request
                let mut builder = client.generate_content();

                // Process messages in order
                let mut system_prompt = None;

                for msg in &messages {
                    match msg.role {
                        Role::System => {
                            // Gemini uses a separate system prompt
                            if let Some(text) = msg.content.iter().find_map(Self::extract_text) {
                                system_prompt = Some(text);
                            }
                        }
                        Role::User => {
                            for input in &msg.content {
                                if let Some(text) = Self::extract_text(input) {
                                    builder = builder.with_user_message(&text);
                                }
                            }

                            // The simple builder API is text-only; image
                            // inputs go through the Imagen client instead.
                            if Self::has_media(&msg.content) {
                                return Err(ModelError::new(ModelErrorKind::ApiRequest(
                                    "multimodal inputs are not supported by the text client"
                                        .to_string(),
                                )));
                            }
                        }
                        Role::Assistant => {
                            if let Some(text) = msg.content.iter().find_map(Self::extract_text) {
                                builder = builder.with_model_message(&text);
                            }
                        }
                    }
                }

                if let Some(prompt) = &system_prompt {
                    builder = builder.with_system_prompt(prompt);
                }

                if let Some(temp) = temperature {
                    builder = builder.with_temperature(temp);
                }

                if let Some(max_tok) = max_tokens {
                    builder = builder.with_max_output_tokens(max_tok as i32);
                }

                // Execute the request and parse errors
                builder.execute().await.map_err(Self::parse_gemini_error)
            })
            .await?;

        // Extract text from response
        let text = response.text();

        Ok(GenerateResponse {
            outputs: vec![Output::Text(text)],
        })
    }

    /// Parse gemini-rust errors to extract HTTP status codes.
    ///
    /// Converts generic API error strings into structured ModelError
    /// with HTTP status codes when available.
    fn parse_gemini_error(err: impl std::fmt::Display) -> ModelError {
        let err_msg = err.to_string();

        // Try to extract HTTP status code from error message
        // Example: "bad response from server; code 503; description: ..."
        if let Some(status_code) = Self::extract_status_code(&err_msg) {
            ModelError::new(ModelErrorKind::HttpError {
                status_code,
                message: err_msg,
            })
        } else {
            ModelError::new(ModelErrorKind::ApiRequest(err_msg))
        }
    }

    /// Extract HTTP status code from error message string.
    ///
    /// Parses strings like "bad response from server; code 503; description: ..."
    /// and extracts the numeric status code.
    fn extract_status_code(error_msg: &str) -> Option<u16> {
        if let Some(code_start) = error_msg.find("code ") {
            let code_str = &error_msg[code_start + 5..];
            if let Some(end) = code_str.find(|c: char| !c.is_numeric()) {
                return code_str[..end].parse().ok();
            }
        }
        None
    }
}

/// Built-in free-tier limits used when no configuration is available.
fn free_tier_defaults() -> TierConfig {
    TierConfig {
        name: "Free".to_string(),
        rpm: Some(10),
        tpm: Some(250_000),
        rpd: Some(250),
        max_concurrent: Some(1),
        daily_quota_usd: None,
        cost_per_million_input_tokens: Some(0.0),
        cost_per_million_output_tokens: Some(0.0),
        models: HashMap::new(),
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, req: &GenerateRequest) -> KarigariResult<GenerateResponse> {
        self.generate_internal(req).await.map_err(Into::into)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    /// Returns the default model name used when `GenerateRequest.model` is None.
    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_models_map_to_enum_variants() {
        assert!(matches!(
            GeminiClient::model_name_to_enum("gemini-2.5-flash"),
            Model::Gemini25Flash
        ));
        assert!(matches!(
            GeminiClient::model_name_to_enum("gemini-2.5-pro"),
            Model::Gemini25Pro
        ));
    }

    #[test]
    fn unknown_models_get_models_prefix() {
        match GeminiClient::model_name_to_enum("gemini-2.0-flash") {
            Model::Custom(name) => assert_eq!(name, "models/gemini-2.0-flash"),
            _ => panic!("expected Custom variant"),
        }
        match GeminiClient::model_name_to_enum("models/already-prefixed") {
            Model::Custom(name) => assert_eq!(name, "models/already-prefixed"),
            _ => panic!("expected Custom variant"),
        }
    }

    #[test]
    fn status_codes_are_extracted_from_error_strings() {
        assert_eq!(
            GeminiClient::extract_status_code(
                "bad response from server; code 503; description: overloaded"
            ),
            Some(503)
        );
        assert_eq!(GeminiClient::extract_status_code("no code here"), None);
    }

    #[test]
    fn token_estimate_is_conservative() {
        assert_eq!(GeminiClient::estimate_tokens(""), 1);
        assert_eq!(GeminiClient::estimate_tokens("12345678"), 2);
    }
}
