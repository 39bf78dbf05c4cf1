//! Configuration structures for rate limiting.
//!
//! This module provides TOML-based configuration for rate limits. The
//! configuration system supports:
//! - Bundled defaults (include_str! from karigari.toml)
//! - User overrides (./karigari.toml or ~/.config/karigari/karigari.toml)
//! - Automatic merging with user values taking precedence

use crate::Tier;
use config::{Config, File, FileFormat};
use karigari_error::{ConfigError, KarigariError, KarigariResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Model-specific rate limit overrides.
///
/// These override the tier-level defaults for specific models.
/// All fields are optional - only specified fields override tier defaults.
///
/// # Example
///
/// ```toml
/// [providers.gemini.tiers.free.models."gemini-2.5-pro"]
/// rpm = 2
/// tpm = 125_000
/// rpd = 50
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct ModelTierConfig {
    /// Requests per minute limit (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,

    /// Tokens per minute limit (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpm: Option<u64>,

    /// Requests per day limit (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpd: Option<u32>,

    /// Maximum concurrent requests (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<u32>,

    /// Daily quota in USD (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_quota_usd: Option<f64>,

    /// Cost per million input tokens in USD (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_million_input_tokens: Option<f64>,

    /// Cost per million output tokens in USD (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_million_output_tokens: Option<f64>,
}

/// Configuration for a specific API tier.
///
/// This struct implements the `Tier` trait and can be loaded from TOML
/// configuration. All fields are optional, where `None` indicates
/// unlimited/not applicable.
///
/// # Tier-Level Defaults
///
/// ```toml
/// [providers.gemini.tiers.free]
/// name = "Free"
/// rpm = 10
/// tpm = 250_000
/// rpd = 250
/// max_concurrent = 1
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TierConfig {
    /// Name of the tier (e.g., "Free", "Pay-as-you-go")
    pub name: String,

    /// Requests per minute limit (tier-level default)
    #[serde(default)]
    pub rpm: Option<u32>,

    /// Tokens per minute limit (tier-level default)
    #[serde(default)]
    pub tpm: Option<u64>,

    /// Requests per day limit (tier-level default)
    #[serde(default)]
    pub rpd: Option<u32>,

    /// Maximum concurrent requests (tier-level default)
    #[serde(default)]
    pub max_concurrent: Option<u32>,

    /// Daily quota in USD (tier-level default)
    #[serde(default)]
    pub daily_quota_usd: Option<f64>,

    /// Cost per million input tokens in USD (tier-level default)
    #[serde(default)]
    pub cost_per_million_input_tokens: Option<f64>,

    /// Cost per million output tokens in USD (tier-level default)
    #[serde(default)]
    pub cost_per_million_output_tokens: Option<f64>,

    /// Model-specific rate limit overrides
    #[serde(default)]
    pub models: HashMap<String, ModelTierConfig>,
}

impl Tier for TierConfig {
    fn rpm(&self) -> Option<u32> {
        self.rpm
    }

    fn tpm(&self) -> Option<u64> {
        self.tpm
    }

    fn rpd(&self) -> Option<u32> {
        self.rpd
    }

    fn max_concurrent(&self) -> Option<u32> {
        self.max_concurrent
    }

    fn daily_quota_usd(&self) -> Option<f64> {
        self.daily_quota_usd
    }

    fn cost_per_million_input_tokens(&self) -> Option<f64> {
        self.cost_per_million_input_tokens
    }

    fn cost_per_million_output_tokens(&self) -> Option<f64> {
        self.cost_per_million_output_tokens
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TierConfig {
    /// Get a tier configuration with model-specific overrides applied.
    ///
    /// If the model has specific rate limit overrides in the configuration,
    /// they override the tier-level defaults. Otherwise, returns the
    /// tier-level defaults.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use karigari_rate_limit::{KarigariConfig, Tier};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = KarigariConfig::load()?;
    /// let tier = config.get_tier("gemini", Some("free")).unwrap();
    ///
    /// let model_tier = tier.for_model("gemini-2.5-pro");
    /// println!("gemini-2.5-pro RPM: {:?}", model_tier.rpm());
    /// # Ok(())
    /// # }
    /// ```
    pub fn for_model(&self, model_name: &str) -> TierConfig {
        if let Some(model_config) = self.models.get(model_name) {
            TierConfig {
                name: self.name.clone(),
                rpm: model_config.rpm.or(self.rpm),
                tpm: model_config.tpm.or(self.tpm),
                rpd: model_config.rpd.or(self.rpd),
                max_concurrent: model_config.max_concurrent.or(self.max_concurrent),
                daily_quota_usd: model_config.daily_quota_usd.or(self.daily_quota_usd),
                cost_per_million_input_tokens: model_config
                    .cost_per_million_input_tokens
                    .or(self.cost_per_million_input_tokens),
                cost_per_million_output_tokens: model_config
                    .cost_per_million_output_tokens
                    .or(self.cost_per_million_output_tokens),
                models: HashMap::new(), // Model-specific configs don't have nested models
            }
        } else {
            self.clone()
        }
    }
}

/// Configuration for a specific provider.
///
/// Contains the default tier name and a map of tier configurations.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Name of the default tier for this provider
    pub default_tier: String,

    /// Map of tier name to tier configuration
    pub tiers: HashMap<String, TierConfig>,
}

/// Top-level Karigari rate limit configuration.
///
/// Loads provider tier configurations from TOML files with a precedence
/// system:
/// 1. Bundled defaults (include_str! from karigari.toml)
/// 2. User override (~/.config/karigari/karigari.toml)
/// 3. User override (./karigari.toml, highest precedence)
///
/// # Example
///
/// ```no_run
/// use karigari_rate_limit::KarigariConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = KarigariConfig::load()?;
/// let tier = config.get_tier("gemini", Some("free")).unwrap();
/// println!("Gemini free tier RPM: {:?}", tier.rpm);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct KarigariConfig {
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl KarigariConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> KarigariResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                KarigariError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                KarigariError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> KarigariResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        // Bundled default configuration
        const DEFAULT_CONFIG: &str = include_str!("../../../karigari.toml");

        let mut builder = Config::builder()
            // Start with bundled defaults
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        // Add user config from home directory (optional)
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/karigari/karigari.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        // Add user config from current directory (optional, highest precedence)
        builder = builder.add_source(File::with_name("karigari").required(false));

        builder
            .build()
            .map_err(|e| {
                KarigariError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                KarigariError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Get tier configuration for a provider.
    ///
    /// # Arguments
    ///
    /// * `provider` - Provider name (e.g., "gemini")
    /// * `tier_name` - Optional tier name (uses provider's default if None)
    #[instrument(skip(self))]
    pub fn get_tier(&self, provider: &str, tier_name: Option<&str>) -> Option<TierConfig> {
        let provider_config = self.providers.get(provider)?;

        let tier = tier_name.unwrap_or(&provider_config.default_tier);

        debug!(provider, tier, "Looking up tier configuration");

        provider_config.tiers.get(tier).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_tier() -> TierConfig {
        let mut models = HashMap::new();
        models.insert(
            "gemini-2.5-pro".to_string(),
            ModelTierConfig {
                rpm: Some(2),
                tpm: Some(125_000),
                rpd: Some(50),
                ..Default::default()
            },
        );
        TierConfig {
            name: "Free".to_string(),
            rpm: Some(10),
            tpm: Some(250_000),
            rpd: Some(250),
            max_concurrent: Some(1),
            daily_quota_usd: None,
            cost_per_million_input_tokens: Some(0.0),
            cost_per_million_output_tokens: Some(0.0),
            models,
        }
    }

    #[test]
    fn model_overrides_apply_over_tier_defaults() {
        let tier = free_tier();
        let pro = tier.for_model("gemini-2.5-pro");
        assert_eq!(pro.rpm, Some(2));
        assert_eq!(pro.tpm, Some(125_000));
        assert_eq!(pro.rpd, Some(50));
        // Unset override fields fall back to tier defaults
        assert_eq!(pro.max_concurrent, Some(1));
    }

    #[test]
    fn unknown_model_gets_tier_defaults() {
        let tier = free_tier();
        let flash = tier.for_model("gemini-2.5-flash");
        assert_eq!(flash.rpm, Some(10));
        assert_eq!(flash.tpm, Some(250_000));
    }

    #[test]
    fn bundled_defaults_parse() {
        let config = KarigariConfig::load().expect("bundled defaults must parse");
        let tier = config.get_tier("gemini", None).expect("gemini default tier");
        assert_eq!(tier.name, "Free");
        assert_eq!(tier.rpm, Some(10));
    }

    #[test]
    fn unknown_provider_is_none() {
        let config = KarigariConfig::default();
        assert!(config.get_tier("acme", None).is_none());
    }
}
