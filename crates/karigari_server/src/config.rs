//! Server configuration.
//!
//! Loaded with the same layering as the rate limit configuration:
//! bundled defaults from `karigari.toml`, then
//! `~/.config/karigari/karigari.toml`, then `./karigari.toml`, then
//! `KARIGARI__`-prefixed environment variables (highest precedence),
//! e.g. `KARIGARI__SERVER__BIND_ADDR=0.0.0.0:8080`.

use config::{Config, Environment, File, FileFormat};
use karigari_error::{ConfigError, KarigariError, KarigariResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Model selection and tier for the generative backends.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Text generation model identifier
    pub text_model: String,
    /// Image generation model identifier
    pub image_model: String,
    /// Provider tier name for rate limiting
    pub provider_tier: String,
}

/// Which identity backend verifies bearer tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    /// Verify against the configured token table (dev/test)
    Static,
    /// Verify against a remote identity endpoint
    Remote,
}

/// Identity backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Which backend to use
    pub mode: IdentityMode,
    /// Remote verification endpoint (used in `remote` mode)
    pub endpoint: String,
    /// token -> user id table (used in `static` mode)
    #[serde(default)]
    pub tokens: HashMap<String, String>,
}

/// Top-level server configuration (the `[server]` table).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind
    pub bind_addr: String,
    /// Public base URL prefixed onto stored media paths
    pub public_base_url: String,
    /// Root directory of the blob store
    pub media_root: PathBuf,
    /// Root directory of the record stores
    pub records_root: PathBuf,
    /// Spool directory for inbound uploads
    pub uploads_root: PathBuf,
    /// Per-model-call timeout in seconds
    pub model_call_timeout_secs: u64,
    /// Upper bound on mockups per generation request
    pub max_mockups_per_request: u32,
    /// Model selection
    pub models: ModelsConfig,
    /// Identity backend
    pub identity: IdentityConfig,
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    server: ServerConfig,
}

impl ServerConfig {
    /// Load configuration with precedence:
    /// env > ./karigari.toml > ~/.config/karigari/karigari.toml > bundled.
    ///
    /// # Errors
    ///
    /// Returns an error if any layer fails to parse or required fields
    /// are missing after merging.
    #[instrument]
    pub fn load() -> KarigariResult<Self> {
        debug!("Loading server configuration");

        const DEFAULT_CONFIG: &str = include_str!("../../../karigari.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/karigari/karigari.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("karigari").required(false))
            .add_source(Environment::with_prefix("KARIGARI").separator("__"));

        let file_config: FileConfig = builder
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
            })?;

        Ok(file_config.server)
    }
}
