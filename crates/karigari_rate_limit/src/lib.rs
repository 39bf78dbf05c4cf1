//! Rate limiting and usage tier management.
//!
//! This crate provides rate limiting functionality to comply with model
//! API quotas. Tier configurations are loaded from layered TOML files
//! (bundled defaults, then user overrides), support per-model overrides,
//! and drive a limiter that combines request/token quotas, a concurrency
//! cap, and bounded retry with exponential backoff for transient errors.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod limiter;
mod tier;

pub use config::{KarigariConfig, ModelTierConfig, ProviderConfig, TierConfig};
pub use error::{RateLimitError, RateLimitErrorKind};
pub use limiter::{RateLimiter, RateLimiterGuard};
pub use tier::Tier;
