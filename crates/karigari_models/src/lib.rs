//! Generative model clients for Karigari.
//!
//! This crate provides the model service implementations behind the
//! [`karigari_interface::TextGenerator`] and
//! [`karigari_interface::ImageGenerator`] traits:
//!
//! - [`GeminiClient`] - text generation over the Gemini REST API
//! - [`ImagenClient`] - image generation over the Imagen predict API
//!
//! Both are enabled with the `gemini` feature:
//!
//! ```toml
//! [dependencies]
//! karigari_models = { version = "0.1", features = ["gemini"] }
//! ```
//!
//! ```no_run
//! # #[cfg(feature = "gemini")]
//! # {
//! use karigari_models::GeminiClient;
//! use karigari_interface::TextGenerator;
//! use karigari_core::GenerateRequest;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new("gemini-2.5-flash")?;
//! let request = GenerateRequest::from_prompt("Describe a handwoven saree");
//! let response = client.generate(&request).await?;
//! # Ok(())
//! # }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiClient, ImagenClient, TieredGemini};

/// Result type for model client operations.
pub type ModelResult<T> = Result<T, karigari_error::ModelError>;
