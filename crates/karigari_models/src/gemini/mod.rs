//! Google Gemini API client implementations.
//!
//! This module provides the two model capabilities the pipeline consumes:
//! - [`GeminiClient`] - REST API client for text generation
//! - [`ImagenClient`] - predict API client for image generation
//!
//! Both clients pool per-model state, apply per-model rate limits from the
//! tier configuration, and retry transient failures with bounded backoff.

mod client;
mod imagen;

pub use client::{GeminiClient, TieredGemini};
pub use imagen::ImagenClient;
