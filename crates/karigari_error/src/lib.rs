//! Error types for the Karigari content pipeline.
//!
//! This crate provides the foundation error types used throughout the
//! Karigari workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean
//! error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use karigari_error::{KarigariResult, HttpError};
//!
//! fn fetch_data() -> KarigariResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod access;
mod backend;
mod config;
mod error;
mod http;
mod json;
mod model;
mod not_found;
mod record;
mod storage;
mod validation;

pub use access::{AccessError, AccessErrorKind};
pub use backend::BackendError;
pub use config::ConfigError;
pub use error::{KarigariError, KarigariErrorKind, KarigariResult};
pub use http::HttpError;
pub use json::JsonError;
pub use model::{ModelError, ModelErrorKind, RetryableError};
pub use not_found::NotFoundError;
pub use record::{RecordError, RecordErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use validation::ValidationError;
