//! HTTP API server for the Karigari content pipeline.
//!
//! Exposes the design and story workflows over a small JSON API:
//!
//! | Method | Path               | Purpose                          |
//! |--------|--------------------|----------------------------------|
//! | POST   | `/design/upload`   | Upload a source image (multipart) |
//! | POST   | `/design/generate` | Generate product mockups         |
//! | GET    | `/design`          | List the caller's designs        |
//! | GET    | `/design/:id`      | Fetch one design                 |
//! | POST   | `/story/generate`  | Generate a story                 |
//! | POST   | `/story/captions`  | Add platform captions            |
//! | GET    | `/story`           | List the caller's stories        |
//! | GET    | `/story/:id`       | Fetch one story                  |
//! | GET    | `/health`          | Liveness                         |
//! | GET    | `/media/*`         | Stored media (static)            |
//!
//! Every route except `/health` and `/media` requires a bearer token,
//! resolved to a [`karigari_interface::Principal`] by the configured
//! identity backend. Responses use the `{status, message?, data?}`
//! envelope.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod config;
pub mod error;
pub mod identity;
pub mod observability;
pub mod response;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use state::AppState;
