//! Trait definitions for the Karigari content pipeline.
//!
//! This crate provides the trait seams between the orchestrators and their
//! external collaborators: the generative model service, the structured
//! record store, and the identity service. Orchestrators hold these as
//! `Arc<dyn ...>` handles constructed once at startup, which keeps the
//! core testable with fakes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod identity;
mod records;
mod traits;

pub use identity::{Principal, TokenVerifier};
pub use records::RecordStore;
pub use traits::{ImageGenerator, TextGenerator};
