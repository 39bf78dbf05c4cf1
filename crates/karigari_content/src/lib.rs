//! Generative content orchestration for Karigari.
//!
//! This crate is the heart of the pipeline: the two coordinated workflows
//! that turn an artisan's raw material into marketable content.
//!
//! - **Design generation** ([`DesignStudio`]): a source image becomes up
//!   to five AI-generated product mockups, persisted with best-effort
//!   partial-failure handling.
//! - **Story generation** ([`StoryStudio`]): a written description
//!   becomes a product description, social captions, and hashtags, with
//!   incremental per-platform caption sets.
//!
//! Prompt construction ([`prompt`]) and response parsing ([`parse`]) share
//! one formatting contract ([`format`]), so the instructions embedded in
//! prompts and the markers the parser scans for cannot drift apart.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod design;
pub mod format;
pub mod parse;
pub mod prompt;
mod story;

pub use design::{DesignLimits, DesignStudio, MockupBatch, MockupFailure};
pub use prompt::CraftBrief;
pub use story::StoryStudio;
