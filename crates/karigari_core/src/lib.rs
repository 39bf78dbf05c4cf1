//! Core data types for the Karigari content pipeline.
//!
//! This crate provides the foundation data types used across the Karigari
//! workspace: the domain records produced by the design and story
//! workflows, the patch structs that mutate them, and the exchange types
//! spoken between orchestrators and model clients.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifact;
mod image;
mod input;
mod media;
mod message;
mod output;
mod platform;
mod product;
mod record;
mod request;
mod role;
mod story;

pub use artifact::{ArtifactPatch, ArtifactStatus, GeneratedImage, SourceArtifact};
pub use image::{ImagePayload, ImageRequest, ImageResponse};
pub use input::Input;
pub use media::MediaSource;
pub use message::{Message, MessageBuilder};
pub use output::Output;
pub use platform::Platform;
pub use product::ProductKind;
pub use record::Record;
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse};
pub use role::Role;
pub use story::{PlatformCaption, StoryPatch, StoryRecord};
