//! AI content generation
//!
//! Wraps the two remote calls this application makes (schema-constrained
//! syllabus generation and freeform topic notes) plus the video-link
//! post-processing applied to notes before they reach the caller.

pub mod generator;
pub mod llm;
pub mod video_links;

pub use generator::{ContentGenerator, LlmContentGenerator, SyllabusItem};
pub use llm::{LlmClient, ProviderConfig};
pub use video_links::link_video_searches;

use thiserror::Error;

/// Failure of a remote generation call.
///
/// Syllabus generation is all-or-nothing: transport failures, non-success
/// API statuses, empty bodies and schema mismatches all surface here with
/// no partial recovery. Notes generation only fails on transport/API
/// errors; an empty body becomes a fallback string instead.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to model provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("model returned no content")]
    Empty,

    #[error("model output did not match the expected schema: {0}")]
    Malformed(#[from] serde_json::Error),
}
