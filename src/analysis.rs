//! Data carried between the gateway, the relay and the generative API.
//!
//! Every value here lives for exactly one request. Nothing is cached.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A code snippet submitted for review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub code: String,
    pub language: String,
}

impl AnalysisRequest {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
        }
    }
}

/// Text generated for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub text: String,
}

/// Why an analysis produced no text.
///
/// The `Display` form is what the gateway shows in the `analysis` field, so
/// existing clients still get a readable message. The serialized form is
/// tagged by `kind` so newer clients can branch on it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisFailure {
    #[error("Error: the API key is missing.")]
    ConfigMissing,

    #[error("Generative API error: HTTP {status}")]
    UpstreamStatus { status: u16 },

    #[error("Failed to read the generative API response: {message}")]
    UpstreamParse { message: String },

    #[error("The generative API returned no response")]
    EmptyResponse,

    #[error("Failed to reach the generative API: {message}")]
    Transport { message: String },
}

/// Outcome of one analysis call.
pub type AnalysisOutcome = std::result::Result<AnalysisResult, AnalysisFailure>;
