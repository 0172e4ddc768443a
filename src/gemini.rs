//! Generative Language API client
//!
//! Sends one `generateContent` request per analysis and unwraps
//! `candidates[0].content.parts[0].text` from the reply.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisFailure;
use crate::config::GeminiConfig;
use crate::credentials::ApiKey;
use crate::error::{CodeSentryError, Result};

/// `generateContent` request body
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RequestContent<'a> {
    pub parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RequestPart<'a> {
    pub text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    /// Single-turn request carrying one text part
    pub fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

/// `generateContent` response body, reduced to the fields we read
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

/// Pull the generated text out of a raw response body.
pub fn extract_text(body: &str) -> std::result::Result<String, AnalysisFailure> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| AnalysisFailure::UpstreamParse {
            message: e.to_string(),
        })?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(AnalysisFailure::EmptyResponse);
    };
    let content = candidate.content.ok_or_else(|| AnalysisFailure::UpstreamParse {
        message: "candidate has no content".to_string(),
    })?;
    let Some(part) = content.parts.into_iter().next() else {
        return Err(AnalysisFailure::EmptyResponse);
    };
    part.text.ok_or_else(|| AnalysisFailure::UpstreamParse {
        message: "part has no text".to_string(),
    })
}

/// Client for the generative API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("codesentry/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| CodeSentryError::ConfigError {
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self {
            http,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
        })
    }

    /// Endpoint without the credential
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one prompt and return the generated text.
    pub async fn generate(
        &self,
        key: &ApiKey,
        prompt: &str,
    ) -> std::result::Result<String, AnalysisFailure> {
        tracing::info!("Sending analysis request to {}", self.endpoint);

        // The key rides in the query string, so strip URLs from every error.
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", key.expose())])
            .json(&GenerateRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Generative API returned {}", status);
            return Err(AnalysisFailure::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        extract_text(&body)
    }
}

fn transport(e: reqwest::Error) -> AnalysisFailure {
    let e = e.without_url();
    tracing::error!("Generative API request failed: {}", e);
    AnalysisFailure::Transport {
        message: e.to_string(),
    }
}
