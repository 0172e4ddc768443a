//! The relay: owns the credential and performs one outbound call per analysis.

use crate::analysis::{AnalysisFailure, AnalysisOutcome, AnalysisRequest, AnalysisResult};
use crate::config::SentryConfig;
use crate::credentials::{self, ApiKey};
use crate::error::Result;
use crate::gemini::GeminiClient;
use crate::prompt::build_prompt;

/// Stateless across calls; shared behind an `Arc`.
#[derive(Debug)]
pub struct Relay {
    client: GeminiClient,
    api_key: Option<ApiKey>,
}

impl Relay {
    pub fn new(client: GeminiClient, api_key: Option<ApiKey>) -> Self {
        if api_key.is_none() {
            tracing::warn!("No API key configured; every analysis will fail until one is provided");
        }
        Self { client, api_key }
    }

    /// Build a relay from configuration, resolving the credential once.
    pub fn from_config(config: &SentryConfig, explicit_key: Option<&str>) -> Result<Self> {
        let client = GeminiClient::new(&config.gemini)?;
        let api_key = credentials::resolve_api_key(explicit_key, &config.relay.credentials_file);
        Ok(Self::new(client, api_key))
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Analyze one snippet. Inputs are forwarded verbatim.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        let Some(key) = &self.api_key else {
            return Err(AnalysisFailure::ConfigMissing);
        };

        let prompt = build_prompt(&request.language, &request.code);
        let text = self.client.generate(key, &prompt).await?;
        tracing::debug!("Received {} bytes of analysis", text.len());
        Ok(AnalysisResult { text })
    }
}
