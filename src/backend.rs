//! The gateway's handle on the relay.

use std::sync::Arc;

use crate::analysis::{AnalysisOutcome, AnalysisRequest};
use crate::error::Result;
use crate::relay::Relay;
use crate::relay_server::RelayClient;

/// Where analyses are executed
#[derive(Debug, Clone)]
pub enum Backend {
    /// Relay linked into this process
    Local(Arc<Relay>),
    /// Relay daemon reached over WebSocket
    Remote(RelayClient),
}

impl Backend {
    /// Run one analysis. `Err` means the relay could not be reached or
    /// broke protocol; analysis failures arrive inside `Ok`.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome> {
        match self {
            Self::Local(relay) => Ok(relay.analyze(request).await),
            Self::Remote(client) => client.analyze(request).await,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Local(_) => "in-process relay".to_string(),
            Self::Remote(client) => format!("relay at {}", client.url()),
        }
    }
}
