//! Relay protocol message types
//!
//! Defines the JSON message format between the gateway and the relay.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisFailure;

/// Client-to-relay message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Open a session with a named service
    Hello { service: String },
    /// Analyze one snippet
    Analyze {
        id: u64,
        code: String,
        language: String,
    },
    /// Ping to check connection
    Ping,
}

/// Relay-to-client message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Handshake accepted
    Ready { client_id: String, service: String },
    /// Generated analysis text
    Analysis { id: u64, text: String },
    /// The analysis ran but produced no text
    Failure { id: u64, failure: AnalysisFailure },
    /// Protocol-level error
    Error {
        id: Option<u64>,
        code: String,
        message: String,
    },
    /// Pong response
    Pong,
}

impl ServerMessage {
    pub fn error(id: Option<u64>, code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            id,
            code: code.to_string(),
            message: message.into(),
        }
    }
}
