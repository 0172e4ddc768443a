//! Gateway-side relay client
//!
//! Opens one WebSocket connection per call: handshake, one request, one
//! reply, close. Nothing is pooled.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::analysis::{AnalysisOutcome, AnalysisRequest, AnalysisResult};
use crate::config::{validate_relay_url, SERVICE_NAME};
use crate::error::{CodeSentryError, Result};
use crate::relay_server::protocol::{ClientMessage, ServerMessage};

type RelayStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Handle on a relay daemon
#[derive(Debug, Clone)]
pub struct RelayClient {
    url: String,
}

impl RelayClient {
    /// Resolve the relay at `url`, failing if it is unreachable or does not
    /// offer the analyzer service.
    pub async fn connect(url: impl Into<String>) -> Result<Self> {
        let client = Self { url: url.into() };
        validate_relay_url(&client.url)?;
        client.probe().await?;
        Ok(client)
    }

    /// Client that skips the startup probe
    pub fn lazy(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Handshake then ping
    pub async fn probe(&self) -> Result<()> {
        let mut ws = self.open().await?;
        send(&mut ws, &ClientMessage::Ping).await?;
        match recv(&mut ws).await? {
            ServerMessage::Pong => {}
            other => return Err(unexpected(&other)),
        }
        let _ = ws.close(None).await;
        Ok(())
    }

    /// Run one analysis on the relay
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome> {
        let mut ws = self.open().await?;
        let id = 1;
        send(
            &mut ws,
            &ClientMessage::Analyze {
                id,
                code: request.code.clone(),
                language: request.language.clone(),
            },
        )
        .await?;

        let outcome = loop {
            match recv(&mut ws).await? {
                ServerMessage::Analysis { id: got, text } if got == id => {
                    break Ok(AnalysisResult { text });
                }
                ServerMessage::Failure { id: got, failure } if got == id => break Err(failure),
                ServerMessage::Pong => continue,
                other => return Err(unexpected(&other)),
            }
        };

        let _ = ws.close(None).await;
        Ok(outcome)
    }

    async fn open(&self) -> Result<RelayStream> {
        let (mut ws, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| CodeSentryError::RelayUnavailable {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        send(
            &mut ws,
            &ClientMessage::Hello {
                service: SERVICE_NAME.to_string(),
            },
        )
        .await?;
        match recv(&mut ws).await? {
            ServerMessage::Ready { client_id, .. } => {
                tracing::debug!("Relay session {} opened", client_id);
                Ok(ws)
            }
            ServerMessage::Error { code, message, .. } => Err(CodeSentryError::RelayUnavailable {
                url: self.url.clone(),
                message: format!("{}: {}", code, message),
            }),
            other => Err(unexpected(&other)),
        }
    }
}

async fn send(ws: &mut RelayStream, msg: &ClientMessage) -> Result<()> {
    let json = serde_json::to_string(msg)?;
    ws.send(Message::Text(json))
        .await
        .map_err(|e| CodeSentryError::Protocol {
            message: format!("send failed: {}", e),
        })
}

async fn recv(ws: &mut RelayStream) -> Result<ServerMessage> {
    while let Some(msg) = ws.next().await {
        let msg = msg.map_err(|e| CodeSentryError::Protocol {
            message: format!("receive failed: {}", e),
        })?;
        match msg {
            Message::Text(text) => return Ok(serde_json::from_str(&text)?),
            Message::Close(_) => break,
            _ => continue,
        }
    }
    Err(CodeSentryError::Protocol {
        message: "relay closed the connection".to_string(),
    })
}

fn unexpected(msg: &ServerMessage) -> CodeSentryError {
    match msg {
        ServerMessage::Error { code, message, .. } => CodeSentryError::Protocol {
            message: format!("relay error {}: {}", code, message),
        },
        other => CodeSentryError::Protocol {
            message: format!("unexpected relay message: {:?}", other),
        },
    }
}
