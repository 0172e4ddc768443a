//! WebSocket connection handler
//!
//! One task per gateway connection. Requests on a connection are served in
//! order; each analyze call is awaited before the next message is read.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{accept_async, tungstenite::Message, WebSocketStream};

use crate::analysis::AnalysisRequest;
use crate::config::SERVICE_NAME;
use crate::relay::Relay;
use crate::relay_server::protocol::{ClientMessage, ServerMessage};

/// Handle a single WebSocket connection
pub async fn handle_connection(stream: TcpStream, relay: Arc<Relay>) {
    let addr = stream.peer_addr().ok();
    tracing::debug!("New connection from {:?}", addr);

    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            tracing::error!("WebSocket handshake failed: {}", e);
            return;
        }
    };

    let mut conn = ConnectionState::new(ws_stream, relay);
    conn.run().await;

    tracing::debug!("Connection closed from {:?}", addr);
}

/// State for a single connection
struct ConnectionState {
    ws: WebSocketStream<TcpStream>,
    relay: Arc<Relay>,
    client_id: String,
    ready: bool,
}

impl ConnectionState {
    fn new(ws: WebSocketStream<TcpStream>, relay: Arc<Relay>) -> Self {
        let client_id = format!("gw_{}", uuid::Uuid::new_v4().simple());
        Self {
            ws,
            relay,
            client_id,
            ready: false,
        }
    }

    async fn run(&mut self) {
        while let Some(msg) = self.ws.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if let Err(e) = self.handle_message(&text).await {
                        tracing::error!("Error handling message from {}: {}", self.client_id, e);
                        break;
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!("Client {} requested close", self.client_id);
                    break;
                }
                Ok(Message::Ping(data)) => {
                    let _ = self.ws.send(Message::Pong(data)).await;
                }
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    }

    /// Errors returned here are transport failures and end the connection.
    async fn handle_message(&mut self, text: &str) -> anyhow::Result<()> {
        let msg: ClientMessage = match serde_json::from_str(text) {
            Ok(msg) => msg,
            Err(e) => {
                return self
                    .send(&ServerMessage::error(None, "bad_message", e.to_string()))
                    .await;
            }
        };

        match msg {
            ClientMessage::Hello { service } => {
                if service != SERVICE_NAME {
                    tracing::warn!("Client {} asked for unknown service {}", self.client_id, service);
                    return self
                        .send(&ServerMessage::error(
                            None,
                            "unknown_service",
                            format!("No service named '{}'", service),
                        ))
                        .await;
                }
                self.ready = true;
                let reply = ServerMessage::Ready {
                    client_id: self.client_id.clone(),
                    service,
                };
                self.send(&reply).await?;
            }

            ClientMessage::Analyze { id, code, language } => {
                if !self.ready {
                    return self
                        .send(&ServerMessage::error(
                            Some(id),
                            "not_connected",
                            "Send hello before analyze",
                        ))
                        .await;
                }

                tracing::info!("Client {} requested analysis of {} code", self.client_id, language);
                let request = AnalysisRequest { code, language };
                let reply = match self.relay.analyze(&request).await {
                    Ok(result) => ServerMessage::Analysis { id, text: result.text },
                    Err(failure) => {
                        tracing::warn!("Analysis {} failed: {}", id, failure);
                        ServerMessage::Failure { id, failure }
                    }
                };
                self.send(&reply).await?;
            }

            ClientMessage::Ping => {
                self.send(&ServerMessage::Pong).await?;
            }
        }

        Ok(())
    }

    async fn send(&mut self, msg: &ServerMessage) -> anyhow::Result<()> {
        let json = serde_json::to_string(msg)?;
        self.ws.send(Message::Text(json)).await?;
        Ok(())
    }
}
