//! Relay daemon
//!
//! Exposes [`Relay::analyze`] to gateways running in other processes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  WebSocket (JSON)   ┌──────────────────────────┐  HTTPS   ┌────────────────┐
//! │   gateway    │ ──────────────────► │  codesentry relay         │ ───────► │ generative API │
//! │ RelayClient  │ ◄────────────────── │  ConnectionState per conn │ ◄─────── │                │
//! └──────────────┘                     │  Arc<Relay> (credential)  │          └────────────────┘
//!                                      └──────────────────────────┘
//! ```
//!
//! # Protocol
//!
//! ```json
//! // Client -> Relay
//! {"type": "hello", "service": "AIAnalyzer"}
//! {"type": "analyze", "id": 1, "code": "eval(input())", "language": "python"}
//! {"type": "ping"}
//!
//! // Relay -> Client
//! {"type": "ready", "client_id": "gw_...", "service": "AIAnalyzer"}
//! {"type": "analysis", "id": 1, "text": "1. **Code Injection** ..."}
//! {"type": "failure", "id": 1, "failure": {"kind": "upstream_status", "status": 429}}
//! {"type": "error", "id": null, "code": "not_connected", "message": "..."}
//! {"type": "pong"}
//! ```

pub mod client;
pub mod connection;
pub mod protocol;

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::relay::Relay;

pub use client::RelayClient;
pub use connection::handle_connection;
pub use protocol::{ClientMessage, ServerMessage};

/// Accept relay connections until the listener fails irrecoverably.
pub async fn serve(listener: TcpListener, relay: Arc<Relay>) -> crate::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Relay listening on ws://{}", addr);
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                tracing::debug!("Accepted connection from {}", addr);
                let relay = Arc::clone(&relay);
                tokio::spawn(async move {
                    handle_connection(stream, relay).await;
                });
            }
            Err(e) => {
                tracing::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
