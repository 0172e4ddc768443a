//! Public HTTP gateway
//!
//! - `POST /api/analyze` — run one analysis through the [`Backend`]
//! - `GET /healthz` — liveness
//! - everything else — front-end assets

pub mod assets;
pub mod serializers;
pub mod urls;
pub mod views;

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::backend::Backend;

/// Shared by every request; cheap to clone.
#[derive(Debug, Clone)]
pub struct GatewayState {
    pub backend: Backend,
    pub static_dir: Option<Arc<Path>>,
}

impl GatewayState {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            static_dir: None,
        }
    }

    pub fn with_static_dir(mut self, dir: Option<&Path>) -> Self {
        self.static_dir = dir.map(Arc::from);
        self
    }
}

/// Build the gateway router
pub fn router(state: GatewayState) -> Router {
    urls::routes(state)
}

/// Serve the gateway on an already-bound listener
pub async fn serve(listener: TcpListener, state: GatewayState) -> crate::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("Gateway listening on http://{} ({})", addr, state.backend.describe());
    axum::serve(listener, router(state)).await?;
    Ok(())
}
