use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::gateway::{assets, views, GatewayState};

pub fn routes(state: GatewayState) -> Router {
    Router::new()
        .route(
            "/api/analyze",
            post(views::analyze)
                .fallback(views::method_not_allowed)
                .layer(DefaultBodyLimit::disable()),
        )
        .route("/healthz", get(views::health))
        .fallback(assets::serve)
        .with_state(state)
}
