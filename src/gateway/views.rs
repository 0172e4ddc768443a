use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::gateway::serializers::{AnalyzeIn, AnalyzeOut, ApiError, Health};
use crate::gateway::GatewayState;

/// POST /api/analyze
pub async fn analyze(State(state): State<GatewayState>, body: String) -> Response {
    let request = match AnalyzeIn::parse(&body).and_then(AnalyzeIn::validate) {
        Ok(request) => request,
        Err(message) => {
            tracing::info!("Rejected analysis request: {}", message);
            return with_cors(StatusCode::BAD_REQUEST, Json(ApiError { error: message }));
        }
    };

    tracing::info!(
        "Analysis requested: {} ({} bytes of code)",
        request.language,
        request.code.len()
    );

    match state.backend.analyze(&request).await {
        Ok(outcome) => with_cors(StatusCode::OK, Json(AnalyzeOut::from(outcome))),
        Err(e) => {
            tracing::error!("Analysis via {} failed: {}", state.backend.describe(), e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Any method other than POST on /api/analyze
pub async fn method_not_allowed() -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}

/// GET /healthz
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        service: "codesentry-gateway",
    })
}

fn with_cors(status: StatusCode, body: impl IntoResponse) -> Response {
    let mut response = (status, body).into_response();
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}
