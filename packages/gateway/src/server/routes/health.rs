use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    upstream_configured: bool,
}

/// Health check endpoint
///
/// Does not call the backend; reports whether forwarding is possible at all.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        upstream_configured: state.gateway.is_configured(),
    })
}
