use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Failures of a forwarded call, each mapped to its own status class
///
/// The `Display` text doubles as the response message, so it stays generic;
/// sources are logged by the gateway and never sent to the caller.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Backend URL not configured")]
    UpstreamNotConfigured,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid request body")]
    InvalidBody(#[source] axum::Error),

    #[error("Failed to reach backend")]
    UpstreamUnavailable(#[source] reqwest::Error),

    #[error("Failed to reach backend")]
    UpstreamTimeout(Duration),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::UpstreamNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            GatewayError::UpstreamUnavailable(_) | GatewayError::UpstreamTimeout(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
