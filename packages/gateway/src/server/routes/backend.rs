use axum::{
    extract::{Extension, Request},
    response::{IntoResponse, Response},
};

use crate::domains::auth::Session;
use crate::server::app::AppState;

/// Mount point of the forwarding route; everything after it is passed on
pub const BACKEND_PROXY_PREFIX: &str = "/api/backend/";

/// Forward any dashboard API call to the backend
///
/// The wildcard is taken from the raw request path rather than the decoded
/// `Path` extractor so percent-encoded segments reach the backend unchanged.
pub async fn backend_proxy_handler(
    Extension(state): Extension<AppState>,
    session: Option<Extension<Session>>,
    request: Request,
) -> Response {
    let session = session.map(|Extension(session)| session).unwrap_or_default();
    let path = request
        .uri()
        .path()
        .strip_prefix(BACKEND_PROXY_PREFIX)
        .unwrap_or_default()
        .to_string();

    match state.gateway.forward(&session, &path, request).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}
