use axum::{extract::Request, middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

use crate::domains::auth::{Session, SessionResolver};

/// Session middleware
///
/// Resolves the caller's session from the bearer token or session cookie and
/// stores it in request extensions. Every request gets a `Session`; callers
/// without valid credentials get `Session::Anonymous`.
///
/// Note: This middleware does NOT block requests - routes that need an
/// authenticated caller enforce that themselves.
pub async fn session_middleware(
    resolver: Arc<dyn SessionResolver>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = resolver.resolve(request.headers()).await;

    match session.user_id() {
        Some(user_id) => debug!(user_id = %user_id, "Authenticated request"),
        None => debug!("No valid session"),
    }

    request.extensions_mut().insert::<Session>(session);

    next.run(request).await
}
