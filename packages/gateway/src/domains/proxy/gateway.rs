use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::header::CONTENT_ENCODING,
    response::Response,
};
use bytes::Bytes;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::error::GatewayError;
use super::request::{method_allows_body, ForwardedRequest, UpstreamBase};
use crate::config::Config;
use crate::domains::auth::Session;

/// Authenticated forwarding gateway
///
/// Stateless between requests: the only shared values are the HTTP client and
/// the read-only configuration captured at construction.
#[derive(Clone)]
pub struct Gateway {
    client: reqwest::Client,
    upstream: Option<UpstreamBase>,
    timeout: Duration,
    max_body_bytes: usize,
}

impl Gateway {
    /// Create a gateway for the given backend
    ///
    /// Redirects are never followed: a followed redirect would replay the
    /// identity header against whatever host the backend points at.
    pub fn new(
        upstream: Option<UpstreamBase>,
        timeout: Duration,
        max_body_bytes: usize,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            upstream,
            timeout,
            max_body_bytes,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let upstream = config.backend_url.as_deref().and_then(UpstreamBase::new);
        if upstream.is_none() {
            warn!("BACKEND_URL is not set; every forwarded request will fail");
        }
        Self::new(upstream, config.upstream_timeout, config.max_body_bytes)
    }

    pub fn is_configured(&self) -> bool {
        self.upstream.is_some()
    }

    /// Forward one dashboard request to the backend
    ///
    /// Checks run in order: backend configured, then caller authenticated.
    /// Nothing is sent upstream unless both pass. `path` is the wildcard part
    /// of the inbound path; the query string is taken from the request URI.
    pub async fn forward(
        &self,
        session: &Session,
        path: &str,
        request: Request,
    ) -> Result<Response, GatewayError> {
        let Some(upstream) = self.upstream.as_ref() else {
            error!("Refusing to forward: backend URL not configured");
            return Err(GatewayError::UpstreamNotConfigured);
        };

        let Some(user_id) = session.user_id() else {
            debug!(path, "Rejected unauthenticated request");
            return Err(GatewayError::Unauthorized);
        };

        let (parts, body) = request.into_parts();

        let body = if method_allows_body(&parts.method) {
            to_bytes(body, self.max_body_bytes)
                .await
                .map_err(GatewayError::InvalidBody)?
        } else {
            Bytes::new()
        };

        let forwarded = ForwardedRequest::new(
            parts.method,
            path,
            parts.uri.query(),
            &parts.headers,
            user_id,
            body,
        )
        .map_err(|e| {
            warn!(error = %e, "User id cannot be sent as a header");
            GatewayError::Unauthorized
        })?;

        let target = forwarded.target_url(upstream);
        info!(
            user_id = %user_id,
            method = %forwarded.method,
            target = %target,
            "Forwarding request to backend"
        );

        let mut outgoing = self
            .client
            .request(forwarded.method, &target)
            .headers(forwarded.headers);
        if let Some(body) = forwarded.body {
            outgoing = outgoing.body(body);
        }

        let upstream_response = match tokio::time::timeout(self.timeout, outgoing.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                error!(error = %e, target = %target, "Backend request failed");
                return Err(GatewayError::UpstreamUnavailable(e));
            }
            Err(_) => {
                error!(
                    timeout_secs = self.timeout.as_secs(),
                    target = %target,
                    "Backend did not respond in time"
                );
                return Err(GatewayError::UpstreamTimeout(self.timeout));
            }
        };

        debug!(status = %upstream_response.status(), target = %target, "Backend responded");

        Ok(stream_back(upstream_response))
    }
}

/// Relay status, headers and body of the backend response
///
/// The client has already decoded any transport compression, so the original
/// `Content-Encoding` would make the browser decode the body a second time.
fn stream_back(upstream_response: reqwest::Response) -> Response {
    let status = upstream_response.status();
    let mut headers = upstream_response.headers().clone();
    headers.remove(CONTENT_ENCODING);

    let mut response = Response::new(Body::from_stream(upstream_response.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::UserId;
    use crate::domains::auth::AuthProvider;
    use axum::http::StatusCode;
    use chrono::Utc;

    fn authenticated() -> Session {
        Session::Authenticated {
            user_id: UserId::new("u_42").unwrap(),
            provider: AuthProvider::Credentials,
            expires_at: Utc::now() + chrono::Duration::hours(1),
        }
    }

    fn gateway(upstream: Option<&str>) -> Gateway {
        Gateway::new(
            upstream.and_then(UpstreamBase::new),
            Duration::from_secs(5),
            1024,
        )
        .unwrap()
    }

    fn get(uri: &str) -> Request {
        axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_upstream_checked_before_session() {
        let result = gateway(None)
            .forward(&Session::Anonymous, "agents", get("/api/backend/agents"))
            .await;

        assert!(matches!(result, Err(GatewayError::UpstreamNotConfigured)));
    }

    #[tokio::test]
    async fn test_anonymous_rejected() {
        let result = gateway(Some("http://127.0.0.1:1"))
            .forward(&Session::Anonymous, "agents", get("/api/backend/agents"))
            .await;

        assert!(matches!(result, Err(GatewayError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/backend/knowledge")
            .body(Body::from(vec![b'x'; 2048]))
            .unwrap();

        let result = gateway(Some("http://127.0.0.1:1"))
            .forward(&authenticated(), "knowledge", request)
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidBody(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        let result = gateway(Some("http://127.0.0.1:1"))
            .forward(&authenticated(), "agents", get("/api/backend/agents"))
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "Failed to reach backend");
    }
}
