use axum::http::header::{InvalidHeaderValue, ACCEPT_ENCODING};
use axum::http::{HeaderMap, HeaderValue, Method};
use bytes::Bytes;

use crate::common::{UserId, HOP_BY_HOP_HEADERS, X_USER_ID};
use crate::config::normalize_backend_url;

/// Path segment every forwarded call is placed under on the backend
pub const BACKEND_API_NAMESPACE: &str = "api";

/// Base URL of the backend, without trailing slash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamBase(String);

impl UpstreamBase {
    /// Returns `None` for blank input.
    pub fn new(raw: &str) -> Option<Self> {
        normalize_backend_url(raw).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A dashboard request rewritten for the backend
///
/// Built once per inbound call and consumed by the gateway when it issues the
/// outgoing request.
#[derive(Debug, Clone)]
pub struct ForwardedRequest {
    pub method: Method,
    /// Wildcard part of the inbound path, segments already slash-joined
    pub path: String,
    /// Raw query string without the leading `?`
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl ForwardedRequest {
    pub fn new(
        method: Method,
        path: &str,
        query: Option<&str>,
        inbound_headers: &HeaderMap,
        user_id: &UserId,
        body: Bytes,
    ) -> Result<Self, InvalidHeaderValue> {
        let headers = forwarded_headers(inbound_headers, user_id)?;
        let body = (method_allows_body(&method) && !body.is_empty()).then_some(body);

        Ok(Self {
            method,
            path: path.trim_start_matches('/').to_string(),
            query: query.filter(|q| !q.is_empty()).map(str::to_string),
            headers,
            body,
        })
    }

    /// `<base>/api/<path>[?<query>]`, query passed through verbatim
    pub fn target_url(&self, base: &UpstreamBase) -> String {
        let mut url = format!(
            "{}/{}/{}",
            base.as_str(),
            BACKEND_API_NAMESPACE,
            self.path
        );
        if let Some(query) = &self.query {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}

/// `GET` and `HEAD` are forwarded without a body, whatever the caller sent.
pub fn method_allows_body(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD)
}

/// Copy inbound headers, drop hop headers and set the identity header
///
/// `insert` replaces every existing `x-user-id` value, so a caller cannot
/// smuggle a second identity past the gateway.
///
/// The browser's `Accept-Encoding` is dropped as well: the client then
/// advertises only the codecs it decodes, and the relayed body is always
/// plain.
pub fn forwarded_headers(
    inbound: &HeaderMap,
    user_id: &UserId,
) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = inbound.clone();
    for name in HOP_BY_HOP_HEADERS.iter() {
        headers.remove(name);
    }
    headers.remove(ACCEPT_ENCODING);
    headers.insert(&X_USER_ID, HeaderValue::from_str(user_id.as_str())?);
    Ok(headers)
}
