//! Header names shared by the session resolver and the proxy.

use axum::http::header::{
    HeaderName, CONNECTION, CONTENT_LENGTH, HOST, TE, TRAILER, TRANSFER_ENCODING, UPGRADE,
};

/// Header carrying the authenticated caller's id to the backend.
///
/// The backend trusts this header instead of re-validating the session, so the
/// gateway always overwrites any inbound value.
pub static X_USER_ID: HeaderName = HeaderName::from_static("x-user-id");

/// Headers that only describe the inbound hop and must not be replayed
/// against the backend host.
///
/// `Content-Length` is included because the HTTP client recomputes it from
/// the body that is actually attached.
pub static HOP_BY_HOP_HEADERS: [HeaderName; 9] = [
    HOST,
    CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    TE,
    TRAILER,
    TRANSFER_ENCODING,
    UPGRADE,
    CONTENT_LENGTH,
];
