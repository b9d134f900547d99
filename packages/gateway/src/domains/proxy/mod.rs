//! Proxy domain - the authenticated forwarding gateway
//!
//! Every dashboard API call goes through here: the caller's session is
//! checked, the request is rewritten for the backend (identity header in, hop
//! headers out) and the backend's response is streamed back untouched apart
//! from `Content-Encoding`.

pub mod error;
pub mod gateway;
pub mod request;

pub use error::GatewayError;
pub use gateway::Gateway;
pub use request::{ForwardedRequest, UpstreamBase, BACKEND_API_NAMESPACE};
