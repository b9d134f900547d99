//! Auth domain - resolves the caller's session for every dashboard request
//!
//! Responsibilities:
//! - Signed session tokens (JWT, HS256) issued for OAuth and credential logins
//! - Turning an inbound request's bearer token or session cookie into a `Session`
//!
//! Login flows and the identity store live outside the gateway; this domain only
//! verifies what they issued.

pub mod jwt;
pub mod resolver;
pub mod session;

pub use jwt::{Claims, JwtService};
pub use resolver::{JwtSessionResolver, SessionResolver};
pub use session::{AuthProvider, Session};
