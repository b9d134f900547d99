use async_trait::async_trait;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use tracing::debug;

use super::jwt::JwtService;
use super::session::Session;
use crate::common::UserId;

/// Turns inbound request headers into a `Session`
///
/// Implementations never fail: anything that does not prove an identity
/// resolves to `Session::Anonymous`.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Session;
}

/// Resolves sessions from signed JWTs
///
/// Token lookup order:
/// 1. `Authorization: Bearer <token>` (scripts, service accounts)
/// 2. Session cookie set by the dashboard login flow
pub struct JwtSessionResolver {
    jwt_service: JwtService,
    cookie_name: String,
}

impl JwtSessionResolver {
    pub fn new(jwt_service: JwtService, cookie_name: impl Into<String>) -> Self {
        Self {
            jwt_service,
            cookie_name: cookie_name.into(),
        }
    }

    fn extract_token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        if let Some(token) = bearer_token(headers) {
            return Some(token);
        }
        cookie_value(headers, &self.cookie_name)
    }

    fn session_from_token(&self, token: &str) -> Session {
        let claims = match self.jwt_service.verify_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "Rejected session token");
                return Session::Anonymous;
            }
        };

        let (Ok(user_id), Some(expires_at)) = (UserId::new(claims.sub.clone()), claims.expires_at())
        else {
            debug!("Session token has no usable subject or expiry");
            return Session::Anonymous;
        };

        Session::Authenticated {
            user_id,
            provider: claims.provider,
            expires_at,
        }
    }
}

#[async_trait]
impl SessionResolver for JwtSessionResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Session {
        match self.extract_token(headers) {
            Some(token) => self.session_from_token(token),
            None => Session::Anonymous,
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;
    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Find a cookie by name across every `Cookie` header
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}
