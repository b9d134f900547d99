use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Backend base URL without trailing slash. `None` is not a startup
    /// failure: forwarded requests answer with a configuration error instead.
    pub backend_url: Option<String>,
    pub session_secret: String,
    pub session_issuer: String,
    pub session_cookie_name: String,
    pub upstream_timeout: Duration,
    pub max_body_bytes: usize,
    /// `None` disables per-IP rate limiting.
    pub rate_limit: Option<RateLimit>,
}

/// Per-IP rate limit applied in front of every route
///
/// A client may send `burst` requests at once; one more slot frees up every
/// `replenish_secs` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub replenish_secs: u64,
    pub burst: u32,
}

pub const DEFAULT_SESSION_ISSUER: &str = "agency-dashboard";
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "session-token";
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let rate_limit_replenish_secs: u64 = env::var("RATE_LIMIT_REPLENISH_SECS")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .context("RATE_LIMIT_REPLENISH_SECS must be a valid number")?;
        let rate_limit_burst: u32 = env::var("RATE_LIMIT_BURST")
            .unwrap_or_else(|_| "20".to_string())
            .parse()
            .context("RATE_LIMIT_BURST must be a valid number")?;

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            backend_url: env::var("BACKEND_URL")
                .ok()
                .and_then(|raw| normalize_backend_url(&raw)),
            session_secret: env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?,
            session_issuer: env::var("SESSION_ISSUER")
                .unwrap_or_else(|_| DEFAULT_SESSION_ISSUER.to_string()),
            session_cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| DEFAULT_SESSION_COOKIE_NAME.to_string()),
            upstream_timeout: Duration::from_secs(
                env::var("UPSTREAM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("UPSTREAM_TIMEOUT_SECS must be a valid number")?,
            ),
            max_body_bytes: env::var("MAX_BODY_BYTES")
                .ok()
                .map(|raw| raw.parse())
                .transpose()
                .context("MAX_BODY_BYTES must be a valid number")?
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
            rate_limit: RateLimit::new(rate_limit_replenish_secs, rate_limit_burst),
        })
    }
}

impl RateLimit {
    /// Zero in either field disables rate limiting.
    pub fn new(replenish_secs: u64, burst: u32) -> Option<Self> {
        (replenish_secs > 0 && burst > 0).then_some(Self {
            replenish_secs,
            burst,
        })
    }
}

/// Trim whitespace and trailing slashes; an empty value counts as unset.
pub fn normalize_backend_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
