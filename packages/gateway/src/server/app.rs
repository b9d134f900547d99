//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    middleware,
    routing::{any, get},
    Router,
};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::domains::auth::{JwtService, JwtSessionResolver, SessionResolver};
use crate::domains::proxy::Gateway;
use crate::server::middleware::session_middleware;
use crate::server::routes::{backend_proxy_handler, health_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub session_resolver: Arc<dyn SessionResolver>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let jwt_service = JwtService::new(&config.session_secret, config.session_issuer.clone());
        let session_resolver: Arc<dyn SessionResolver> = Arc::new(JwtSessionResolver::new(
            jwt_service,
            config.session_cookie_name.clone(),
        ));

        Ok(Self {
            gateway: Arc::new(Gateway::from_config(config)?),
            session_resolver,
        })
    }
}

/// Build the Axum application router from configuration
pub fn build_app(config: &Config) -> Result<Router> {
    let state = AppState::from_config(config)?;
    build_router(state, config)
}

/// Build the router around an existing state
///
/// Split from `build_app` so tests can supply their own session resolver.
pub fn build_router(state: AppState, config: &Config) -> Result<Router> {
    let resolver_for_middleware = state.session_resolver.clone();

    let mut router = Router::new()
        // Every method is forwarded through the same handler
        .route("/api/backend/*path", any(backend_proxy_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn(move |req, next| {
            session_middleware(resolver_for_middleware.clone(), req, next)
        }));

    // Rate limiting keyed by client IP (X-Forwarded-For, X-Real-IP, Forwarded,
    // then peer address). No x-ratelimit-* headers are added, so proxied
    // responses reach the dashboard unchanged.
    if let Some(limit) = config.rate_limit {
        let rate_limit_config = Arc::new(
            GovernorConfigBuilder::default()
                .per_second(limit.replenish_secs)
                .burst_size(limit.burst)
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .context("Invalid rate limit configuration")?,
        );
        info!(
            replenish_secs = limit.replenish_secs,
            burst = limit.burst,
            "Rate limiting enabled"
        );
        router = router.layer(GovernorLayer {
            config: rate_limit_config,
        });
    }

    Ok(router
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http()))
}
