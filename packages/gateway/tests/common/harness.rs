//! Test harness for gateway integration tests.
//!
//! Each test gets its own `wiremock` server standing in for the backend and a
//! router built from a test configuration that points at it.

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use chrono::Duration;
use gateway_core::common::UserId;
use gateway_core::config::{Config, RateLimit};
use gateway_core::domains::auth::{AuthProvider, JwtService};
use gateway_core::server::build_app;
use test_context::AsyncTestContext;
use tower::ServiceExt;
use wiremock::MockServer;

pub const TEST_SECRET: &str = "test_session_secret";
pub const TEST_ISSUER: &str = "test_issuer";
pub const TEST_COOKIE: &str = "session-token";

/// Test harness that manages a mock backend.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let response = ctx.send(ctx.app(), request).await;
///     // ... assertions
/// }
/// ```
pub struct TestHarness {
    /// Mock backend - mount expectations on this.
    pub backend: MockServer,
    pub jwt_service: JwtService,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        // Uses try_init() to avoid panicking if already initialized.
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        Self {
            backend: MockServer::start().await,
            jwt_service: JwtService::new(TEST_SECRET, TEST_ISSUER.to_string()),
        }
    }

    async fn teardown(self) {
        // Mock expectations are verified when the server is dropped
    }
}

impl TestHarness {
    /// Configuration pointing at the mock backend, rate limiting off.
    pub fn config(&self) -> Config {
        Config {
            port: 0,
            backend_url: Some(self.backend.uri()),
            session_secret: TEST_SECRET.to_string(),
            session_issuer: TEST_ISSUER.to_string(),
            session_cookie_name: TEST_COOKIE.to_string(),
            upstream_timeout: std::time::Duration::from_secs(5),
            max_body_bytes: 1024 * 1024,
            rate_limit: None,
        }
    }

    pub fn app(&self) -> Router {
        self.app_with(|_| {})
    }

    /// Router built from the test configuration after `adjust` has run.
    pub fn app_with(&self, adjust: impl FnOnce(&mut Config)) -> Router {
        let mut config = self.config();
        adjust(&mut config);
        build_app(&config).expect("Failed to build app")
    }

    pub fn token_for(&self, user_id: &str) -> String {
        self.jwt_service
            .create_token(
                &UserId::new(user_id).expect("valid user id"),
                AuthProvider::OAuth,
                Duration::hours(1),
            )
            .expect("Failed to sign token")
    }

    pub async fn send(&self, app: Router, request: Request<Body>) -> Response<Body> {
        app.oneshot(request).await.expect("Router is infallible")
    }

    /// Requests the backend has received so far.
    pub async fn backend_requests(&self) -> Vec<wiremock::Request> {
        self.backend
            .received_requests()
            .await
            .expect("Request recording is enabled")
    }
}

pub fn with_rate_limit(replenish_secs: u64, burst: u32) -> impl FnOnce(&mut Config) {
    move |config| config.rate_limit = RateLimit::new(replenish_secs, burst)
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}
