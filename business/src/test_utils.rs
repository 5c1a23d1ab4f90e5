//! Test utilities for business layer testing with mock servers.
//!
//! Sets up a `wiremock` server standing in for the backend and a fully registered
//! `StateCtx` pointed at it, so commands can be driven end to end.
//!
//! # Example
//!
//! ```ignore
//! use secure_business::test_utils::TestContext;
//!
//! #[tokio::test]
//! async fn test_logout() {
//!     let mut test_ctx = TestContext::new().await;
//!     test_ctx.mock_status("POST", "/logout", 200).await;
//!
//!     test_ctx.ctx.enqueue_command::<LogoutCommand>();
//!     test_ctx.flush_and_wait().await;
//!
//!     assert_eq!(*test_ctx.ctx.state::<Route>(), Route::Home);
//! }
//! ```

use std::time::Duration;

use secure_states::StateCtx;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{BusinessConfig, Toast, ToastFeed, build_state_ctx};

/// Context path the mock backend is mounted under, like the real one.
pub const API_PREFIX: &str = "/api/v1.0";

/// Test context that holds a mock server and a configured StateCtx.
pub struct TestContext {
    /// The mock server instance.
    pub mock_server: MockServer,
    /// The state context configured to use the mock server.
    pub ctx: StateCtx,
    /// Toasts pushed by commands.
    pub toasts: ToastFeed,
}

impl TestContext {
    /// Create a new test context with a fresh mock server.
    pub async fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let mock_server = MockServer::start().await;
        let config = BusinessConfig::new(format!("{}{API_PREFIX}", mock_server.uri()));
        let (ctx, toasts) = build_state_ctx(config);

        Self {
            mock_server,
            ctx,
            toasts,
        }
    }

    /// Flush all pending commands and wait for async tasks to complete.
    ///
    /// 1. Sync any pending compute updates
    /// 2. Flush command queue (spawns async tasks)
    /// 3. Await all tasks, syncing after each completes
    /// 4. Final sync and recompute of derived computes
    pub async fn flush_and_wait(&mut self) {
        self.ctx.sync_computes();
        self.ctx.flush_commands();

        let timeout = Duration::from_secs(5);
        let start = std::time::Instant::now();

        while self.ctx.task_count() > 0 {
            if start.elapsed() > timeout {
                panic!(
                    "Timed out waiting for pending tasks ({} still running)",
                    self.ctx.task_count()
                );
            }

            if self.ctx.task_set_mut().join_next().await {
                self.ctx.sync_computes();
            }
        }

        self.ctx.sync_computes();
        self.ctx.run_computed();
        self.ctx.sync_computes();
    }

    /// Every toast pushed since the last call.
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        self.toasts.drain()
    }

    /// Messages of every toast pushed since the last call.
    pub fn take_toast_messages(&mut self) -> Vec<String> {
        self.take_toasts()
            .into_iter()
            .map(|toast| toast.message)
            .collect()
    }

    /// Shutdown the context (cancel all tasks).
    pub async fn shutdown(&mut self) {
        self.ctx.shutdown().await;
    }

    /// Number of requests the mock server received for `endpoint`.
    pub async fn requests_to(&self, endpoint: &str) -> usize {
        let full = format!("{API_PREFIX}{endpoint}");
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == full)
            .count()
    }

    // =========================================================================
    // Mock endpoint helpers
    // =========================================================================

    /// Answers `verb endpoint` with `status` and an empty body.
    pub async fn mock_status(&self, verb: &str, endpoint: &str, status: u16) {
        Mock::given(method(verb))
            .and(path(format!("{API_PREFIX}{endpoint}")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }

    /// Answers `verb endpoint` with `status` and a JSON body.
    pub async fn mock_json(&self, verb: &str, endpoint: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(format!("{API_PREFIX}{endpoint}")))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }

    /// Answers `verb endpoint` with `status` after `delay`.
    pub async fn mock_delayed(&self, verb: &str, endpoint: &str, status: u16, delay: Duration) {
        Mock::given(method(verb))
            .and(path(format!("{API_PREFIX}{endpoint}")))
            .respond_with(ResponseTemplate::new(status).set_delay(delay))
            .mount(&self.mock_server)
            .await;
    }

    /// Mock `GET /profile`.
    pub async fn mock_profile(&self, name: &str, verified: bool) {
        self.mock_json(
            "GET",
            "/profile",
            200,
            serde_json::json!({
                "name": name,
                "email": "user@example.com",
                "userId": "user-1",
                "isAccountVerified": verified
            }),
        )
        .await;
    }

    /// Mock `GET /is-authenticated` answering `logged_in`.
    pub async fn mock_is_authenticated(&self, logged_in: bool) {
        self.mock_json("GET", "/is-authenticated", 200, Value::Bool(logged_in))
            .await;
    }
}

/// A context whose backend address refuses connections.
pub fn unreachable_ctx() -> (StateCtx, ToastFeed) {
    let _ = env_logger::builder().is_test(true).try_init();
    build_state_ctx(BusinessConfig::new("http://127.0.0.1:9/api/v1.0"))
}
