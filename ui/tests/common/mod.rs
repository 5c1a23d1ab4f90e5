#![allow(dead_code)]

use std::time::Duration;

use egui_kittest::Harness;
use secure_business::test_utils::API_PREFIX;
use secure_business::{Route, SessionCompute, UserProfile};
use secure_ui::SecureApp;
use secure_ui::state::State;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Time to wait for async API responses in tests (milliseconds).
pub const API_RESPONSE_WAIT_MS: u64 = 150;

pub struct TestCtx<'a> {
    mock_server: MockServer,
    harness: Harness<'a, SecureApp>,
}

impl<'a> TestCtx<'a> {
    pub async fn new_app() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let mock_server = MockServer::start().await;
        let state = State::test(format!("{}{API_PREFIX}", mock_server.uri()));
        let app = SecureApp::new(state);
        let harness = Harness::new_eframe(|_| app);

        Self {
            mock_server,
            harness,
        }
    }

    /// An app already showing `route`.
    pub async fn new_app_at(route: Route) -> Self {
        let mut ctx = Self::new_app().await;
        ctx.navigate(route);
        ctx
    }

    pub fn harness_mut(&mut self) -> &mut Harness<'a, SecureApp> {
        &mut self.harness
    }

    pub fn harness(&self) -> &Harness<'a, SecureApp> {
        &self.harness
    }

    pub fn mock_server(&self) -> &MockServer {
        &self.mock_server
    }

    pub fn state_mut(&mut self) -> &mut State {
        self.harness.state_mut().state_mut()
    }

    pub fn state(&self) -> &State {
        self.harness.state().state()
    }

    pub fn route(&self) -> Route {
        *self.state().ctx.state::<Route>()
    }

    /// Moves to `route` and renders it, as if a link had been followed.
    pub fn navigate(&mut self, route: Route) {
        self.state_mut()
            .ctx
            .update::<Route>(|current| *current = route);
        self.harness.step();
        self.harness.step();
    }

    /// Pretends the session probe found a logged-in user.
    pub fn log_in(&mut self, name: &str, verified: bool) {
        self.state_mut()
            .ctx
            .updater()
            .set(SessionCompute::logged_in(Some(UserProfile {
                name: name.to_owned(),
                is_account_verified: verified,
                ..Default::default()
            })));
        self.harness.step();
        self.harness.step();
    }

    /// Lets in-flight requests finish, then renders their results.
    pub async fn settle(&mut self) {
        tokio::time::sleep(Duration::from_millis(API_RESPONSE_WAIT_MS)).await;
        for _ in 0..3 {
            self.harness.step();
        }
    }

    pub async fn mock_status(&self, verb: &str, endpoint: &str, status: u16) {
        Mock::given(method(verb))
            .and(path(format!("{API_PREFIX}{endpoint}")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_json(&self, verb: &str, endpoint: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(format!("{API_PREFIX}{endpoint}")))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_delayed(&self, verb: &str, endpoint: &str, status: u16, delay: Duration) {
        Mock::given(method(verb))
            .and(path(format!("{API_PREFIX}{endpoint}")))
            .respond_with(ResponseTemplate::new(status).set_delay(delay))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_json_delayed(&self, verb: &str, endpoint: &str, body: Value, delay: Duration) {
        Mock::given(method(verb))
            .and(path(format!("{API_PREFIX}{endpoint}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
            .mount(&self.mock_server)
            .await;
    }
}
