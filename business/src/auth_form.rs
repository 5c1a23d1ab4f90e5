//! Combined login / registration form.
//!
//! `AuthFormInput::is_create_account` selects the mode. `SubmitAuthFormCommand` checks
//! the required fields locally, then calls `POST /register` or `POST /login`.
//!
//! ## Outcomes
//!
//! - Register 201: fields cleared, "Account created successfully.", go home
//! - Register other status: always "Email already exists!"
//! - Login 200: session logged in and profile reloaded, "Welcome Back <first name>!",
//!   fields cleared, go home
//! - Login other status: server message or "Email/Password incorrect"
//! - Transport failure in either mode: "Something went wrong."

use std::any::Any;

use log::{info, warn};
use secure_states::{
    Command, CommandFuture, CommandSnapshot, Compute, SnapshotClone, State, Updater, assign_impl,
    state_assign_impl,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::api::{GENERIC_MESSAGE, LOGIN, REGISTER};
use crate::error::{ApiError, send_expecting};
use crate::http::{Client, Response};
use crate::notification::Notifier;
use crate::session::{SessionCompute, refresh_session};
use crate::settle::SettleGuard;
use crate::{BusinessConfig, Route};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthFormInput {
    pub is_create_account: bool,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl AuthFormInput {
    /// Switches between login and registration. Field values are kept.
    pub fn toggle_mode(&mut self) {
        self.is_create_account = !self.is_create_account;
    }

    /// Label of the first required field that is empty in the current mode.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.is_create_account && self.name.trim().is_empty() {
            return Some("Name");
        }
        if self.email.trim().is_empty() {
            return Some("Email");
        }
        if self.password.is_empty() {
            return Some("Password");
        }
        None
    }

    /// Same mode, empty fields.
    pub fn cleared(&self) -> Self {
        Self {
            is_create_account: self.is_create_account,
            ..Self::default()
        }
    }
}

impl SnapshotClone for AuthFormInput {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for AuthFormInput {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthFormCompute {
    pub loading: bool,
}

impl SnapshotClone for AuthFormCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(*self))
    }
}

impl State for AuthFormCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}

impl Compute for AuthFormCompute {}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub name: Option<String>,
}

/// First space-separated word of `name`, or "User".
pub fn first_name(name: Option<&str>) -> &str {
    name.and_then(|name| name.split_whitespace().next())
        .unwrap_or("User")
}

/// Submits the form in its current mode.
///
/// Dispatch as a page command: `ctx.enqueue_page_command::<SubmitAuthFormCommand>()`.
#[derive(Default, Debug)]
pub struct SubmitAuthFormCommand;

impl Command for SubmitAuthFormCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        if snap.compute::<AuthFormCompute>().loading {
            info!("SubmitAuthFormCommand: already submitting, ignoring");
            return Box::pin(async {});
        }

        let notifier = snap.state::<Notifier>().clone();
        let input = snap.state::<AuthFormInput>().clone();
        if let Some(field) = input.missing_field() {
            notifier.error(format!("{field} is required"));
            return Box::pin(async {});
        }

        let config = snap.state::<BusinessConfig>().clone();
        let client = snap.state::<Client>().clone();
        let guard = SettleGuard::begin(
            updater.clone(),
            AuthFormCompute { loading: true },
            AuthFormCompute { loading: false },
        );

        Box::pin(async move {
            let _guard = guard;
            if input.is_create_account {
                register(&client, &config, &input, &notifier, &updater, &cancel).await;
            } else {
                login(&client, &config, &input, &notifier, &updater, &cancel).await;
            }
        })
    }
}

async fn post_json<T: Serialize>(
    client: &Client,
    url: &str,
    body: &T,
) -> Result<Response, ApiError> {
    Ok(client.post(url).json(body)?.send().await?)
}

async fn register(
    client: &Client,
    config: &BusinessConfig,
    input: &AuthFormInput,
    notifier: &Notifier,
    updater: &Updater,
    cancel: &CancellationToken,
) {
    info!("SubmitAuthFormCommand: registering '{}'", input.email.trim());
    let body = RegisterRequest {
        name: input.name.trim().to_owned(),
        email: input.email.trim().to_owned(),
        password: input.password.clone(),
    };
    let request = post_json(client, config.api_url(REGISTER).as_str(), &body);
    let Some(result) = cancel.run_until_cancelled(request).await else {
        return;
    };

    match result {
        Ok(response) if response.status == 201 => {
            updater.set(input.cleared());
            notifier.success("Account created successfully.");
            updater.set(Route::Home);
        }
        Ok(response) => {
            warn!("SubmitAuthFormCommand: register answered {}", response.status);
            notifier.error("Email already exists!");
        }
        Err(err) => {
            warn!("SubmitAuthFormCommand: register failed: {err}");
            notifier.error(GENERIC_MESSAGE);
        }
    }
}

async fn login(
    client: &Client,
    config: &BusinessConfig,
    input: &AuthFormInput,
    notifier: &Notifier,
    updater: &Updater,
    cancel: &CancellationToken,
) {
    info!("SubmitAuthFormCommand: logging in '{}'", input.email.trim());
    let body = LoginRequest {
        email: input.email.trim().to_owned(),
        password: input.password.clone(),
    };
    let request = post_json(client, config.api_url(LOGIN).as_str(), &body);
    let Some(result) = cancel.run_until_cancelled(request).await else {
        return;
    };

    let response = match result {
        Ok(response) if response.status == 200 => response,
        Ok(response) => {
            let err = ApiError::from_response(&response);
            warn!("SubmitAuthFormCommand: login failed: {err}");
            notifier.error(err.user_message("Email/Password incorrect"));
            return;
        }
        Err(err) => {
            warn!("SubmitAuthFormCommand: login failed: {err}");
            notifier.error(GENERIC_MESSAGE);
            return;
        }
    };

    let login = response.json::<LoginResponse>().unwrap_or_default();
    info!("SubmitAuthFormCommand: logged in");
    // The backend session exists from here on, whether or not the page is still shown.
    updater
        .app_scoped()
        .set(SessionCompute::logged_in(None));
    notifier.success(format!(
        "Welcome Back {}!",
        first_name(login.name.as_deref())
    ));
    updater.set(input.cleared());
    updater.set(Route::Home);
    refresh_session(client, config, updater).await;
}
