//! Session context: whether the user is logged in and who they are.
//!
//! `SessionCompute` is a command-updated cache. It is written only by success handlers
//! (probe, login, logout, email verification) and read by every page.

use std::any::Any;

use log::{info, warn};
use secure_states::{
    Command, CommandFuture, CommandSnapshot, Compute, SnapshotClone, State, Updater, assign_impl,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::BusinessConfig;
use crate::api::{IS_AUTHENTICATED, PROFILE};
use crate::error::{ApiError, send_expecting};
use crate::http::Client;

/// Profile of the logged-in user as returned by `GET /profile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub is_account_verified: bool,
}

impl UserProfile {
    /// Uppercased first character of the name, shown in the avatar.
    pub fn initial(&self) -> Option<char> {
        self.name
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCompute {
    pub is_logged_in: bool,
    pub user: Option<UserProfile>,
}

impl SessionCompute {
    pub fn logged_in(user: Option<UserProfile>) -> Self {
        Self {
            is_logged_in: true,
            user,
        }
    }

    pub fn logged_out() -> Self {
        Self::default()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.name.as_str())
    }
}

impl SnapshotClone for SessionCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for SessionCompute {
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

impl Compute for SessionCompute {}

/// `GET /profile`.
pub async fn fetch_profile(
    client: &Client,
    config: &BusinessConfig,
) -> Result<UserProfile, ApiError> {
    let response = send_expecting(client.get(config.api_url(PROFILE).as_str()), 200).await?;
    Ok(response.json::<UserProfile>()?)
}

async fn probe_session(
    client: &Client,
    config: &BusinessConfig,
) -> Result<Option<UserProfile>, ApiError> {
    let request = client.get(config.api_url(IS_AUTHENTICATED).as_str());
    let response = send_expecting(request, 200).await?;
    if response.json::<bool>()? {
        fetch_profile(client, config).await.map(Some)
    } else {
        Ok(None)
    }
}

/// Reloads the profile after the session changed and publishes a logged-in session.
///
/// Runs in the app scope: the session outlives the page that changed it, so leaving
/// the page does not stop the reload. A failed reload keeps the user logged in
/// without a profile.
pub(crate) async fn refresh_session(
    client: &Client,
    config: &BusinessConfig,
    updater: &Updater,
) {
    let session = updater.app_scoped();
    let Some(result) = session
        .scope()
        .run_until_cancelled(fetch_profile(client, config))
        .await
    else {
        return;
    };
    match result {
        Ok(profile) => session.set(SessionCompute::logged_in(Some(profile))),
        Err(err) => {
            warn!("Profile refresh failed: {err}");
            session.set(SessionCompute::logged_in(None));
        }
    }
}

/// Restores the session on startup from the backend's cookie.
///
/// `GET /is-authenticated` answers a JSON boolean; on `true` the profile is loaded.
/// Any failure leaves the session logged out and is only logged.
#[derive(Default, Debug)]
pub struct SessionProbeCommand;

impl Command for SessionProbeCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let config = snap.state::<BusinessConfig>().clone();
        let client = snap.state::<Client>().clone();

        Box::pin(async move {
            info!("SessionProbeCommand: checking session");
            let Some(result) = cancel
                .run_until_cancelled(probe_session(&client, &config))
                .await
            else {
                return;
            };
            match result {
                Ok(Some(profile)) => {
                    info!("SessionProbeCommand: logged in as '{}'", profile.name);
                    updater.set(SessionCompute::logged_in(Some(profile)));
                }
                Ok(None) => {
                    info!("SessionProbeCommand: not logged in");
                    updater.set(SessionCompute::logged_out());
                }
                Err(err) => {
                    warn!("SessionProbeCommand: {err}");
                    updater.set(SessionCompute::logged_out());
                }
            }
        })
    }
}
