//! Navigation menu: what the menu bar shows and the actions behind it.
//!
//! `MenuCompute` is derived from `SessionCompute`. Logout and "Verify Email" are app
//! commands, so leaving the page does not abandon them.

use std::any::{Any, TypeId};

use log::{info, warn};
use secure_states::{
    Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, SnapshotClone, State,
    Updater, assign_impl, state_assign_impl,
};
use tokio_util::sync::CancellationToken;

use crate::api::{GENERIC_MESSAGE, LOGOUT, SEND_OTP};
use crate::error::send_expecting;
use crate::http::Client;
use crate::notification::Notifier;
use crate::session::SessionCompute;
use crate::{BusinessConfig, Route};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuEntry {
    /// No profile loaded: a button leading to the login page.
    #[default]
    LoginButton,
    /// Avatar with the user's initial and a dropdown.
    Profile {
        initial: char,
        /// The dropdown offers "Verify Email".
        show_verify_email: bool,
    },
}

impl MenuEntry {
    pub fn from_session(session: &SessionCompute) -> Self {
        match &session.user {
            Some(user) => Self::Profile {
                initial: user.initial().unwrap_or('?'),
                show_verify_email: !user.is_account_verified,
            },
            None => Self::LoginButton,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuCompute {
    pub entry: MenuEntry,
}

impl SnapshotClone for MenuCompute {}

impl State for MenuCompute {
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

impl Compute for MenuCompute {
    fn deps(&self) -> ComputeDeps {
        const STATE_IDS: [TypeId; 0] = [];
        const COMPUTE_IDS: [TypeId; 1] = [TypeId::of::<SessionCompute>()];
        (&STATE_IDS, &COMPUTE_IDS)
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let session = deps.get_compute_ref::<SessionCompute>();
        let entry = MenuEntry::from_session(session);
        if entry != self.entry {
            updater.set(Self { entry });
        }
    }
}

/// Whether the avatar dropdown is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropdownState {
    pub open: bool,
}

impl DropdownState {
    pub fn on_trigger_hover(&mut self) {
        self.open = true;
    }

    pub fn on_trigger_click(&mut self) {
        self.open = false;
    }

    /// A pointer press anywhere; `inside` is true over the avatar or the dropdown.
    pub fn on_pointer_down(&mut self, inside: bool) {
        if !inside {
            self.open = false;
        }
    }
}

impl SnapshotClone for DropdownState {}

impl State for DropdownState {
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

/// `POST /logout`; clears the session and goes home on success.
#[derive(Default, Debug)]
pub struct LogoutCommand;

impl Command for LogoutCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let config = snap.state::<BusinessConfig>().clone();
        let client = snap.state::<Client>().clone();
        let notifier = snap.state::<Notifier>().clone();

        Box::pin(async move {
            info!("LogoutCommand: logging out");
            let request = client.post(config.api_url(LOGOUT).as_str());
            let Some(result) = cancel
                .run_until_cancelled(send_expecting(request, 200))
                .await
            else {
                return;
            };

            match result {
                Ok(_) => {
                    info!("LogoutCommand: logged out");
                    updater.set(SessionCompute::logged_out());
                    updater.set(Route::Home);
                }
                Err(err) => {
                    warn!("LogoutCommand: {err}");
                    notifier.error(err.server_message_or(GENERIC_MESSAGE));
                }
            }
        })
    }
}

/// `POST /send-otp`; mails a verification code and opens the verification page.
#[derive(Default, Debug)]
pub struct SendVerifyOtpCommand;

impl Command for SendVerifyOtpCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let config = snap.state::<BusinessConfig>().clone();
        let client = snap.state::<Client>().clone();
        let notifier = snap.state::<Notifier>().clone();

        Box::pin(async move {
            info!("SendVerifyOtpCommand: requesting verification code");
            let request = client.post(config.api_url(SEND_OTP).as_str());
            let Some(result) = cancel
                .run_until_cancelled(send_expecting(request, 200))
                .await
            else {
                return;
            };

            match result {
                Ok(_) => {
                    updater.set(Route::EmailVerify);
                    notifier.success("OTP has been sent successfully.");
                }
                Err(err) => {
                    warn!("SendVerifyOtpCommand: {err}");
                    notifier.error(err.user_message("Unable to send OTP!"));
                }
            }
        })
    }
}
