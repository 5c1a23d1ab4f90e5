//! Password reset wizard.
//!
//! Three forward-only stages:
//! 1. `CollectingEmail`: `SendResetOtpCommand` asks the backend to mail a code
//! 2. `CollectingOtp`: the user types the code; `VerifyResetOtpCommand` checks locally
//!    that all six digits are there and commits it
//! 3. `CollectingNewPassword`: `ResetPasswordCommand` sends email, code and password
//!
//! The code is only checked by the backend in the last step. A successful reset
//! navigates to `Route::Login`, which tears the wizard down.

use std::any::Any;

use log::{info, warn};
use secure_states::{
    Command, CommandFuture, CommandSnapshot, Compute, SnapshotClone, State, Updater, assign_impl,
    state_assign_impl,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::api::{GENERIC_RETRY_MESSAGE, RESET_PASSWORD, SEND_RESET_OTP};
use crate::error::{ApiError, send_expecting};
use crate::http::Client;
use crate::notification::Notifier;
use crate::otp::{OTP_LENGTH, OtpBuffer};
use crate::settle::SettleGuard;
use crate::{BusinessConfig, Route};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WizardStage {
    #[default]
    CollectingEmail,
    CollectingOtp,
    CollectingNewPassword,
}

/// Editable fields of the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetPasswordInput {
    pub email: String,
    pub otp: OtpBuffer,
    pub new_password: String,
}

impl SnapshotClone for ResetPasswordInput {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for ResetPasswordInput {
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

/// Where the wizard is, written only by its commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetPasswordCompute {
    pub stage: WizardStage,
    /// Code accepted by `VerifyResetOtpCommand`, sent with the new password.
    pub committed_otp: Option<String>,
    /// A request of the current stage is in flight.
    pub loading: bool,
}

impl ResetPasswordCompute {
    fn with_loading(&self, loading: bool) -> Self {
        Self {
            loading,
            ..self.clone()
        }
    }
}

impl SnapshotClone for ResetPasswordCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for ResetPasswordCompute {
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

impl Compute for ResetPasswordCompute {}

/// Body of `POST /reset-password`. Built at submission time only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub new_password: String,
    pub otp: String,
    pub email: String,
}

fn idle() -> CommandFuture {
    Box::pin(async {})
}

/// Whether a wizard command may run against `compute`.
fn accepts(name: &str, compute: &ResetPasswordCompute, stage: WizardStage) -> bool {
    if compute.loading {
        info!("{name}: a request is already in flight, ignoring");
        return false;
    }
    if compute.stage != stage {
        warn!("{name}: wizard is at {:?}, ignoring", compute.stage);
        return false;
    }
    true
}

/// Stage 1: `POST /send-reset-otp?email=<email>`.
///
/// Dispatch as a page command: `ctx.enqueue_page_command::<SendResetOtpCommand>()`.
#[derive(Default, Debug)]
pub struct SendResetOtpCommand;

impl Command for SendResetOtpCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let compute = snap.compute::<ResetPasswordCompute>().clone();
        if !accepts("SendResetOtpCommand", &compute, WizardStage::CollectingEmail) {
            return idle();
        }

        let notifier = snap.state::<Notifier>().clone();
        let email = snap.state::<ResetPasswordInput>().email.trim().to_owned();
        if email.is_empty() {
            notifier.error("Email is required");
            return idle();
        }

        let config = snap.state::<BusinessConfig>().clone();
        let client = snap.state::<Client>().clone();
        let mut guard = SettleGuard::begin(
            updater,
            compute.with_loading(true),
            compute.with_loading(false),
        );

        Box::pin(async move {
            info!("SendResetOtpCommand: requesting reset code");
            let request = client
                .post(config.api_url(SEND_RESET_OTP).as_str())
                .query("email", email);
            let Some(result) = cancel
                .run_until_cancelled(send_expecting(request, 200))
                .await
            else {
                return;
            };

            match result {
                Ok(_) => {
                    guard.settled_mut().stage = WizardStage::CollectingOtp;
                    notifier.success("Password reset OTP sent successfully!");
                }
                Err(err) => {
                    warn!("SendResetOtpCommand: {err}");
                    notifier.error(err.user_message(GENERIC_RETRY_MESSAGE));
                }
            }
        })
    }
}

/// Stage 2: local check that the code has all six digits. No request is made.
#[derive(Default, Debug)]
pub struct VerifyResetOtpCommand;

impl Command for VerifyResetOtpCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let compute = snap.compute::<ResetPasswordCompute>();
        if !accepts("VerifyResetOtpCommand", compute, WizardStage::CollectingOtp) {
            return idle();
        }

        let code = snap.state::<ResetPasswordInput>().otp.code();
        if code.len() != OTP_LENGTH {
            snap.state::<Notifier>()
                .error("Please enter all 6 digits of the OTP.");
            return idle();
        }

        info!("VerifyResetOtpCommand: code complete, asking for the new password");
        updater.set(ResetPasswordCompute {
            stage: WizardStage::CollectingNewPassword,
            committed_otp: Some(code),
            loading: false,
        });
        idle()
    }
}

/// Stage 3: `POST /reset-password`; navigates to login on success.
#[derive(Default, Debug)]
pub struct ResetPasswordCommand;

impl Command for ResetPasswordCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let compute = snap.compute::<ResetPasswordCompute>().clone();
        if !accepts(
            "ResetPasswordCommand",
            &compute,
            WizardStage::CollectingNewPassword,
        ) {
            return idle();
        }

        let notifier = snap.state::<Notifier>().clone();
        let input = snap.state::<ResetPasswordInput>();
        if input.new_password.is_empty() {
            notifier.error("New password is required");
            return idle();
        }

        let body = ResetPasswordRequest {
            new_password: input.new_password.clone(),
            otp: compute.committed_otp.clone().unwrap_or_default(),
            email: input.email.trim().to_owned(),
        };
        let config = snap.state::<BusinessConfig>().clone();
        let client = snap.state::<Client>().clone();
        let navigate = updater.clone();
        let guard = SettleGuard::begin(
            updater,
            compute.with_loading(true),
            compute.with_loading(false),
        );

        Box::pin(async move {
            let _guard = guard;
            info!("ResetPasswordCommand: submitting new password");
            let Some(result) = cancel
                .run_until_cancelled(submit_new_password(&client, &config, &body))
                .await
            else {
                return;
            };

            match result {
                Ok(()) => {
                    notifier.success("Password reset successfully.");
                    navigate.set(Route::Login);
                }
                Err(err) => {
                    warn!("ResetPasswordCommand: {err}");
                    notifier.error(err.user_message(GENERIC_RETRY_MESSAGE));
                }
            }
        })
    }
}

async fn submit_new_password(
    client: &Client,
    config: &BusinessConfig,
    body: &ResetPasswordRequest,
) -> Result<(), ApiError> {
    let request = client
        .post(config.api_url(RESET_PASSWORD).as_str())
        .json(body)?;
    send_expecting(request, 200).await.map(|_| ())
}
