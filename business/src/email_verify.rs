//! Email verification page: the user enters the code mailed by `POST /send-otp`.

use std::any::Any;

use log::{info, warn};
use secure_states::{
    Command, CommandFuture, CommandSnapshot, Compute, SnapshotClone, State, Updater, assign_impl,
    state_assign_impl,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::api::{GENERIC_RETRY_MESSAGE, VERIFY_OTP};
use crate::error::{ApiError, send_expecting};
use crate::http::Client;
use crate::notification::Notifier;
use crate::otp::{OTP_LENGTH, OtpBuffer};
use crate::session::refresh_session;
use crate::settle::SettleGuard;
use crate::{BusinessConfig, Route};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailVerifyInput {
    pub otp: OtpBuffer,
}

impl SnapshotClone for EmailVerifyInput {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for EmailVerifyInput {
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
pub struct EmailVerifyCompute {
    pub loading: bool,
}

impl SnapshotClone for EmailVerifyCompute {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(*self))
    }
}

impl State for EmailVerifyCompute {
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

impl Compute for EmailVerifyCompute {}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyEmailRequest {
    pub otp: String,
}

/// `POST /verify-otp {otp}`; on success reloads the profile and goes home.
///
/// Dispatch as a page command: `ctx.enqueue_page_command::<VerifyEmailCommand>()`.
#[derive(Default, Debug)]
pub struct VerifyEmailCommand;

impl Command for VerifyEmailCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        if snap.compute::<EmailVerifyCompute>().loading {
            info!("VerifyEmailCommand: already verifying, ignoring");
            return Box::pin(async {});
        }

        let notifier = snap.state::<Notifier>().clone();
        let otp = snap.state::<EmailVerifyInput>().otp.code();
        if otp.len() != OTP_LENGTH {
            notifier.error("Please enter all 6 digits of the OTP.");
            return Box::pin(async {});
        }

        let config = snap.state::<BusinessConfig>().clone();
        let client = snap.state::<Client>().clone();
        let guard = SettleGuard::begin(
            updater.clone(),
            EmailVerifyCompute { loading: true },
            EmailVerifyCompute { loading: false },
        );

        Box::pin(async move {
            let _guard = guard;
            info!("VerifyEmailCommand: verifying email");
            let body = VerifyEmailRequest { otp };
            let Some(result) = cancel
                .run_until_cancelled(verify(&client, &config, &body))
                .await
            else {
                return;
            };

            if let Err(err) = result {
                warn!("VerifyEmailCommand: {err}");
                notifier.error(err.user_message(GENERIC_RETRY_MESSAGE));
                return;
            }

            notifier.success("Email verified successfully!");
            updater.set(Route::Home);
            refresh_session(&client, &config, &updater).await;
        })
    }
}

async fn verify(
    client: &Client,
    config: &BusinessConfig,
    body: &VerifyEmailRequest,
) -> Result<(), ApiError> {
    let request = client
        .post(config.api_url(VERIFY_OTP).as_str())
        .json(body)?;
    send_expecting(request, 200).await.map(|_| ())
}
