//! Domain layer of the Secure client: configuration, the HTTP client, the session and
//! every page's states and commands.
//!
//! Pages edit input states with `StateCtx::update` and enqueue commands; commands talk
//! to the backend and publish results through their `Updater`, toasts through the
//! [`Notifier`] and navigation by setting [`Route`].

pub mod api;
mod auth_form;
mod config;
mod email_verify;
mod error;
pub mod http;
mod menu;
mod notification;
mod otp;
mod reset_password;
mod route;
mod session;
mod settle;
#[cfg(all(any(test, feature = "test-utils"), not(target_arch = "wasm32")))]
pub mod test_utils;

use secure_states::StateCtx;

pub use auth_form::{
    AuthFormCompute, AuthFormInput, LoginRequest, LoginResponse, RegisterRequest,
    SubmitAuthFormCommand, first_name,
};
pub use config::{BusinessConfig, ConfigError};
pub use email_verify::{
    EmailVerifyCompute, EmailVerifyInput, VerifyEmailCommand, VerifyEmailRequest,
};
pub use error::{ApiError, send_expecting};
pub use menu::{DropdownState, LogoutCommand, MenuCompute, MenuEntry, SendVerifyOtpCommand};
pub use notification::{Notifier, TOAST_TTL, Toast, ToastFeed, ToastKind, notification_channel};
pub use otp::{OTP_LENGTH, OtpBuffer};
pub use reset_password::{
    ResetPasswordCommand, ResetPasswordCompute, ResetPasswordInput, ResetPasswordRequest,
    SendResetOtpCommand, VerifyResetOtpCommand, WizardStage,
};
pub use route::{RenderedRoute, Route};
pub use session::{SessionCompute, SessionProbeCommand, UserProfile, fetch_profile};
pub use settle::SettleGuard;

/// Builds a context with every state, compute and command of the application.
///
/// Returns the toast feed paired with the registered [`Notifier`].
pub fn build_state_ctx(config: BusinessConfig) -> (StateCtx, ToastFeed) {
    let mut ctx = StateCtx::new();
    let (notifier, toasts) = notification_channel();

    ctx.add_state(config);
    ctx.add_state(http::Client::new());
    ctx.add_state(notifier);
    ctx.add_state(Route::default());
    ctx.add_state(RenderedRoute::default());

    // Session and menu
    ctx.record_compute(SessionCompute::default());
    ctx.record_compute(MenuCompute::default());
    ctx.add_state(DropdownState::default());

    // Page-local states
    ctx.add_state(AuthFormInput::default());
    ctx.record_compute(AuthFormCompute::default());
    ctx.add_state(ResetPasswordInput::default());
    ctx.record_compute(ResetPasswordCompute::default());
    ctx.add_state(EmailVerifyInput::default());
    ctx.record_compute(EmailVerifyCompute::default());

    // Commands
    ctx.record_command(SessionProbeCommand);
    ctx.record_command(LogoutCommand);
    ctx.record_command(SendVerifyOtpCommand);
    ctx.record_command(SubmitAuthFormCommand);
    ctx.record_command(SendResetOtpCommand);
    ctx.record_command(VerifyResetOtpCommand);
    ctx.record_command(ResetPasswordCommand);
    ctx.record_command(VerifyEmailCommand);

    (ctx, toasts)
}

/// Tears down the previous page when `Route` changed since the last call.
///
/// The page scope is ended, so in-flight page commands are cancelled and their late
/// updates dropped, and every page-local state goes back to its default. Returns
/// whether a new page was set up.
pub fn sync_page_lifecycle(ctx: &mut StateCtx) -> bool {
    let route = *ctx.state::<Route>();
    let rendered = ctx.state::<RenderedRoute>().0;
    if rendered == Some(route) {
        return false;
    }

    if let Some(previous) = rendered {
        log::info!("Leaving {} for {}", previous.path(), route.path());
        ctx.end_page_scope();
    }

    ctx.reset::<AuthFormInput>();
    ctx.reset::<AuthFormCompute>();
    ctx.reset::<ResetPasswordInput>();
    ctx.reset::<ResetPasswordCompute>();
    ctx.reset::<EmailVerifyInput>();
    ctx.reset::<EmailVerifyCompute>();
    ctx.reset::<DropdownState>();
    ctx.update::<RenderedRoute>(|rendered| rendered.0 = Some(route));
    true
}
