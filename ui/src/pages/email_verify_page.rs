//! Email verification page, reached from the menu's "Verify Email" entry.

use egui::{Response, RichText, Ui};
use secure_business::{EmailVerifyCompute, EmailVerifyInput, VerifyEmailCommand};

use crate::{state::State, widgets};

use super::centered_form;

pub fn email_verify_page(state: &mut State, ui: &mut Ui) -> Response {
    let loading = state
        .ctx
        .cached::<EmailVerifyCompute>()
        .is_some_and(|compute| compute.loading);
    let mut input = state.ctx.state::<EmailVerifyInput>().clone();
    let mut submit = false;

    let response = centered_form(ui, |ui| {
        ui.heading(RichText::new("Email Verify OTP").strong());
        ui.label("Enter the 6-digit code sent to your email id.");
        ui.add_space(16.0);
        widgets::otp_input(ui, "email_otp", &mut input.otp);
        ui.add_space(16.0);
        submit = widgets::primary_button(ui, "Verify email", "Verifying...", loading).clicked();
    });

    if *state.ctx.state::<EmailVerifyInput>() != input {
        state.ctx.update::<EmailVerifyInput>(|current| *current = input);
    }
    if submit {
        state.ctx.dispatch_page::<VerifyEmailCommand>();
    }

    response
}
