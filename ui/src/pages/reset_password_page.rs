//! Password reset page: renders the wizard stage by stage.

use egui::{Response, RichText, TextEdit, Ui};
use secure_business::{
    ResetPasswordCommand, ResetPasswordCompute, ResetPasswordInput, SendResetOtpCommand,
    VerifyResetOtpCommand, WizardStage,
};

use crate::{state::State, widgets};

use super::centered_form;

pub fn reset_password_page(state: &mut State, ui: &mut Ui) -> Response {
    let compute = state
        .ctx
        .cached::<ResetPasswordCompute>()
        .cloned()
        .unwrap_or_default();
    let mut input = state.ctx.state::<ResetPasswordInput>().clone();
    let mut submit = false;

    let response = centered_form(ui, |ui| match compute.stage {
        WizardStage::CollectingEmail => {
            ui.heading(RichText::new("Reset Password").strong());
            ui.label("Enter your registered email address");
            ui.add_space(16.0);
            ui.add(TextEdit::singleline(&mut input.email).hint_text("Email id"));
            ui.add_space(16.0);
            submit = widgets::primary_button(ui, "Submit", "Loading...", compute.loading)
                .clicked();
        }
        WizardStage::CollectingOtp => {
            ui.heading(RichText::new("Reset password OTP").strong());
            ui.label("Enter the 6-digit code sent to your email id.");
            ui.add_space(16.0);
            widgets::otp_input(ui, "reset_otp", &mut input.otp);
            ui.add_space(16.0);
            submit = widgets::primary_button(ui, "Submit", "Verifying...", compute.loading)
                .clicked();
        }
        WizardStage::CollectingNewPassword => {
            ui.heading(RichText::new("New password").strong());
            ui.label("Enter the new password below");
            ui.add_space(16.0);
            ui.add(
                TextEdit::singleline(&mut input.new_password)
                    .password(true)
                    .hint_text("Password"),
            );
            ui.add_space(16.0);
            submit = widgets::primary_button(ui, "Submit", "Loading...", compute.loading)
                .clicked();
        }
    });

    if *state.ctx.state::<ResetPasswordInput>() != input {
        state.ctx.update::<ResetPasswordInput>(|current| *current = input);
    }
    if submit {
        match compute.stage {
            WizardStage::CollectingEmail => state.ctx.dispatch_page::<SendResetOtpCommand>(),
            WizardStage::CollectingOtp => state.ctx.dispatch_page::<VerifyResetOtpCommand>(),
            WizardStage::CollectingNewPassword => {
                state.ctx.dispatch_page::<ResetPasswordCommand>();
            }
        }
    }

    response
}
