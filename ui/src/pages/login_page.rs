//! Login page: one form that switches between signing in and creating an account.

use egui::{Response, RichText, TextEdit, Ui};
use secure_business::{AuthFormCompute, AuthFormInput, Route, SubmitAuthFormCommand};

use crate::{state::State, widgets};

use super::centered_form;

pub fn login_page(state: &mut State, ui: &mut Ui) -> Response {
    let loading = state
        .ctx
        .cached::<AuthFormCompute>()
        .is_some_and(|compute| compute.loading);
    let mut input = state.ctx.state::<AuthFormInput>().clone();
    let mut submit = false;
    let mut forgot_password = false;

    let response = centered_form(ui, |ui| {
        let (title, subtitle) = if input.is_create_account {
            ("Create Account", "Create your account")
        } else {
            ("Login", "Login to your account!")
        };
        ui.heading(RichText::new(title).strong());
        ui.label(subtitle);
        ui.add_space(16.0);

        if input.is_create_account {
            ui.add(TextEdit::singleline(&mut input.name).hint_text("Full Name"));
            ui.add_space(8.0);
        }
        ui.add(TextEdit::singleline(&mut input.email).hint_text("Email id"));
        ui.add_space(8.0);
        let password = ui.add(
            TextEdit::singleline(&mut input.password)
                .password(true)
                .hint_text("Password"),
        );
        if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submit = true;
        }
        ui.add_space(8.0);

        if !input.is_create_account && ui.link("Forgot Password?").clicked() {
            forgot_password = true;
        }
        ui.add_space(8.0);

        let label = if input.is_create_account { "Sign Up" } else { "Login" };
        if widgets::primary_button(ui, label, "Loading...", loading).clicked() {
            submit = true;
        }
        ui.add_space(8.0);

        let switch = if input.is_create_account {
            "Already have an account? Login here"
        } else {
            "Don't have an account? Sign up"
        };
        if ui.link(switch).clicked() {
            input.toggle_mode();
        }
    });

    if *state.ctx.state::<AuthFormInput>() != input {
        state.ctx.update::<AuthFormInput>(|current| *current = input);
    }
    if forgot_password {
        state
            .ctx
            .update::<Route>(|route| *route = Route::ResetPassword);
    } else if submit {
        state.ctx.dispatch_page::<SubmitAuthFormCommand>();
    }

    response
}
