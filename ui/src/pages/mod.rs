//! Pages module for the application.
//!
//! One page per `Route`:
//! - `home_page`: greeting under the menu bar
//! - `login_page`: combined login and registration form
//! - `reset_password_page`: three-stage password reset wizard
//! - `email_verify_page`: verification code entry

mod email_verify_page;
mod home_page;
mod login_page;
mod reset_password_page;

pub use email_verify_page::email_verify_page;
pub use home_page::home_page;
pub use login_page::login_page;
pub use reset_password_page::reset_password_page;

use egui::{Align, Layout, Response, Ui};

/// Width of the centered card holding a form.
const FORM_WIDTH: f32 = 320.0;

/// Lays a form out in a centered, fixed-width column.
fn centered_form(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui)) -> Response {
    ui.with_layout(Layout::top_down(Align::Center), |ui| {
        ui.add_space(40.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(FORM_WIDTH);
            ui.with_layout(Layout::top_down(Align::Center), add_contents);
        });
    })
    .response
}
