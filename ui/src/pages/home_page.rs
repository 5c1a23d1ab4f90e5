//! Home page: greets the logged-in user by name.

use egui::{Align, Layout, Response, RichText, Ui};
use secure_business::SessionCompute;

use crate::state::State;

pub fn home_page(state: &mut State, ui: &mut Ui) -> Response {
    let name = state
        .ctx
        .cached::<SessionCompute>()
        .and_then(SessionCompute::user_name)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or("Developer")
        .to_owned();

    ui.with_layout(Layout::top_down(Align::Center), |ui| {
        ui.add_space(80.0);
        ui.label(RichText::new(format!("Hey {name}!")).size(28.0).strong());
        ui.add_space(8.0);
        ui.heading("Welcome to our app");
        ui.add_space(8.0);
        ui.label(
            "Let's start with a quick product tour and we will have you up and running in no time!",
        );
    })
    .response
}
