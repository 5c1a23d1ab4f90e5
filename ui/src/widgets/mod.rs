mod menubar;
mod otp_input;
mod toasts;

pub use menubar::menubar;
pub use otp_input::otp_input;
pub use toasts::toasts;

use egui::{Button, Response, RichText, Ui};

use crate::utils::colors::COLOR_ACCENT;

/// Full-width primary button; disabled and relabelled with `busy_label` while `busy`.
pub fn primary_button(ui: &mut Ui, label: &str, busy_label: &str, busy: bool) -> Response {
    let text = if busy { busy_label } else { label };
    let button = Button::new(RichText::new(text).color(egui::Color32::WHITE).strong())
        .fill(COLOR_ACCENT)
        .min_size(egui::vec2(ui.available_width(), 32.0));
    ui.add_enabled(!busy, button)
}
