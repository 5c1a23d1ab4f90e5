//! Six single-character boxes editing an `OtpBuffer`.
//!
//! Typing a digit moves to the next box, backspace in an empty box moves back, and a
//! paste into any box spreads its digits from the first box.

use egui::{Event, Id, Key, Response, TextEdit, Ui, vec2};
use secure_business::{OTP_LENGTH, OtpBuffer};

pub fn otp_input(ui: &mut Ui, id_salt: &str, otp: &mut OtpBuffer) -> Response {
    let focus = otp.take_focus_request();
    let mut touched = false;

    let response = ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing = vec2(8.0, 0.0);
        for index in 0..OTP_LENGTH {
            let was_empty = otp.slot(index).is_none();
            let mut text = otp.slot(index).map(String::from).unwrap_or_default();
            let response = ui.add(
                TextEdit::singleline(&mut text)
                    .id(Id::new((id_salt, "otp_slot", index)))
                    .desired_width(28.0)
                    .horizontal_align(egui::Align::Center)
                    .font(egui::TextStyle::Heading),
            );

            if response.has_focus() {
                let pasted = ui.input(|input| {
                    input.events.iter().find_map(|event| match event {
                        Event::Paste(text) => Some(text.clone()),
                        _ => None,
                    })
                });
                if let Some(pasted) = pasted {
                    otp.paste(&pasted);
                    touched = true;
                    continue;
                }
                if was_empty && ui.input(|input| input.key_pressed(Key::Backspace)) {
                    otp.backspace(index);
                    touched = true;
                }
            }

            if response.changed() {
                otp.input(index, &text);
                touched = true;
            }
            if focus == Some(index) {
                response.request_focus();
            }
        }
    })
    .response;

    // Focus moves are applied on the next frame.
    if touched {
        ui.ctx().request_repaint();
    }
    response
}
