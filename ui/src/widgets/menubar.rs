//! Top navigation bar: app title, then either a login button or the avatar dropdown.
//!
//! The login button is hidden on the login page itself.

use egui::{Align, Area, Button, Frame, Id, Layout, Order, Rect, RichText, Ui, vec2};
use secure_business::{
    DropdownState, LogoutCommand, MenuCompute, MenuEntry, Route, SendVerifyOtpCommand,
};
use secure_states::StateCtx;

use crate::utils::colors::COLOR_ACCENT;

enum MenuAction {
    Navigate(Route),
    VerifyEmail,
    Logout,
}

pub fn menubar(state_ctx: &mut StateCtx, ui: &mut Ui) {
    let entry = state_ctx
        .cached::<MenuCompute>()
        .map(|menu| menu.entry)
        .unwrap_or_default();
    let on_login_page = *state_ctx.state::<Route>() == Route::Login;
    let mut action = None;

    ui.horizontal(|ui| {
        if ui.link(RichText::new("Secure").heading()).clicked() {
            action = Some(MenuAction::Navigate(Route::Home));
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| match entry {
            MenuEntry::LoginButton => {
                if !on_login_page && ui.button("Login").clicked() {
                    action = Some(MenuAction::Navigate(Route::Login));
                }
            }
            MenuEntry::Profile {
                initial,
                show_verify_email,
            } => {
                action = profile_menu(state_ctx, ui, initial, show_verify_email);
            }
        });
    });

    match action {
        Some(MenuAction::Navigate(route)) => state_ctx.update::<Route>(|current| *current = route),
        Some(MenuAction::VerifyEmail) => {
            state_ctx.update::<DropdownState>(|dropdown| dropdown.open = false);
            state_ctx.dispatch::<SendVerifyOtpCommand>();
        }
        Some(MenuAction::Logout) => {
            state_ctx.update::<DropdownState>(|dropdown| dropdown.open = false);
            state_ctx.dispatch::<LogoutCommand>();
        }
        None => {}
    }
}

fn profile_menu(
    state_ctx: &mut StateCtx,
    ui: &mut Ui,
    initial: char,
    show_verify_email: bool,
) -> Option<MenuAction> {
    let avatar = ui.add(
        Button::new(RichText::new(initial.to_string()).color(egui::Color32::WHITE).strong())
            .fill(COLOR_ACCENT)
            .corner_radius(16.0)
            .min_size(vec2(32.0, 32.0)),
    );

    // Open on the frame the pointer enters the avatar, not on every hovered frame, so a
    // click can close it while the pointer is still there.
    let hover_id = avatar.id.with("hovered");
    let was_hovered = ui.data(|data| data.get_temp::<bool>(hover_id).unwrap_or(false));
    let hovered = avatar.hovered();
    ui.data_mut(|data| data.insert_temp(hover_id, hovered));

    let mut dropdown = *state_ctx.state::<DropdownState>();
    if hovered && !was_hovered {
        dropdown.on_trigger_hover();
    }
    if avatar.clicked() {
        dropdown.on_trigger_click();
    }

    let mut action = None;
    let mut dropdown_rect = Rect::NOTHING;
    if dropdown.open {
        let area = Area::new(Id::new("profile_dropdown"))
            .order(Order::Foreground)
            .fixed_pos(avatar.rect.left_bottom() + vec2(-80.0, 4.0))
            .show(ui.ctx(), |ui| {
                Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(100.0);
                    if show_verify_email && ui.button("Verify Email").clicked() {
                        action = Some(MenuAction::VerifyEmail);
                    }
                    if ui.button("Logout").clicked() {
                        action = Some(MenuAction::Logout);
                    }
                });
            });
        dropdown_rect = area.response.rect;
    }

    let pressed_at = ui.input(|input| {
        input
            .pointer
            .any_pressed()
            .then(|| input.pointer.interact_pos())
            .flatten()
    });
    if let Some(pos) = pressed_at {
        dropdown.on_pointer_down(avatar.rect.contains(pos) || dropdown_rect.contains(pos));
    }

    if dropdown != *state_ctx.state::<DropdownState>() {
        state_ctx.update::<DropdownState>(|current| *current = dropdown);
    }
    action
}
