//! Toast stack in the top-right corner.

use chrono::Utc;
use egui::{Align2, Area, Frame, Id, Order, RichText, vec2};
use secure_business::{TOAST_TTL, ToastFeed, ToastKind};

use crate::utils::colors::{COLOR_GREEN, COLOR_RED};

pub fn toasts(feed: &mut ToastFeed, ctx: &egui::Context) {
    let now = Utc::now();
    let visible = feed.poll_at(now);
    if visible.is_empty() {
        return;
    }

    // Repaint when the oldest toast expires.
    let next_expiry = visible
        .iter()
        .map(|toast| toast.created_at + TOAST_TTL - now)
        .min()
        .and_then(|delta| delta.to_std().ok())
        .unwrap_or_default();
    ctx.request_repaint_after(next_expiry);

    let mut dismissed = None;
    Area::new(Id::new("toasts"))
        .order(Order::Tooltip)
        .anchor(Align2::RIGHT_TOP, vec2(-12.0, 48.0))
        .show(ctx, |ui| {
            for (index, toast) in visible.iter().enumerate() {
                let color = match toast.kind {
                    ToastKind::Success => COLOR_GREEN,
                    ToastKind::Error => COLOR_RED,
                };
                Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&toast.message).color(color));
                        if ui.small_button("x").clicked() {
                            dismissed = Some(index);
                        }
                    });
                });
                ui.add_space(4.0);
            }
        });

    if let Some(index) = dismissed {
        feed.dismiss(index);
    }
}
