//! Shared color constants for the UI.

use egui::Color32;

/// Forest green for success toasts.
pub const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);

/// Red for error toasts.
pub const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Indigo accent used by primary buttons and the avatar.
pub const COLOR_ACCENT: Color32 = Color32::from_rgb(79, 70, 229);
