//! Overlay palette

use tiny_skia::Color;

pub fn transparent() -> Color {
    Color::from_rgba8(0, 0, 0, 0)
}

pub fn white() -> Color {
    Color::from_rgba8(255, 255, 255, 255)
}

/// Counter badge / badge background
pub fn badge_bg() -> Color {
    Color::from_rgba8(0, 0, 0, 204)
}

/// Detail panel background
pub fn panel_bg() -> Color {
    Color::from_rgba8(0, 0, 0, 230)
}

/// Row background inside the detail panel
pub fn row_bg() -> Color {
    Color::from_rgba8(255, 255, 255, 26)
}

/// Empty part of a share / countdown bar
pub fn bar_bg() -> Color {
    Color::from_rgba8(255, 255, 255, 51)
}

/// Total count and close button
pub fn gold() -> Color {
    Color::from_rgba8(255, 215, 0, 255)
}

pub fn label_dim() -> Color {
    Color::from_rgba8(170, 170, 170, 255)
}

pub fn shadow() -> Color {
    Color::from_rgba8(0, 0, 0, 128)
}
