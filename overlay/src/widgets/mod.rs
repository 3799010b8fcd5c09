//! Overlay widget tree
//!
//! Plain data produced by [`project`](crate::project). Nothing here knows how
//! it's drawn; [`rasterize`](crate::rasterize) paints it, a web or native
//! host can map it onto its own elements.
//!
//! # Widgets
//!
//! - [`CounterBadge`] - Total fish eaten, shown while the detail panel is collapsed
//! - [`DetailPanel`] - Per-category rows with share and bar
//! - [`PowerUpBadge`] - Countdown for one running power-up
//! - [`ControlButton`] - Clickable activator for one power-up
//! - [`Decoration`] - Full-screen speed lines / shield
//! - [`Toast`] - Transient notification

pub mod colors;

use dragonfin_types::color::Rgba;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterBadge {
    pub title: String,
    pub total: u64,
    /// `total` with thousands separators
    pub total_text: String,
    pub hint: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub category: u32,
    pub name: String,
    pub color: Rgba,
    pub count: u64,
    /// `"占比: 75.0%"`
    pub share_text: String,
    /// Bar fill, 0.0..=1.0
    pub fraction: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub title: String,
    pub total_text: String,
    /// Only categories with at least one fish, in category order
    pub rows: Vec<PanelRow>,
    pub close_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerUpBadge {
    pub effect_id: String,
    pub icon: String,
    pub name: String,
    pub color: Rgba,
    /// `"4.2s"`
    pub countdown_text: String,
    /// Remaining fraction, 1.0 just activated
    pub progress: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlButton {
    pub effect_id: String,
    pub icon: String,
    pub name: String,
    pub color: Rgba,
    pub text_color: Rgba,
    pub hotkey: Option<String>,
    pub active: bool,
}

/// One streak of the speed effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedLine {
    /// Vertical position as a percentage of the screen height
    pub top_pct: f32,
    pub width_px: f32,
    /// Seconds for one pass across the screen
    pub duration_s: f32,
    pub delay_s: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decoration {
    SpeedLines { color: Rgba, lines: Vec<SpeedLine> },
    /// Pulsing ring around the player with evenly spaced sparks
    Shield { color: Rgba, sparks: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u32,
    pub message: String,
    pub background: Rgba,
    /// Black or white, whichever reads better on `background`
    pub text: Rgba,
}
