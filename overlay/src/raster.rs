//! Software rasterizer for the overlay widget tree
//!
//! Paints the shapes of an [`OverlayView`] (badges, share bars, buttons,
//! toasts, speed lines and the shield) into a `tiny_skia::Pixmap`. Glyphs
//! are not rasterized: hosts draw text on top with their own font stack.

use thiserror::Error;
use tiny_skia::Pixmap;

use crate::frame::OverlayFrame;
use crate::utils::{color_from_rgba, fade};
use crate::view::OverlayView;
use crate::widgets::{
    ControlButton, CounterBadge, Decoration, DetailPanel, PowerUpBadge, SpeedLine, Toast, colors,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// Base dimensions for scaling calculations
pub const BASE_WIDTH: f32 = 800.0;
pub const BASE_HEIGHT: f32 = 600.0;

/// Base layout values (at BASE_WIDTH x BASE_HEIGHT)
const MARGIN: f32 = 10.0;
const CORNER: f32 = 8.0;
const COUNTER_WIDTH: f32 = 140.0;
const COUNTER_HEIGHT: f32 = 70.0;
const PANEL_WIDTH: f32 = 250.0;
const PANEL_HEADER: f32 = 50.0;
const ROW_HEIGHT: f32 = 56.0;
const ROW_SPACING: f32 = 8.0;
const CLOSE_HEIGHT: f32 = 36.0;
const BAR_HEIGHT: f32 = 4.0;
const BADGE_WIDTH: f32 = 160.0;
const BADGE_HEIGHT: f32 = 50.0;
const BUTTON_WIDTH: f32 = 120.0;
const BUTTON_HEIGHT: f32 = 44.0;
const TOAST_TOP: f32 = 220.0;
const TOAST_WIDTH: f32 = 200.0;
const TOAST_HEIGHT: f32 = 44.0;
const SHIELD_RADIUS: f32 = 100.0;
const SPARK_RADIUS: f32 = 2.0;
const STREAK_HEIGHT: f32 = 2.0;
/// Longest speed line start delay; later starts sit further from the edge
const MAX_STREAK_DELAY: f32 = 0.2;

pub fn rasterize(view: &OverlayView, width: u32, height: u32) -> Result<Pixmap, RasterError> {
    let mut frame = OverlayFrame::new(width, height, BASE_WIDTH, BASE_HEIGHT)
        .ok_or(RasterError::InvalidSize { width, height })?;

    // Decorations sit behind every widget
    for decoration in &view.decorations {
        match decoration {
            Decoration::SpeedLines { color, lines } => draw_speed_lines(&mut frame, *color, lines),
            Decoration::Shield { color, sparks } => draw_shield(&mut frame, *color, *sparks),
        }
    }

    if let Some(counter) = &view.counter {
        draw_counter(&mut frame, counter);
    }
    if let Some(panel) = &view.panel {
        draw_panel(&mut frame, panel);
    }
    for (i, badge) in view.badges.iter().enumerate() {
        draw_badge(&mut frame, i, badge);
    }
    for (i, button) in view.buttons.iter().enumerate() {
        draw_button(&mut frame, i, button);
    }
    for (i, toast) in view.toasts.iter().enumerate() {
        draw_toast(&mut frame, i, toast);
    }

    tracing::trace!(width, height, widgets = view.badges.len() + view.buttons.len() + view.toasts.len(), "Overlay rasterized");
    Ok(frame.into_pixmap())
}

fn draw_counter(frame: &mut OverlayFrame, _counter: &CounterBadge) {
    let w = frame.scaled(COUNTER_WIDTH);
    let x = frame.width() - frame.scaled(MARGIN) - w;
    let y = frame.scaled(MARGIN);
    let h = frame.scaled(COUNTER_HEIGHT);
    let radius = frame.scaled(CORNER);

    frame.fill_rounded_rect(x, y, w, h, radius, colors::badge_bg());
    // Gold rule under the title, where the total sits
    frame.fill_rect(
        x + radius,
        y + h * 0.35,
        w - radius * 2.0,
        frame.scaled(1.0),
        colors::gold(),
    );
    // Hint line
    frame.fill_rect(
        x + radius,
        y + h * 0.8,
        w - radius * 2.0,
        frame.scaled(1.0),
        colors::label_dim(),
    );
}

fn draw_panel(frame: &mut OverlayFrame, panel: &DetailPanel) {
    let margin = frame.scaled(MARGIN);
    let w = frame.scaled(PANEL_WIDTH);
    let x = frame.width() - margin - w;
    let y = margin;
    let header = frame.scaled(PANEL_HEADER);
    let row_h = frame.scaled(ROW_HEIGHT);
    let spacing = frame.scaled(ROW_SPACING);
    let close_h = frame.scaled(CLOSE_HEIGHT);
    let bar_h = frame.scaled(BAR_HEIGHT);
    let radius = frame.scaled(CORNER);

    let rows = panel.rows.len() as f32;
    let h = header + rows * (row_h + spacing) + close_h + margin * 2.0;
    frame.fill_rounded_rect(x, y, w, h, radius, colors::panel_bg());

    let inner_x = x + margin;
    let inner_w = w - margin * 2.0;
    let mut row_y = y + header;
    for row in &panel.rows {
        let color = color_from_rgba(row.color);
        frame.fill_rounded_rect(inner_x, row_y, inner_w, row_h, radius * 0.6, colors::row_bg());
        frame.fill_rect(inner_x, row_y, frame.scaled(3.0), row_h, color);

        let bar_x = inner_x + margin;
        let bar_w = inner_w - margin * 2.0;
        let bar_y = row_y + row_h - margin - bar_h;
        frame.fill_rounded_rect(bar_x, bar_y, bar_w, bar_h, bar_h / 2.0, colors::bar_bg());
        frame.fill_rounded_rect(
            bar_x,
            bar_y,
            bar_w * row.fraction.clamp(0.0, 1.0),
            bar_h,
            bar_h / 2.0,
            color,
        );
        row_y += row_h + spacing;
    }

    frame.fill_rounded_rect(
        inner_x,
        row_y + margin,
        inner_w,
        close_h,
        radius * 0.6,
        colors::gold(),
    );
}

fn draw_badge(frame: &mut OverlayFrame, index: usize, badge: &PowerUpBadge) {
    let margin = frame.scaled(MARGIN);
    let w = frame.scaled(BADGE_WIDTH);
    let h = frame.scaled(BADGE_HEIGHT);
    let x = margin;
    let y = margin + index as f32 * (h + frame.scaled(ROW_SPACING));
    let radius = frame.scaled(CORNER);
    let bar_h = frame.scaled(BAR_HEIGHT);
    let color = color_from_rgba(badge.color);

    frame.fill_rounded_rect(x, y, w, h, radius, colors::badge_bg());
    frame.stroke_rounded_rect(x, y, w, h, radius, frame.scaled(2.0), color);

    let bar_x = x + radius;
    let bar_w = w - radius * 2.0;
    let bar_y = y + h - radius - bar_h;
    frame.fill_rect(bar_x, bar_y, bar_w, bar_h, colors::bar_bg());
    frame.fill_rect(bar_x, bar_y, bar_w * badge.progress.clamp(0.0, 1.0), bar_h, color);
}

fn draw_button(frame: &mut OverlayFrame, index: usize, button: &ControlButton) {
    let margin = frame.scaled(MARGIN);
    let w = frame.scaled(BUTTON_WIDTH);
    let h = frame.scaled(BUTTON_HEIGHT);
    let x = margin + index as f32 * (w + margin);
    let y = frame.height() - margin - h;
    let radius = frame.scaled(CORNER);

    // Running power-ups dim their button
    let fill = if button.active {
        fade(button.color, 0.5)
    } else {
        color_from_rgba(button.color)
    };
    frame.fill_rounded_rect(x, y + frame.scaled(2.0), w, h, radius, colors::shadow());
    frame.fill_rounded_rect(x, y, w, h, radius, fill);
    if button.active {
        frame.stroke_rounded_rect(x, y, w, h, radius, frame.scaled(2.0), colors::white());
    }
}

fn draw_toast(frame: &mut OverlayFrame, index: usize, toast: &Toast) {
    let margin = frame.scaled(MARGIN);
    let w = frame.scaled(TOAST_WIDTH);
    let h = frame.scaled(TOAST_HEIGHT);
    let x = frame.width() - margin - w;
    let y = frame.scaled(TOAST_TOP) + index as f32 * (h + frame.scaled(ROW_SPACING));
    let radius = frame.scaled(CORNER);

    frame.fill_rounded_rect(x, y + frame.scaled(4.0), w, h, radius, colors::shadow());
    frame.fill_rounded_rect(x, y, w, h, radius, color_from_rgba(toast.background));
    // Text baseline marker in the contrast color
    frame.fill_rect(
        x + radius,
        y + h * 0.5,
        frame.scaled(4.0),
        frame.scaled(1.0),
        color_from_rgba(toast.text),
    );
}

fn draw_speed_lines(frame: &mut OverlayFrame, color: [u8; 4], lines: &[SpeedLine]) {
    let streak_color = fade(color, 0.8);
    let height = frame.height();
    let width = frame.width();
    let streak_h = frame.scaled(STREAK_HEIGHT);

    for line in lines {
        let w = frame.scaled(line.width_px);
        let lag = (line.delay_s / MAX_STREAK_DELAY).clamp(0.0, 1.0) * width * 0.5;
        let x = width - w - lag;
        let y = line.top_pct / 100.0 * height;
        frame.fill_streak(x, y, w, streak_h, streak_color);
    }
}

fn draw_shield(frame: &mut OverlayFrame, color: [u8; 4], sparks: usize) {
    let cx = frame.width() / 2.0;
    let cy = frame.height() / 2.0;
    let radius = frame.scaled(SHIELD_RADIUS);

    frame.fill_circle(cx, cy, radius, fade(color, 0.1));
    frame.stroke_circle(cx, cy, radius, frame.scaled(3.0), fade(color, 0.8));
    frame.stroke_circle(cx, cy, radius - frame.scaled(10.0), frame.scaled(2.0), fade(color, 0.5));

    if sparks == 0 {
        return;
    }
    let spark_r = frame.scaled(SPARK_RADIUS);
    let step = std::f32::consts::TAU / sparks as f32;
    for i in 0..sparks {
        // First spark at the top, then clockwise
        let angle = step * i as f32;
        let sx = cx + radius * angle.sin();
        let sy = cy - radius * angle.cos();
        frame.fill_circle(sx, sy, spark_r, color_from_rgba(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap.pixel(x, y).map(|p| p.alpha()).unwrap_or(0)
    }

    fn button(active: bool) -> ControlButton {
        ControlButton {
            effect_id: "speed".to_string(),
            icon: "⚡".to_string(),
            name: "加速".to_string(),
            color: [255, 215, 0, 255],
            text_color: [0, 0, 0, 255],
            hotkey: Some("1".to_string()),
            active,
        }
    }

    #[test]
    fn test_empty_view_is_transparent() {
        let pixmap = rasterize(&OverlayView::default(), 800, 600).unwrap();
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert_eq!(
            rasterize(&OverlayView::default(), 0, 600).unwrap_err(),
            RasterError::InvalidSize {
                width: 0,
                height: 600
            }
        );
    }

    #[test]
    fn test_counter_badge_top_right() {
        let view = OverlayView {
            counter: Some(CounterBadge {
                title: "🐟".to_string(),
                total: 3,
                total_text: "3".to_string(),
                hint: String::new(),
            }),
            ..Default::default()
        };
        let pixmap = rasterize(&view, 800, 600).unwrap();
        assert!(alpha_at(&pixmap, 720, 60) > 0);
        assert_eq!(alpha_at(&pixmap, 100, 60), 0);
    }

    #[test]
    fn test_active_button_is_dimmed() {
        let idle = OverlayView {
            buttons: vec![button(false)],
            ..Default::default()
        };
        let active = OverlayView {
            buttons: vec![button(true)],
            ..Default::default()
        };
        // Center of the first button
        let (x, y) = (70, 568);
        let idle_alpha = alpha_at(&rasterize(&idle, 800, 600).unwrap(), x, y);
        let active_alpha = alpha_at(&rasterize(&active, 800, 600).unwrap(), x, y);
        assert_eq!(idle_alpha, 255);
        assert!(active_alpha < idle_alpha);
    }

    #[test]
    fn test_shield_ring_and_sparks() {
        let view = OverlayView {
            decorations: vec![Decoration::Shield {
                color: [0, 255, 255, 255],
                sparks: 6,
            }],
            ..Default::default()
        };
        let pixmap = rasterize(&view, 800, 600).unwrap();
        // Top spark / ring
        assert!(alpha_at(&pixmap, 400, 200) > 200);
        // Inside the bubble is only faintly tinted
        let inside = alpha_at(&pixmap, 400, 300);
        assert!(inside > 0 && inside < 64);
        // Outside the bubble stays clear
        assert_eq!(alpha_at(&pixmap, 100, 300), 0);
    }

    #[test]
    fn test_scaling_follows_surface() {
        let view = OverlayView {
            buttons: vec![button(false)],
            ..Default::default()
        };
        // Half size: button center moves to (35, 284)
        let pixmap = rasterize(&view, 400, 300).unwrap();
        assert_eq!(alpha_at(&pixmap, 35, 284), 255);
    }
}
