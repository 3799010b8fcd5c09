//! Pixmap-backed drawing surface
//!
//! `OverlayFrame` wraps a `tiny_skia::Pixmap` with the handful of shape
//! primitives the overlay needs and the scaling math that keeps the layout
//! proportional to the surface size.

#![allow(clippy::too_many_arguments)]
use tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Paint, Path, PathBuilder, Pixmap, Point, Rect,
    SpreadMode, Stroke, Transform,
};

use crate::widgets::colors;

pub struct OverlayFrame {
    pixmap: Pixmap,
    base_width: f32,
    base_height: f32,
}

impl OverlayFrame {
    /// `None` if either dimension is zero
    pub fn new(width: u32, height: u32, base_width: f32, base_height: f32) -> Option<Self> {
        let mut pixmap = Pixmap::new(width, height)?;
        pixmap.fill(colors::transparent());
        Some(Self {
            pixmap,
            base_width,
            base_height,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scaling
    // ─────────────────────────────────────────────────────────────────────────

    /// Geometric mean of the width and height ratios
    pub fn scale_factor(&self) -> f32 {
        let width_ratio = self.width() / self.base_width;
        let height_ratio = self.height() / self.base_height;
        (width_ratio * height_ratio).sqrt()
    }

    #[inline]
    pub fn scaled(&self, base_value: f32) -> f32 {
        base_value * self.scale_factor()
    }

    pub fn width(&self) -> f32 {
        self.pixmap.width() as f32
    }

    pub fn height(&self) -> f32 {
        self.pixmap.height() as f32
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Primitives
    // ─────────────────────────────────────────────────────────────────────────

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            return;
        };
        self.pixmap
            .fill_rect(rect, &solid(color), Transform::identity(), None);
    }

    pub fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, color: Color) {
        if let Some(path) = rounded_rect(x, y, w, h, radius) {
            self.pixmap.fill_path(
                &path,
                &solid(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    pub fn stroke_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        stroke_width: f32,
        color: Color,
    ) {
        if let Some(path) = rounded_rect(x, y, w, h, radius) {
            self.stroke(&path, stroke_width, color);
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.pixmap.fill_path(
                &path,
                &solid(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, stroke_width: f32, color: Color) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.stroke(&path, stroke_width, color);
        }
    }

    /// Horizontal streak fading in and out: transparent, `color`, transparent
    pub fn fill_streak(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            return;
        };
        let Some(shader) = LinearGradient::new(
            Point::from_xy(x, y),
            Point::from_xy(x + w, y),
            vec![
                GradientStop::new(0.0, colors::transparent()),
                GradientStop::new(0.5, color),
                GradientStop::new(1.0, colors::transparent()),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        ) else {
            return;
        };
        let paint = Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        };
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn stroke(&mut self, path: &Path, width: f32, color: Color) {
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &solid(color), &stroke, Transform::identity(), None);
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

fn rounded_rect(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Option<Path> {
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    let r = radius.clamp(0.0, w.min(h) / 2.0);
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}
