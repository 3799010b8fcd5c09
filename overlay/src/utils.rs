//! Common utility functions for overlay rendering
//!
//! Number formatting is delegated to `dragonfin_types::formatting` so the
//! console report and the overlay agree.

use dragonfin_types::color::Rgba;
use tiny_skia::Color;

pub use dragonfin_types::formatting;

/// Convert [u8; 4] RGBA array to tiny_skia Color
#[inline]
pub fn color_from_rgba(rgba: Rgba) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Same color with its alpha scaled by `factor` (0.0..=1.0)
pub fn fade(rgba: Rgba, factor: f32) -> Color {
    let alpha = (rgba[3] as f32 * factor.clamp(0.0, 1.0)).round() as u8;
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], alpha)
}

/// Truncate a string to max_chars, adding "..." if truncated
pub fn truncate_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        name.to_string()
    } else {
        let truncated: String = name.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("小金鱼", 10), "小金鱼");
        assert_eq!(truncate_name("this is a very long name", 10), "this is...");
    }

    #[test]
    fn test_fade() {
        let faded = fade([255, 215, 0, 255], 0.5);
        assert_eq!(faded.to_color_u8().alpha(), 128);
        assert_eq!(fade([1, 2, 3, 200], 2.0).to_color_u8().alpha(), 200);
    }
}
