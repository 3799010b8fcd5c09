//! Hex color parsing and text contrast selection.

/// RGBA color as stored in configs and widgets.
pub type Rgba = [u8; 4];

pub const BLACK: Rgba = [0, 0, 0, 255];
pub const WHITE: Rgba = [255, 255, 255, 255];
/// Muted grey used for "effect expired" notifications.
pub const EXPIRED_GREY: Rgba = [0x88, 0x88, 0x88, 255];

/// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
///
/// # Examples
/// ```
/// use dragonfin_types::color::parse_hex;
/// assert_eq!(parse_hex("#FFD700"), Some([255, 215, 0, 255]));
/// assert_eq!(parse_hex("00ffff80"), Some([0, 255, 255, 128]));
/// assert_eq!(parse_hex("#12"), None);
/// ```
pub fn parse_hex(hex: &str) -> Option<Rgba> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some([channel(0)?, channel(2)?, channel(4)?, 255]),
        8 => Some([channel(0)?, channel(2)?, channel(4)?, channel(6)?]),
        _ => None,
    }
}

/// Pick black or white text for a background using perceived brightness
/// (`(r*299 + g*587 + b*114) / 1000`).
///
/// # Examples
/// ```
/// use dragonfin_types::color::{contrast_text, BLACK, WHITE};
/// assert_eq!(contrast_text([255, 215, 0, 255]), BLACK);
/// assert_eq!(contrast_text([0x70, 0x80, 0x90, 255]), WHITE);
/// ```
pub fn contrast_text(background: Rgba) -> Rgba {
    let [r, g, b, _] = background;
    let brightness = (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000;
    if brightness > 128 { BLACK } else { WHITE }
}
