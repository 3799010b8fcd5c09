//! Centralized number formatting utilities.
//!
//! All numeric display formatting for the overlay goes through this module so
//! the counter badge, detail panel and power-up countdowns agree, including
//! European-style number formatting (swapping `.` and `,`).

/// Swap `.` and `,` in a formatted number.
fn europeanize(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '.' => ',',
            ',' => '.',
            _ => c,
        })
        .collect()
}

#[inline]
fn maybe_eu(s: String, european: bool) -> String {
    if european { europeanize(&s) } else { s }
}

/// Format a percentage value with 1 decimal place.
///
/// # Examples
/// ```
/// use dragonfin_types::formatting::format_pct;
/// assert_eq!(format_pct(42.7, false), "42.7%");
/// assert_eq!(format_pct(42.7, true), "42,7%");
/// ```
pub fn format_pct(n: f64, european: bool) -> String {
    maybe_eu(format!("{:.1}%", n), european)
}

/// Format a share of a tally as a percentage.
///
/// Returns `"0%"` when nothing has been counted yet.
///
/// # Examples
/// ```
/// use dragonfin_types::formatting::format_share;
/// assert_eq!(format_share(3, 4, false), "75.0%");
/// assert_eq!(format_share(1, 3, true), "33,3%");
/// assert_eq!(format_share(0, 0, false), "0%");
/// ```
pub fn format_share(count: u64, total: u64, european: bool) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format_pct(count as f64 / total as f64 * 100.0, european)
}

/// Format remaining power-up time the way the badge shows it: seconds with
/// one decimal and an `s` suffix (`"4.2s"`).
///
/// - Values >= 60s: `M:SS`
/// - Values <= 0: `"0.0s"`
///
/// # Examples
/// ```
/// use dragonfin_types::formatting::format_countdown_ms;
/// assert_eq!(format_countdown_ms(5000, false), "5.0s");
/// assert_eq!(format_countdown_ms(4250, false), "4.2s");
/// assert_eq!(format_countdown_ms(4250, true), "4,2s");
/// assert_eq!(format_countdown_ms(75_000, false), "1:15");
/// assert_eq!(format_countdown_ms(0, false), "0.0s");
/// ```
pub fn format_countdown_ms(remaining_ms: i64, european: bool) -> String {
    if remaining_ms <= 0 {
        return maybe_eu("0.0s".to_string(), european);
    }
    if remaining_ms >= 60_000 {
        let secs = remaining_ms / 1000;
        return format!("{}:{:02}", secs / 60, secs % 60);
    }
    // Truncate rather than round so the badge never shows more time than is left
    let tenths = remaining_ms / 100;
    maybe_eu(format!("{}.{}s", tenths / 10, tenths % 10), european)
}

/// Format a running total for the counter badge, grouping thousands.
///
/// # Examples
/// ```
/// use dragonfin_types::formatting::format_total;
/// assert_eq!(format_total(7, false), "7");
/// assert_eq!(format_total(12_345, false), "12,345");
/// assert_eq!(format_total(12_345, true), "12.345");
/// ```
pub fn format_total(n: u64, european: bool) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    maybe_eu(result, european)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(0.0, false), "0.0%");
        assert_eq!(format_pct(100.0, false), "100.0%");
        assert_eq!(format_pct(42.7, true), "42,7%");
    }

    #[test]
    fn test_format_share() {
        assert_eq!(format_share(3, 4, false), "75.0%");
        assert_eq!(format_share(1, 4, false), "25.0%");
        assert_eq!(format_share(4, 4, false), "100.0%");
        assert_eq!(format_share(0, 0, false), "0%");
    }

    #[test]
    fn test_format_countdown_ms() {
        assert_eq!(format_countdown_ms(5000, false), "5.0s");
        assert_eq!(format_countdown_ms(4999, false), "4.9s");
        assert_eq!(format_countdown_ms(99, false), "0.0s");
        assert_eq!(format_countdown_ms(-20, false), "0.0s");
        assert_eq!(format_countdown_ms(125_000, false), "2:05");
        assert_eq!(format_countdown_ms(3500, true), "3,5s");
    }

    #[test]
    fn test_format_total() {
        assert_eq!(format_total(0, false), "0");
        assert_eq!(format_total(999, false), "999");
        assert_eq!(format_total(1_000, false), "1,000");
        assert_eq!(format_total(1_500_000, false), "1,500,000");
        assert_eq!(format_total(1_500_000, true), "1.500.000");
    }

    #[test]
    fn test_europeanize() {
        assert_eq!(europeanize("4.2s"), "4,2s");
        assert_eq!(europeanize("1,500"), "1.500");
    }
}
