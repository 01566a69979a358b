//! Static colour palette for rendered dashboards.

/// Brand colour, used for neutral embeds.
pub const PRIMARY: u32 = 0x0010_B981;
/// Income slices and positive balances.
pub const INCOME: u32 = 0x0022_C55E;
/// Expense slices and negative balances.
pub const EXPENSE: u32 = 0x00EF_4444;
/// Calorie ring while under goal.
pub const REMAINING: u32 = 0x0014_B8A6;
/// Calorie ring once over goal.
pub const SURPLUS: u32 = 0x00F5_9E0B;
/// Empty states.
pub const MUTED: u32 = 0x0094_A3B8;

/// Parses `#RRGGBB` into a colour value.
#[must_use]
pub fn parse_hex_color(value: &str) -> Option<u32> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Colour of a category, falling back to [`MUTED`] for anything unparsable.
#[must_use]
pub fn category_color(value: &str) -> u32 {
    parse_hex_color(value).unwrap_or(MUTED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#22C55E"), Some(INCOME));
        assert_eq!(parse_hex_color("#ef4444"), Some(EXPENSE));
        assert_eq!(parse_hex_color("22C55E"), None);
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
        assert_eq!(parse_hex_color("#+12345"), None);
    }

    #[test]
    fn test_category_color_fallback() {
        assert_eq!(category_color("nope"), MUTED);
    }
}
