//! Hex color parsing for palette lookups
//!
//! Supports `#RGB` and `#RRGGBB`. Alpha forms are rejected: the display has
//! no translucency, every pixel is one of the 16 palette entries.

use thiserror::Error;

/// An opaque RGB triple.
pub type Rgb = [u8; 3];

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input string doesn't start with '#'
    #[error("color must start with '#'")]
    MissingHash,
    /// Invalid length (must be 3 or 6 hex chars after #)
    #[error("invalid color length {0}, expected 3 or 6")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
}

/// Parse a hex color string into an RGB triple.
///
/// - `#RGB` - 3-digit hex, each digit is doubled (e.g., `#F00` -> red)
/// - `#RRGGBB` - 6-digit hex
///
/// # Examples
///
/// ```
/// use bandpaint::color::parse_hex_color;
///
/// assert_eq!(parse_hex_color("#F00").unwrap(), [255, 0, 0]);
/// assert_eq!(parse_hex_color("#aa5500").unwrap(), [0xAA, 0x55, 0x00]);
/// assert!(parse_hex_color("#FF000080").is_err());
/// ```
pub fn parse_hex_color(s: &str) -> Result<Rgb, ColorError> {
    if s.is_empty() {
        return Err(ColorError::Empty);
    }
    let hex = s.strip_prefix('#').ok_or(ColorError::MissingHash)?;

    // Validate all characters are hex
    let mut digits = Vec::with_capacity(6);
    for c in hex.chars() {
        digits.push(parse_hex_digit(c)?);
    }

    match digits.len() {
        3 => Ok([digits[0] * 17, digits[1] * 17, digits[2] * 17]),
        6 => Ok([
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
        ]),
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// Format an RGB triple as `#RRGGBB`.
pub fn to_hex(rgb: Rgb) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

/// Squared euclidean distance between two colors.
pub fn distance_sq(a: Rgb, b: Rgb) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as i32 - y as i32;
            (d * d) as u32
        })
        .sum()
}

/// Parse a single hex digit (0-9, A-F, a-f) to u8 (0-15)
fn parse_hex_digit(c: char) -> Result<u8, ColorError> {
    match c {
        '0'..='9' => Ok(c as u8 - b'0'),
        'a'..='f' => Ok(c as u8 - b'a' + 10),
        'A'..='F' => Ok(c as u8 - b'A' + 10),
        _ => Err(ColorError::InvalidHex(c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_hex() {
        assert_eq!(parse_hex_color("#FFF").unwrap(), [255, 255, 255]);
        assert_eq!(parse_hex_color("#05a").unwrap(), [0x00, 0x55, 0xAA]);
    }

    #[test]
    fn test_parse_long_hex() {
        assert_eq!(parse_hex_color("#5555FF").unwrap(), [0x55, 0x55, 0xFF]);
        assert_eq!(parse_hex_color("#ff55ff").unwrap(), [0xFF, 0x55, 0xFF]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_hex_color(""), Err(ColorError::Empty));
        assert_eq!(parse_hex_color("FFF"), Err(ColorError::MissingHash));
        assert_eq!(parse_hex_color("#FFFF"), Err(ColorError::InvalidLength(4)));
        assert_eq!(parse_hex_color("#GG0000"), Err(ColorError::InvalidHex('G')));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex([0xAA, 0x55, 0x00]), "#AA5500");
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance_sq([0, 0, 0], [0, 0, 0]), 0);
        assert_eq!(distance_sq([0, 0, 0], [3, 4, 0]), 25);
    }
}
