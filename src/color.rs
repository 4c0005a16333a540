//! Colors and built-in palettes

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FxError, Result};

/// An opaque sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const MATRIX_GREEN: Rgb = Rgb::new(0, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional, case-insensitive)
    pub fn from_hex(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(FxError::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| FxError::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// CSS `rgba(...)` string with the given alpha
    pub fn css_rgba(&self, alpha: f32) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha.clamp(0.0, 1.0))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parse a list of hex colors into a non-empty palette
pub fn palette<T: AsRef<str>>(entries: &[T]) -> Result<Vec<Rgb>> {
    if entries.is_empty() {
        return Err(FxError::EmptyPalette);
    }
    entries.iter().map(|e| Rgb::from_hex(e.as_ref())).collect()
}

/// White to deep violet, used by confetti and fireworks
pub fn celebration() -> Vec<Rgb> {
    vec![
        Rgb::new(0xFF, 0xFF, 0xFF),
        Rgb::new(0xE9, 0xD5, 0xFF),
        Rgb::new(0xC0, 0x84, 0xFC),
        Rgb::new(0x93, 0x33, 0xEA),
        Rgb::new(0x4C, 0x1D, 0x95),
    ]
}

/// Warm golds and pinks, used by the pop effects
pub fn marriage() -> Vec<Rgb> {
    vec![
        Rgb::new(0xFF, 0xD7, 0x00),
        Rgb::new(0xFF, 0xC0, 0xCB),
        Rgb::new(0xFF, 0xFF, 0xFF),
        Rgb::new(0xF0, 0xE6, 0x8C),
        Rgb::new(0xDD, 0xA0, 0xDD),
        Rgb::new(0xFF, 0xB6, 0xC1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::from_hex("#C084FC").unwrap(), Rgb::new(0xC0, 0x84, 0xFC));
        assert_eq!(Rgb::from_hex("00ff00").unwrap(), Rgb::MATRIX_GREEN);
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
    }

    #[test]
    fn test_builtin_palettes_match_hex() {
        let celebration_hex = ["#FFFFFF", "#E9D5FF", "#C084FC", "#9333EA", "#4C1D95"];
        let marriage_hex = ["#FFD700", "#FFC0CB", "#FFFFFF", "#F0E68C", "#DDA0DD", "#FFB6C1"];
        assert_eq!(palette(&celebration_hex).unwrap(), celebration());
        assert_eq!(palette(&marriage_hex).unwrap(), marriage());
    }

    #[test]
    fn test_palette_rejects_empty_and_bad_entries() {
        let empty: [&str; 0] = [];
        assert_eq!(palette(&empty), Err(FxError::EmptyPalette));
        let owned = vec!["#ff0000".to_string(), "tomato".to_string()];
        assert_eq!(palette(&owned), Err(FxError::InvalidColor("tomato".to_string())));
    }

    #[test]
    fn test_display_and_css() {
        let c = Rgb::new(0x93, 0x33, 0xEA);
        assert_eq!(c.to_string(), "#9333ea");
        assert_eq!(Rgb::BLACK.css_rgba(0.05), "rgba(0, 0, 0, 0.05)");
    }
}
