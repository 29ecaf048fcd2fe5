//! Color representation

use std::fmt;

/// Color representation
///
/// RGB and ARGB colors carry explicit channel values. Theme and indexed
/// colors are preserved as read so templates round-trip without a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Automatic/default color
    #[default]
    Auto,

    /// RGB color (no alpha)
    Rgb { r: u8, g: u8, b: u8 },

    /// ARGB color with alpha channel
    Argb { a: u8, r: u8, g: u8, b: u8 },

    /// Theme color with optional tint (index 0-9, tint as i8 percentage)
    Theme { index: u8, tint: i8 },

    /// Indexed color (legacy palette)
    Indexed(u8),
}

impl Color {
    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Create from a hex string (e.g., "#FF0000", "FF0000", or 8-digit ARGB)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');

        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color::Rgb { r, g, b })
            }
            8 => {
                let a = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let r = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let g = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let b = u8::from_str_radix(&hex[6..8], 16).ok()?;
                // Fully opaque ARGB is the same color as plain RGB
                if a == 0xFF {
                    Some(Color::Rgb { r, g, b })
                } else {
                    Some(Color::Argb { a, r, g, b })
                }
            }
            _ => None,
        }
    }

    /// Convert to ARGB hex string (8 characters)
    ///
    /// Only meaningful for Auto/Rgb/Argb; theme and indexed colors are
    /// serialized through their native attributes instead.
    pub fn to_argb_hex(&self) -> String {
        match self {
            Color::Auto => "FF000000".to_string(),
            Color::Rgb { r, g, b } => format!("FF{:02X}{:02X}{:02X}", r, g, b),
            Color::Argb { a, r, g, b } => format!("{:02X}{:02X}{:02X}{:02X}", a, r, g, b),
            Color::Theme { .. } | Color::Indexed(_) => "FF000000".to_string(),
        }
    }

    /// Check if color is automatic/default
    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }

    // Common colors
    pub const BLACK: Color = Color::Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
    /// Light gray used for header fills (EFEFEF)
    pub const HEADER_GRAY: Color = Color::Rgb {
        r: 0xEF,
        g: 0xEF,
        b: 0xEF,
    };
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Auto => write!(f, "auto"),
            Color::Rgb { r, g, b } => write!(f, "#{:02X}{:02X}{:02X}", r, g, b),
            Color::Argb { a, r, g, b } => write!(f, "#{:02X}{:02X}{:02X}{:02X}", a, r, g, b),
            Color::Theme { index, tint } => write!(f, "theme({}, {}%)", index, tint),
            Color::Indexed(i) => write!(f, "indexed({})", i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(
            Color::from_hex("#FF0000"),
            Some(Color::Rgb { r: 255, g: 0, b: 0 })
        );
        assert_eq!(
            Color::from_hex("EFEFEF"),
            Some(Color::HEADER_GRAY)
        );
        assert_eq!(
            Color::from_hex("#80FFFFFF"),
            Some(Color::Argb {
                a: 128,
                r: 255,
                g: 255,
                b: 255
            })
        );
        assert_eq!(
            Color::from_hex("FFFF0000"),
            Some(Color::Rgb { r: 255, g: 0, b: 0 })
        );
        assert_eq!(Color::from_hex("xyz"), None);
    }

    #[test]
    fn test_to_argb_hex() {
        assert_eq!(Color::Rgb { r: 255, g: 0, b: 0 }.to_argb_hex(), "FFFF0000");
        assert_eq!(Color::Auto.to_argb_hex(), "FF000000");
    }
}
