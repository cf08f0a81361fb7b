//! Ball fill colors
//!
//! The color picker hands us CSS hex strings; the GPU wants floats.

use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA color, each channel in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parse `#rrggbb` or `#rgb` (leading `#` optional)
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        // from_str_radix alone would accept a leading '+'
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::from_rgb8(r, g, b))
            }
            3 => {
                // #f80 == #ff8800
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Self::from_rgb8(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            _ => None,
        }
    }

    /// CSS hex form (alpha dropped)
    pub fn to_css(&self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_long_form() {
        let c = Rgba::from_hex("#ff8000").unwrap();
        assert!((c.r - 1.0).abs() < 0.001);
        assert!((c.g - 128.0 / 255.0).abs() < 0.001);
        assert!(c.b.abs() < 0.001);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_from_hex_short_form_matches_long() {
        assert_eq!(Rgba::from_hex("#f80"), Rgba::from_hex("#ff8800"));
        assert_eq!(Rgba::from_hex("abc"), Rgba::from_hex("#aabbcc"));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(Rgba::from_hex("").is_none());
        assert!(Rgba::from_hex("#12345").is_none());
        assert!(Rgba::from_hex("#gg0000").is_none());
        assert!(Rgba::from_hex("red").is_none());
        assert!(Rgba::from_hex("#ffé").is_none());
    }

    #[test]
    fn test_from_hex_rejects_sign_characters() {
        assert!(Rgba::from_hex("#+f+f+f").is_none());
        assert!(Rgba::from_hex("+ff").is_none());
        assert!(Rgba::from_hex("#-10000").is_none());
    }

    #[test]
    fn test_css_output() {
        assert_eq!(Rgba::from_hex("#1E90ff").unwrap().to_css(), "#1e90ff");
        assert_eq!(Rgba::WHITE.to_css(), "#ffffff");
    }
}
