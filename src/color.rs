//! Colors as the drawing surface understands them.
//!
//! Stroke and fill styles are CSS color strings in configuration files
//! (`"#5CCCCC"`, `"rgba(255, 255, 255, 0.1)"`). They are parsed once, when
//! options are built, into a [`Color`] so the frame loop never touches text.

use crate::error::ColorParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity, 0.0 (transparent) to 1.0 (opaque).
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0.0);

    /// Opaque color from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Color from 8-bit channels and a 0.0-1.0 opacity.
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Whether the color is fully opaque.
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Channels as an 8-bit RGBA quadruple, alpha rounded to the nearest step.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let a = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
        [self.r, self.g, self.b, a]
    }

    /// CSS representation: `#RRGGBB` when opaque, `rgba(r, g, b, a)` otherwise.
    pub fn to_css(&self) -> String {
        if self.is_opaque() {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let color = match name {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "transparent" => Color::TRANSPARENT,
            "red" => Color::rgb(255, 0, 0),
            "lime" => Color::rgb(0, 255, 0),
            "blue" => Color::rgb(0, 0, 255),
            "yellow" => Color::rgb(255, 255, 0),
            "cyan" | "aqua" => Color::rgb(0, 255, 255),
            "magenta" | "fuchsia" => Color::rgb(255, 0, 255),
            "gray" | "grey" => Color::rgb(128, 128, 128),
            _ => return None,
        };
        Some(color)
    }

    fn parse_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = &s[1..];
        let invalid = || ColorParseError::InvalidHex(s.to_string());

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        // Short forms repeat each nibble: #abc == #aabbcc
        let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);

        let [r, g, b, a] = match digits.len() {
            3 => [nibble(0), nibble(1), nibble(2), Ok(255)],
            4 => [nibble(0), nibble(1), nibble(2), nibble(3)],
            6 => [byte(0), byte(2), byte(4), Ok(255)],
            8 => [byte(0), byte(2), byte(4), byte(6)],
            _ => return Err(invalid()),
        };

        match (r, g, b, a) {
            (Ok(r), Ok(g), Ok(b), Ok(a)) => Ok(Color::rgba(r, g, b, a as f32 / 255.0)),
            _ => Err(invalid()),
        }
    }

    fn parse_function(s: &str, body: &str) -> Result<Self, ColorParseError> {
        let invalid = || ColorParseError::InvalidFunction(s.to_string());

        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(invalid());
        }

        let mut channels = [0u8; 3];
        for (channel, part) in channels.iter_mut().zip(&parts) {
            let value: f32 = part.parse().map_err(|_| invalid())?;
            if !value.is_finite() {
                return Err(invalid());
            }
            *channel = value.round().clamp(0.0, 255.0) as u8;
        }

        let alpha = match parts.get(3) {
            Some(part) => {
                let value: f32 = part.parse().map_err(|_| invalid())?;
                if !value.is_finite() {
                    return Err(invalid());
                }
                value.clamp(0.0, 1.0)
            }
            None => 1.0,
        };

        Ok(Color::rgba(channels[0], channels[1], channels[2], alpha))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }

        if s.starts_with('#') {
            return Color::parse_hex(s);
        }

        let lower = s.to_ascii_lowercase();
        if let Some(rest) = lower.strip_prefix("rgba(").or_else(|| lower.strip_prefix("rgb(")) {
            return match rest.strip_suffix(')') {
                Some(body) => Color::parse_function(s, body),
                None => Err(ColorParseError::InvalidFunction(s.to_string())),
            };
        }

        Color::from_name(&lower).ok_or_else(|| ColorParseError::Unrecognized(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_css()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}
