//! Ordered particle color palettes.

use crate::color::Color;
use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// A non-empty, ordered sequence of colors.
///
/// Particles are assigned colors by index: particle `i` gets
/// `palette[i % palette.len()]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Color>", into = "Vec<Color>")]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Teal, gold, coral, dark teal, orange, red.
    pub const DEFAULT_COLORS: [Color; 6] = [
        Color::rgb(0x5C, 0xCC, 0xCC),
        Color::rgb(0xFF, 0xD0, 0x73),
        Color::rgb(0xFF, 0x73, 0x73),
        Color::rgb(0x00, 0x99, 0x99),
        Color::rgb(0xFF, 0xAA, 0x00),
        Color::rgb(0xFF, 0x00, 0x00),
    ];

    /// Build a palette, rejecting an empty color list.
    pub fn new(colors: Vec<Color>) -> Result<Self, ConfigurationError> {
        if colors.is_empty() {
            return Err(ConfigurationError::invalid_option(
                "colors",
                "palette must contain at least one color",
            ));
        }
        Ok(Self { colors })
    }

    /// Build a palette from CSS color strings.
    pub fn parse<S: AsRef<str>>(colors: &[S]) -> Result<Self, ConfigurationError> {
        let colors = colors
            .iter()
            .map(|c| {
                c.as_ref()
                    .parse::<Color>()
                    .map_err(|e| ConfigurationError::invalid_option("colors", e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// Color for the particle at `index`, cycling through the palette.
    #[inline]
    pub fn color_for(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    /// Number of colors in the palette. Never zero.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The colors in order.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: Self::DEFAULT_COLORS.to_vec(),
        }
    }
}

impl TryFrom<Vec<Color>> for Palette {
    type Error = ConfigurationError;

    fn try_from(colors: Vec<Color>) -> Result<Self, Self::Error> {
        Palette::new(colors)
    }
}

impl From<Palette> for Vec<Color> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}
