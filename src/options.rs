//! Options for the motion controller.
//!
//! [`MotionOptions`] is the complete, validated configuration a controller
//! runs with. [`PartialOptions`] is what callers and configuration files
//! supply: every field is optional and missing ones fall back to the
//! defaults.
//!
//! ```ignore
//! let options = PartialOptions::new()
//!     .with_size(400)
//!     .with_count_particles(300);
//!
//! // Or from disk:
//! let options = PartialOptions::load("ring.json")?;
//! ```

use crate::error::{ConfigurationError, OptionsError};
use crate::palette::Palette;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default surface edge length in pixels.
pub const DEFAULT_SIZE: u32 = 250;
/// Default distance of the innermost orbit from the center.
pub const DEFAULT_OFFSET_CENTER: f32 = 50.0;
/// Default number of particles.
pub const DEFAULT_COUNT_PARTICLES: u32 = 200;

/// Fully resolved controller options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionOptions {
    /// Edge length of the square drawing surface in pixels.
    pub size: u32,
    /// Particle colors, assigned by index.
    pub colors: Palette,
    /// Radius of the innermost orbit.
    pub offset_center: f32,
    /// Number of particles generated at construction.
    pub count_particles: u32,
    /// Seed for particle generation. `None` draws from entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for MotionOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            colors: Palette::default(),
            offset_center: DEFAULT_OFFSET_CENTER,
            count_particles: DEFAULT_COUNT_PARTICLES,
            seed: None,
        }
    }
}

impl MotionOptions {
    /// Overlay `overrides` on top of these options.
    pub fn merged(mut self, overrides: PartialOptions) -> Self {
        if let Some(size) = overrides.size {
            self.size = size;
        }
        if let Some(colors) = overrides.colors {
            self.colors = colors;
        }
        if let Some(offset_center) = overrides.offset_center {
            self.offset_center = offset_center;
        }
        if let Some(count_particles) = overrides.count_particles {
            self.count_particles = count_particles;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        self
    }

    /// Defaults with `overrides` applied, validated.
    pub fn resolve(overrides: PartialOptions) -> Result<Self, ConfigurationError> {
        let options = Self::default().merged(overrides);
        options.validate()?;
        Ok(options)
    }

    /// Check the constraints a controller relies on.
    ///
    /// The offset must leave room inside the ring: orbits are spaced from
    /// `offset_center` out towards `size / 2`.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.size == 0 {
            return Err(ConfigurationError::invalid_option("size", "must be greater than 0"));
        }
        if self.count_particles == 0 {
            return Err(ConfigurationError::invalid_option(
                "countParticles",
                "must be greater than 0",
            ));
        }
        if !self.offset_center.is_finite() || self.offset_center < 0.0 {
            return Err(ConfigurationError::invalid_option(
                "offsetCenter",
                format!("must be a finite number >= 0, got {}", self.offset_center),
            ));
        }
        if self.offset_center > self.half_size() {
            return Err(ConfigurationError::invalid_option(
                "offsetCenter",
                format!(
                    "{} exceeds half the surface size ({})",
                    self.offset_center,
                    self.half_size()
                ),
            ));
        }
        Ok(())
    }

    /// Half the surface edge length.
    #[inline]
    pub fn half_size(&self) -> f32 {
        self.size as f32 / 2.0
    }

    /// Center of the surface, the common orbit center.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::splat(self.half_size())
    }

    /// Radial distance between neighbouring orbits.
    #[inline]
    pub fn orbit_step(&self) -> f32 {
        (self.half_size() - self.offset_center) / self.count_particles as f32
    }
}

/// Caller-supplied options. Unset fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartialOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Palette>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_center: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_particles: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl PartialOptions {
    /// No overrides; resolves to the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the surface edge length in pixels.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the particle palette.
    pub fn with_colors(mut self, colors: Palette) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Set the radius of the innermost orbit.
    pub fn with_offset_center(mut self, offset_center: f32) -> Self {
        self.offset_center = Some(offset_center);
        self
    }

    /// Set the number of particles.
    pub fn with_count_particles(mut self, count: u32) -> Self {
        self.count_particles = Some(count);
        self
    }

    /// Seed particle generation for reproducible output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Apply `other` on top of `self`; fields set in `other` win.
    pub fn overlay(mut self, other: PartialOptions) -> Self {
        self.size = other.size.or(self.size);
        self.colors = other.colors.or(self.colors);
        self.offset_center = other.offset_center.or(self.offset_center);
        self.count_particles = other.count_particles.or(self.count_particles);
        self.seed = other.seed.or(self.seed);
        self
    }

    /// Save the options to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), OptionsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let json = fs::read_to_string(path)?;
        let options = serde_json::from_str(&json)?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn test_defaults() {
        let options = MotionOptions::default();
        assert_eq!(options.size, 250);
        assert_eq!(options.offset_center, 50.0);
        assert_eq!(options.count_particles, 200);
        assert_eq!(options.colors.len(), 6);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_merge_only_overrides_set_fields() {
        let options = MotionOptions::resolve(PartialOptions::new().with_count_particles(1)).unwrap();
        assert_eq!(options.count_particles, 1);
        assert_eq!(options.size, DEFAULT_SIZE);
        assert_eq!(options.offset_center, DEFAULT_OFFSET_CENTER);
    }

    #[test]
    fn test_orbit_step_and_center() {
        let options = MotionOptions::default();
        assert_eq!(options.center(), Vec2::new(125.0, 125.0));
        assert!((options.orbit_step() - 75.0 / 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let field_of = |partial: PartialOptions| match MotionOptions::resolve(partial) {
            Err(ConfigurationError::InvalidOptions { field, .. }) => field,
            other => panic!("expected InvalidOptions, got {:?}", other),
        };

        assert_eq!(field_of(PartialOptions::new().with_size(0)), "size");
        assert_eq!(field_of(PartialOptions::new().with_count_particles(0)), "countParticles");
        assert_eq!(field_of(PartialOptions::new().with_offset_center(-1.0)), "offsetCenter");
        assert_eq!(field_of(PartialOptions::new().with_offset_center(f32::NAN)), "offsetCenter");
        assert_eq!(
            field_of(PartialOptions::new().with_size(80).with_offset_center(50.0)),
            "offsetCenter"
        );
    }

    #[test]
    fn test_offset_equal_to_radius_is_allowed() {
        let options =
            MotionOptions::resolve(PartialOptions::new().with_size(100).with_offset_center(50.0));
        assert!(options.is_ok());
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let json = r##"{
            "size": 300,
            "colors": ["#000000", "rgba(255, 255, 255, 0.5)"],
            "offsetCenter": 20,
            "countParticles": 10
        }"##;
        let partial: PartialOptions = serde_json::from_str(json).unwrap();
        let options = MotionOptions::resolve(partial).unwrap();

        assert_eq!(options.size, 300);
        assert_eq!(options.offset_center, 20.0);
        assert_eq!(options.count_particles, 10);
        assert_eq!(options.colors.color_for(0), Color::BLACK);
        assert_eq!(options.colors.color_for(1), Color::rgba(255, 255, 255, 0.5));
    }

    #[test]
    fn test_json_rejects_unknown_keys_and_empty_palette() {
        assert!(serde_json::from_str::<PartialOptions>(r#"{"sise": 10}"#).is_err());
        assert!(serde_json::from_str::<PartialOptions>(r#"{"colors": []}"#).is_err());
    }

    #[test]
    fn test_overlay_prefers_later_values() {
        let base = PartialOptions::new().with_size(100).with_seed(1);
        let merged = base.overlay(PartialOptions::new().with_size(200));
        assert_eq!(merged.size, Some(200));
        assert_eq!(merged.seed, Some(1));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "circular-motion-options-{}.json",
            std::process::id()
        ));
        let options = PartialOptions::new().with_size(320).with_seed(7);
        options.save(&path).unwrap();

        let loaded = PartialOptions::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, options);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = PartialOptions::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, OptionsError::Io(_)));
    }
}
