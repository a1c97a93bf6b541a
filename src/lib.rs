//! # Circular Motion
//!
//! A ring of particles orbiting the center of a square canvas, each one
//! leaving a fading trail.
//!
//! The effect is a [`CircularMotion`] controller bound to a drawing
//! [`Surface`]. Every frame it washes the surface with translucent white and
//! strokes each particle's step along its orbit, so old positions fade out
//! over a few dozen frames.
//!
//! ## Quick Start
//!
//! ```ignore
//! use circular_motion::prelude::*;
//!
//! let canvas = PixelCanvas::new();
//! let driver = AnimationLoop::new();
//! let mut motion = CircularMotion::new(
//!     canvas.clone(),
//!     PartialOptions::new().with_size(400).with_count_particles(300),
//!     driver.clone(),
//! )?;
//!
//! motion.start();
//! for _ in 0..120 {
//!     driver.pump();
//! }
//! let pixels = canvas.snapshot();
//! ```
//!
//! ## Core Concepts
//!
//! ### Particles
//!
//! Orbits are spaced evenly from `offset_center` out to half the surface
//! size. Phase, stroke width and angular velocity are random; colors cycle
//! through the [`Palette`]. Set [`PartialOptions::with_seed`] for a
//! reproducible ring.
//!
//! ### Surfaces
//!
//! The controller draws through the [`Context2d`] trait. [`PixelCanvas`] is
//! the bundled software implementation; [`Document`] resolves selectors
//! like `#stage` or `canvas` to canvases for [`CircularMotion::from_selector`].
//!
//! ### Frame driving
//!
//! Nothing animates on its own. A [`FrameDriver`] calls the controller once
//! per frame; with [`AnimationLoop`] the host calls `pump()` on every
//! display refresh. The [`window`] viewer and the [`export`] module are two
//! such hosts.

pub mod color;
pub mod controller;
pub mod error;
pub mod export;
pub mod frame;
pub mod gpu;
pub mod options;
pub mod palette;
pub mod particle;
pub mod raster;
pub mod spawn;
pub mod surface;
pub mod window;

pub use color::Color;
pub use controller::{CircularMotion, TRAIL_FADE};
pub use error::{ColorParseError, ConfigurationError, ExportError, GpuError, OptionsError, ViewerError};
pub use frame::{AnimationLoop, FrameDriver, FrameStats};
pub use glam::Vec2;
pub use options::{MotionOptions, PartialOptions};
pub use palette::Palette;
pub use particle::Particle;
pub use raster::{Document, Node, PixelCanvas, PixelContext, Pixmap};
pub use surface::{Context2d, Dimension, Surface, SurfaceLookup};

/// Everything needed to build and drive a controller.
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::controller::CircularMotion;
    pub use crate::error::ConfigurationError;
    pub use crate::frame::{AnimationLoop, FrameDriver};
    pub use crate::options::{MotionOptions, PartialOptions};
    pub use crate::palette::Palette;
    pub use crate::raster::{Document, Node, PixelCanvas};
    pub use crate::surface::{Context2d, Surface, SurfaceLookup};
    pub use crate::Vec2;
}
