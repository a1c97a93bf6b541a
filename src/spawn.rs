//! Particle factory.
//!
//! Produces the whole ring in one batch. Generation is a pure function of
//! the options and the randomness source, so a seeded RNG yields the same
//! ring every run.

use crate::options::MotionOptions;
use crate::particle::Particle;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Slowest angular velocity, radians per frame.
pub const MIN_VELOCITY: f32 = 0.02;
/// Fastest angular velocity, radians per frame.
pub const MAX_VELOCITY: f32 = 0.05;
/// A unit random sample is scaled by this before clamping to the velocity range.
pub const VELOCITY_SCALE: f32 = 0.1;
/// Thinnest stroke width.
pub const MIN_RADIUS: f32 = 1.0;
/// Stroke widths span `MIN_RADIUS..MIN_RADIUS + RADIUS_SPREAD`.
pub const RADIUS_SPREAD: f32 = 2.0;

/// RNG for particle generation: seeded when the options carry a seed,
/// otherwise from OS entropy.
pub fn rng_for(options: &MotionOptions) -> SmallRng {
    match options.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

/// Generates particles for a set of options.
///
/// ```ignore
/// let mut rng = rand::thread_rng();
/// let particles = ParticleFactory::new(&options, &mut rng).spawn_all();
/// ```
pub struct ParticleFactory<'a, R: Rng + ?Sized> {
    options: &'a MotionOptions,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> ParticleFactory<'a, R> {
    pub fn new(options: &'a MotionOptions, rng: &'a mut R) -> Self {
        Self { options, rng }
    }

    /// Uniform phase in `[0, 2π)`.
    #[inline]
    pub fn random_angle(&mut self) -> f32 {
        self.rng.gen::<f32>() * TAU
    }

    /// Stroke width in `[1, 3)`.
    #[inline]
    pub fn random_radius(&mut self) -> f32 {
        self.rng.gen::<f32>() * RADIUS_SPREAD + MIN_RADIUS
    }

    /// Angular velocity in `[MIN_VELOCITY, MAX_VELOCITY]`.
    ///
    /// The unit sample is scaled to `[0, 0.1)` and then clamped, so the two
    /// bounds are hit noticeably more often than interior values.
    #[inline]
    pub fn random_velocity(&mut self) -> f32 {
        (self.rng.gen::<f32>() * VELOCITY_SCALE).clamp(MIN_VELOCITY, MAX_VELOCITY)
    }

    /// The particle at `index` of the ring.
    ///
    /// Orbits are spaced linearly outwards from `offset_center`; colors
    /// cycle through the palette.
    pub fn spawn(&mut self, index: u32) -> Particle {
        let angle = self.random_angle();
        let distance = self.options.orbit_step() * index as f32 + self.options.offset_center;
        let radius = self.random_radius();
        let velocity = self.random_velocity();
        let color = self.options.colors.color_for(index as usize);

        Particle::new(angle, velocity, distance, radius, color, self.options.center())
    }

    /// All `count_particles` particles, innermost first.
    pub fn spawn_all(mut self) -> Vec<Particle> {
        (0..self.options.count_particles)
            .map(|index| self.spawn(index))
            .collect()
    }
}

/// Generate the full ring for `options`.
pub fn create_particles<R: Rng + ?Sized>(options: &MotionOptions, rng: &mut R) -> Vec<Particle> {
    ParticleFactory::new(options, rng).spawn_all()
}
