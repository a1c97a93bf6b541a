//! A single orbiting particle.

use crate::color::Color;
use glam::Vec2;

/// Kinematic and visual state for one point on the ring.
///
/// Only `angle` and `position` change after creation. `position` is always
/// derived from the angle, the orbit radius and the orbit center.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Current phase on the orbit, in radians. Never wrapped explicitly.
    pub angle: f32,
    /// Angle added every frame.
    pub velocity: f32,
    /// Orbit radius.
    pub distance_from_center: f32,
    /// Last computed position on the surface.
    pub position: Vec2,
    /// Stroke width used when drawing the trail segment.
    pub radius: f32,
    /// Stroke color.
    pub color: Color,
}

impl Particle {
    /// Create a particle with its position placed on the orbit.
    pub fn new(
        angle: f32,
        velocity: f32,
        distance_from_center: f32,
        radius: f32,
        color: Color,
        center: Vec2,
    ) -> Self {
        Self {
            angle,
            velocity,
            distance_from_center,
            position: orbit_position(angle, distance_from_center, center),
            radius,
            color,
        }
    }

    /// Advance one frame around `center`.
    ///
    /// Returns the segment travelled, from the previous position to the new one.
    pub fn advance(&mut self, center: Vec2) -> (Vec2, Vec2) {
        let last = self.position;
        self.angle += self.velocity;
        self.position = orbit_position(self.angle, self.distance_from_center, center);
        (last, self.position)
    }
}

/// Polar to Cartesian: the point at `angle` on a circle of `distance` around `center`.
#[inline]
pub fn orbit_position(angle: f32, distance: f32, center: Vec2) -> Vec2 {
    Vec2::new(
        angle.cos() * distance + center.x,
        angle.sin() * distance + center.y,
    )
}
