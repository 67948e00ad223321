//! A single particle and its per-frame motion.

use glam::Vec2;

/// A point moving across the surface.
///
/// Position and velocity are in logical pixels and logical pixels per frame.
/// A particle has no identity beyond its index in the population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Disc radius, fixed at creation.
    pub radius: f32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Move by one frame's velocity, then bounce off the walls of `bounds`.
    ///
    /// Each axis is handled independently: if the new coordinate is below 0 or
    /// above the bound and still moving outward, that velocity component
    /// changes sign. The position is left where it landed, so a particle may
    /// sit up to one frame's displacement outside the surface until the next
    /// step carries it back. A particle stranded further out by a shrinking
    /// surface keeps heading inward until it is back in bounds.
    #[inline]
    pub fn advance(&mut self, bounds: Vec2) {
        self.position += self.velocity;
        self.velocity.x = bounce(self.position.x, self.velocity.x, bounds.x);
        self.velocity.y = bounce(self.position.y, self.velocity.y, bounds.y);
    }

    /// Euclidean distance to another particle.
    #[inline]
    pub fn distance(&self, other: &Particle) -> f32 {
        self.position.distance(other.position)
    }
}

/// Velocity along one axis after a wall check at `position`.
#[inline]
fn bounce(position: f32, velocity: f32, bound: f32) -> f32 {
    if (position < 0.0 && velocity < 0.0) || (position > bound && velocity > 0.0) {
        -velocity
    } else {
        velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_inside_bounds_keeps_velocity() {
        let mut p = Particle::new(Vec2::new(5.0, 5.0), Vec2::new(0.25, -0.5), 1.0);
        p.advance(Vec2::splat(10.0));
        assert_eq!(p.position, Vec2::new(5.25, 4.5));
        assert_eq!(p.velocity, Vec2::new(0.25, -0.5));
    }

    #[test]
    fn test_bounce_flips_only_the_crossing_axis() {
        let mut p = Particle::new(Vec2::new(9.8, 5.0), Vec2::new(0.5, 0.5), 1.0);
        p.advance(Vec2::splat(10.0));
        assert!(p.position.x > 10.0, "position is not clamped");
        assert_eq!(p.velocity, Vec2::new(-0.5, 0.5));

        p.advance(Vec2::splat(10.0));
        assert!(p.position.x <= 10.0);
        assert_eq!(p.velocity, Vec2::new(-0.5, 0.5));
    }

    #[test]
    fn test_landing_exactly_on_wall_does_not_bounce() {
        let mut p = Particle::new(Vec2::new(1.0, 9.0), Vec2::new(-1.0, 1.0), 1.0);
        p.advance(Vec2::splat(10.0));
        assert_eq!(p.position, Vec2::new(0.0, 10.0));
        assert_eq!(p.velocity, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn test_stranded_particle_heads_back_inside() {
        let bounds = Vec2::new(300.0, 400.0);
        let mut p = Particle::new(Vec2::new(500.0, 200.0), Vec2::new(0.1, 0.0), 1.0);

        p.advance(bounds);
        assert_eq!(p.velocity.x, -0.1);

        // Still outside, but already moving inward: no second flip.
        p.advance(bounds);
        assert_eq!(p.velocity.x, -0.1);

        for _ in 0..3_000 {
            p.advance(bounds);
        }
        assert!(p.position.x <= bounds.x, "stuck outside: x = {}", p.position.x);
        assert_eq!(p.velocity.x.abs(), 0.1);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Particle::new(Vec2::new(1.0, 2.0), Vec2::ZERO, 1.0);
        let b = Particle::new(Vec2::new(4.0, 6.0), Vec2::ZERO, 1.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a.distance(&b), b.distance(&a));
    }
}
