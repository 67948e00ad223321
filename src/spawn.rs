//! Seeding the particle population.

use crate::particle::Particle;
use crate::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Smallest particle radius.
pub const MIN_RADIUS: f32 = 0.5;
/// Largest particle radius.
pub const MAX_RADIUS: f32 = 2.5;

/// An RNG seeded from the system clock.
///
/// Different each program execution. Not available on `wasm32`, where the
/// browser host seeds from `Math.random()` instead.
#[cfg(not(target_arch = "wasm32"))]
pub fn clock_seeded_rng() -> SmallRng {
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42);
    SmallRng::seed_from_u64(seed)
}

/// Generates fresh particles over a surface of a given logical size.
pub struct SpawnContext<'a, R: Rng> {
    /// Logical surface size particles are placed in.
    pub bounds: Vec2,
    /// Per-axis speed cap; initial speeds stay within half of it.
    pub max_speed: f32,
    rng: &'a mut R,
}

impl<'a, R: Rng> SpawnContext<'a, R> {
    pub fn new(bounds: Vec2, max_speed: f32, rng: &'a mut R) -> Self {
        Self {
            bounds,
            max_speed,
            rng,
        }
    }

    /// Random coordinate in `[0, extent)`, or 0 on a degenerate axis.
    #[inline]
    fn coordinate(&mut self, extent: f32) -> f32 {
        if extent > 0.0 {
            self.rng.gen_range(0.0..extent)
        } else {
            0.0
        }
    }

    /// Uniform random position within `[0, width) x [0, height)`.
    pub fn random_position(&mut self) -> Vec2 {
        let x = self.coordinate(self.bounds.x);
        let y = self.coordinate(self.bounds.y);
        Vec2::new(x, y)
    }

    /// Per-axis velocity uniform in `[-max_speed/2, max_speed/2]`.
    pub fn random_velocity(&mut self) -> Vec2 {
        let half = self.max_speed * 0.5;
        Vec2::new(
            self.rng.gen_range(-half..=half),
            self.rng.gen_range(-half..=half),
        )
    }

    /// Radius uniform in `[MIN_RADIUS, MAX_RADIUS]`.
    pub fn random_radius(&mut self) -> f32 {
        self.rng.gen_range(MIN_RADIUS..=MAX_RADIUS)
    }

    pub fn particle(&mut self) -> Particle {
        let position = self.random_position();
        let velocity = self.random_velocity();
        let radius = self.random_radius();
        Particle::new(position, velocity, radius)
    }

    /// Generate `count` particles.
    pub fn particles(&mut self, count: usize) -> Vec<Particle> {
        (0..count).map(|_| self.particle()).collect()
    }
}
