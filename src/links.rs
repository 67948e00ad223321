//! Proximity links between particles.
//!
//! Every unordered pair of distinct particles closer than the link threshold is
//! connected by a line whose opacity fades linearly with distance:
//! `alpha = 1 - distance / threshold`. The pass is a plain all-pairs scan,
//! which is cheap at the population sizes a page background uses (60 particles
//! is 1770 pair checks per frame) and needs no allocation.

use crate::particle::Particle;

/// A link between particles `a` and `b`, with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    /// Stroke opacity in `(0, 1]`.
    pub alpha: f32,
}

/// Opacity of a link at `distance`, or `None` if the pair is not linked.
#[inline]
pub fn link_alpha(distance: f32, threshold: f32) -> Option<f32> {
    if distance < threshold {
        Some(1.0 - distance / threshold)
    } else {
        None
    }
}

/// Iterate over all links in `particles` for the given threshold.
///
/// Pairs are visited in `(a, b)` order with `a < b`.
pub fn links(particles: &[Particle], threshold: f32) -> Links<'_> {
    Links {
        particles,
        threshold,
        a: 0,
        b: 1,
    }
}

/// Iterator returned by [`links`].
#[derive(Debug, Clone)]
pub struct Links<'a> {
    particles: &'a [Particle],
    threshold: f32,
    a: usize,
    b: usize,
}

impl Iterator for Links<'_> {
    type Item = Link;

    fn next(&mut self) -> Option<Link> {
        let n = self.particles.len();
        while self.a + 1 < n {
            if self.b >= n {
                self.a += 1;
                self.b = self.a + 1;
                continue;
            }
            let (a, b) = (self.a, self.b);
            self.b += 1;

            let distance = self.particles[a].distance(&self.particles[b]);
            if let Some(alpha) = link_alpha(distance, self.threshold) {
                return Some(Link {
                    a,
                    b,
                    distance,
                    alpha,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn at(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO, 1.0)
    }

    #[test]
    fn test_alpha_inside_threshold() {
        let alpha = link_alpha(4.0, 5.0).unwrap();
        assert!((alpha - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_no_link_at_or_beyond_threshold() {
        assert_eq!(link_alpha(6.0, 5.0), None);
        assert_eq!(link_alpha(5.0, 5.0), None);
    }

    #[test]
    fn test_coincident_particles_fully_opaque() {
        assert_eq!(link_alpha(0.0, 5.0), Some(1.0));
    }

    #[test]
    fn test_pairs_visited_once_in_order() {
        let particles = [at(0.0, 0.0), at(1.0, 0.0), at(2.0, 0.0), at(50.0, 50.0)];
        let found: Vec<(usize, usize)> = links(&particles, 5.0).map(|l| (l.a, l.b)).collect();
        assert_eq!(found, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_full_mesh_count() {
        let particles: Vec<Particle> = (0..60).map(|i| at(i as f32 * 0.01, 0.0)).collect();
        assert_eq!(links(&particles, 140.0).count(), 60 * 59 / 2);
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(links(&[], 10.0).count(), 0);
        assert_eq!(links(&[at(1.0, 1.0)], 10.0).count(), 0);
    }
}
