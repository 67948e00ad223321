//! Integration tests for the particle field's observable behavior.
//!
//! These drive [`ParticleField`] through a [`RecordingSurface`] and check the
//! population, motion, link and resize guarantees across many frames.

use particle_field::{
    link_alpha, links, Affine2, Canvas2d, DrawCommand, DrawError, FieldConfig, Particle,
    ParticleField, RecordingSurface, Rgba, Surface, Vec2,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn attach(surface: RecordingSurface, config: FieldConfig, seed: u64) -> ParticleField<RecordingSurface> {
    ParticleField::attach_with_rng(Some(surface), config, SmallRng::seed_from_u64(seed))
        .expect("surface present")
}

fn within_one_step(p: &Particle, bounds: Vec2) -> bool {
    let slack = p.velocity.abs() + Vec2::splat(1e-4);
    p.position.x >= -slack.x
        && p.position.x <= bounds.x + slack.x
        && p.position.y >= -slack.y
        && p.position.y <= bounds.y + slack.y
}

// ============================================================================
// Seeding
// ============================================================================

#[test]
fn test_seed_respects_ranges() {
    let config = FieldConfig::new(500, 140.0, 0.35).unwrap();
    let field = attach(RecordingSurface::sized(320.0, 240.0), config, 1);

    assert_eq!(field.particles().len(), 500);
    for p in field.particles() {
        assert!((0.0..320.0).contains(&p.position.x));
        assert!((0.0..240.0).contains(&p.position.y));
        assert!(p.velocity.x.abs() <= 0.35 / 2.0);
        assert!(p.velocity.y.abs() <= 0.35 / 2.0);
        assert!((0.5..=2.5).contains(&p.radius));
    }
}

#[test]
fn test_reseed_replaces_population() {
    let mut field = attach(RecordingSurface::sized(100.0, 100.0), FieldConfig::default(), 2);
    let before = field.particles().to_vec();
    field.seed(10);
    assert_eq!(field.particles().len(), 10);
    assert_ne!(&before[..10], field.particles());
}

// ============================================================================
// Motion
// ============================================================================

#[test]
fn test_particles_stay_within_one_step_of_bounds() {
    let config = FieldConfig::new(80, 140.0, 4.0).unwrap();
    let mut field = attach(RecordingSurface::sized(50.0, 30.0), config, 3);
    let bounds = Vec2::new(50.0, 30.0);

    for _ in 0..2_000 {
        field.tick();
        for p in field.particles() {
            assert!(within_one_step(p, bounds), "escaped: {:?}", p);
        }
    }
}

#[test]
fn test_speed_per_axis_is_constant() {
    let config = FieldConfig::new(40, 140.0, 3.0).unwrap();
    let mut field = attach(RecordingSurface::sized(40.0, 40.0), config, 4);
    let speeds: Vec<Vec2> = field.particles().iter().map(|p| p.velocity.abs()).collect();

    field.run(1_000);

    assert_eq!(field.particles().len(), 40);
    for (p, speed) in field.particles().iter().zip(&speeds) {
        assert_eq!(p.velocity.abs(), *speed);
    }
}

#[test]
fn test_corner_bounce_scenario() {
    let config = FieldConfig::new(2, 140.0, 2.0).unwrap();
    let mut field = attach(RecordingSurface::sized(10.0, 10.0), config, 5);
    field.seed_from([
        Particle::new(Vec2::ZERO, Vec2::new(-1.0, -1.0), 1.0),
        Particle::new(Vec2::new(1.0, 0.0), Vec2::ZERO, 1.0),
    ]);
    let [a, b] = [field.particles()[0], field.particles()[1]];
    assert_eq!(a.distance(&b), 1.0);

    // Both axes leave the surface, so both flip. The position is not clamped.
    field.tick();
    let a = field.particles()[0];
    assert_eq!(a.position, Vec2::new(-1.0, -1.0));
    assert_eq!(a.velocity, Vec2::new(1.0, 1.0));
    assert_eq!(field.particles()[1], b);

    field.tick();
    let a = field.particles()[0];
    assert_eq!(a.position, Vec2::ZERO);
    assert_eq!(a.velocity, Vec2::new(1.0, 1.0));
    assert_eq!(field.particles()[1], b);
}

// ============================================================================
// Links
// ============================================================================

#[test]
fn test_link_threshold_scenario() {
    let config = FieldConfig::new(2, 5.0, 0.35).unwrap();
    let mut field = attach(RecordingSurface::sized(100.0, 100.0), config, 6);

    field.seed_from([
        Particle::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 1.0),
        Particle::new(Vec2::new(14.0, 10.0), Vec2::ZERO, 1.0),
    ]);
    let stats = field.tick();
    assert_eq!(stats.links, 1);
    let alphas: Vec<f32> = field
        .surface()
        .display_list()
        .lines()
        .map(|(_, _, color, _)| color.a)
        .collect();
    assert_eq!(alphas.len(), 1);
    assert!((alphas[0] - 0.2).abs() < 1e-6);

    field.seed_from([
        Particle::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 1.0),
        Particle::new(Vec2::new(16.0, 10.0), Vec2::ZERO, 1.0),
    ]);
    let stats = field.tick();
    assert_eq!(stats.links, 0);
    assert_eq!(field.surface().display_list().line_count(), 0);
}

#[test]
fn test_links_are_order_independent() {
    let config = FieldConfig::new(30, 60.0, 0.35).unwrap();
    let field = attach(RecordingSurface::sized(200.0, 200.0), config, 7);
    let forward: Vec<Particle> = field.particles().to_vec();
    let reversed: Vec<Particle> = forward.iter().rev().copied().collect();
    let n = forward.len();

    let mut a: Vec<(usize, usize, f32)> = links(&forward, 60.0)
        .map(|l| (l.a, l.b, l.alpha))
        .collect();
    let mut b: Vec<(usize, usize, f32)> = links(&reversed, 60.0)
        .map(|l| (n - 1 - l.b, n - 1 - l.a, l.alpha))
        .collect();
    a.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
    b.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
    assert_eq!(a, b);

    for (i, p) in forward.iter().enumerate() {
        for q in &forward[i + 1..] {
            assert_eq!(p.distance(q), q.distance(p));
            assert_eq!(link_alpha(p.distance(q), 60.0), link_alpha(q.distance(p), 60.0));
        }
    }
}

#[test]
fn test_frame_draws_links_before_points() {
    let mut field = attach(RecordingSurface::sized(150.0, 150.0), FieldConfig::default(), 8);
    let stats = field.tick();
    let commands = field.surface().display_list().commands();

    assert!(matches!(commands[0], DrawCommand::Clear { .. }));
    let kinds: Vec<u8> = commands[1..]
        .iter()
        .map(|c| match c {
            DrawCommand::Line { .. } => 0,
            DrawCommand::Disc { .. } => 1,
            _ => 2,
        })
        .collect();
    assert!(kinds.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(kinds.iter().filter(|k| **k == 0).count(), stats.links);
    assert_eq!(kinds.iter().filter(|k| **k == 1).count(), 60);
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_scales_backing_store_only() {
    let surface = RecordingSurface::sized(301.5, 200.25).with_device_pixel_ratio(1.5);
    let mut field = attach(surface, FieldConfig::default(), 9);
    assert_eq!(field.surface().backing_size(), (452, 300));

    field.run(10);
    let before = field.particles().to_vec();

    field.surface_mut().set_client_size(Vec2::new(640.0, 480.0));
    field.surface_mut().set_device_pixel_ratio(Some(2.0));
    field.resize();

    assert_eq!(field.surface().backing_size(), (1280, 960));
    assert_eq!(field.particles(), &before[..]);
    assert_eq!(field.metrics().logical, Vec2::new(640.0, 480.0));
    assert_eq!(
        field.surface().display_list().transform(),
        Some(Affine2::from_scale(Vec2::splat(2.0)))
    );
}

/// How far `p` lies outside `bounds` on each axis.
fn overshoot(p: &Particle, bounds: Vec2) -> Vec2 {
    (-p.position).max(p.position - bounds).max(Vec2::ZERO)
}

#[test]
fn test_shrink_pulls_particles_back_in() {
    let config = FieldConfig::new(120, 140.0, 2.0).unwrap();
    let mut field = attach(RecordingSurface::sized(600.0, 400.0), config, 13);
    field.run(50);

    field.surface_mut().set_client_size(Vec2::new(300.0, 200.0));
    field.resize();
    let bounds = Vec2::new(300.0, 200.0);
    assert!(field.particles().iter().any(|p| !within_one_step(p, bounds)));

    field.tick();
    let mut previous: Vec<Vec2> = field.particles().iter().map(|p| overshoot(p, bounds)).collect();
    for _ in 0..500 {
        field.tick();
        for (p, before) in field.particles().iter().zip(&mut previous) {
            let now = overshoot(p, bounds);
            let stranded = now.cmpgt(p.velocity.abs() + Vec2::splat(1e-4));
            if stranded.x {
                assert!(now.x <= before.x, "drifting away: {:?}", p);
            }
            if stranded.y {
                assert!(now.y <= before.y, "drifting away: {:?}", p);
            }
            *before = now;
        }
    }
}

#[test]
fn test_stranded_particle_returns_after_shrink() {
    let config = FieldConfig::new(1, 140.0, 0.35).unwrap();
    let mut field = attach(RecordingSurface::sized(600.0, 400.0), config, 14);
    field.seed_from([Particle::new(Vec2::new(500.0, 200.0), Vec2::new(0.1, 0.0), 1.0)]);

    field.surface_mut().set_client_size(Vec2::new(300.0, 400.0));
    field.resize();
    field.run(10_000);

    let p = field.particles()[0];
    assert!(within_one_step(&p, Vec2::new(300.0, 400.0)), "stuck outside: x = {}", p.position.x);
    assert_eq!(p.velocity.x.abs(), 0.1);
}

#[test]
fn test_low_density_ratio_is_floored_to_one() {
    let surface = RecordingSurface::sized(100.0, 50.0).with_device_pixel_ratio(0.5);
    let field = attach(surface, FieldConfig::default(), 10);
    assert_eq!(field.metrics().scale, 1.0);
    assert_eq!(field.surface().backing_size(), (100, 50));
}

#[test]
fn test_unlaid_surface_falls_back_to_viewport() {
    let surface = RecordingSurface::new(Vec2::ZERO, Vec2::new(1024.0, 768.0), Some(2.0));
    let field = attach(surface, FieldConfig::default(), 11);

    assert_eq!(field.metrics().logical, Vec2::new(1024.0, 768.0));
    assert_eq!(field.surface().backing_size(), (2048, 1536));
    for p in field.particles() {
        assert!(p.position.x < 1024.0 && p.position.y < 768.0);
    }
}

// ============================================================================
// Failure handling
// ============================================================================

/// A surface whose drawing can be switched off, like a canvas removed from the page.
struct DetachableSurface {
    inner: RecordingSurface,
    detached: bool,
}

impl DetachableSurface {
    fn check(&self) -> Result<(), DrawError> {
        if self.detached {
            Err(DrawError::new("surface detached"))
        } else {
            Ok(())
        }
    }
}

impl Canvas2d for DetachableSurface {
    fn set_transform(&mut self, transform: Affine2) -> Result<(), DrawError> {
        self.check()?;
        self.inner.set_transform(transform)
    }

    fn clear(&mut self, width: f32, height: f32) -> Result<(), DrawError> {
        self.check()?;
        self.inner.clear(width, height)
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) -> Result<(), DrawError> {
        self.check()?;
        self.inner.stroke_line(from, to, color, width)
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba) -> Result<(), DrawError> {
        self.check()?;
        self.inner.fill_disc(center, radius, color)
    }
}

impl Surface for DetachableSurface {
    fn client_size(&self) -> Vec2 {
        self.inner.client_size()
    }

    fn viewport_size(&self) -> Vec2 {
        self.inner.viewport_size()
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        self.inner.device_pixel_ratio()
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.inner.set_backing_size(width, height);
    }
}

#[test]
fn test_draw_failures_do_not_stop_the_simulation() {
    let surface = DetachableSurface {
        inner: RecordingSurface::sized(100.0, 100.0),
        detached: false,
    };
    let mut field =
        ParticleField::attach_with_rng(Some(surface), FieldConfig::default(), SmallRng::seed_from_u64(12))
            .unwrap();
    assert!(field.tick().drawn);

    field.surface_mut().detached = true;
    let before = field.particles().to_vec();
    let stats = field.tick();

    assert!(!stats.drawn);
    assert_eq!(stats.frame, 2);
    assert_eq!(field.failed_frames(), 1);
    assert_ne!(field.particles(), &before[..]);

    field.run(5);
    assert_eq!(field.frame(), 7);
    assert_eq!(field.failed_frames(), 6);

    field.surface_mut().detached = false;
    assert!(field.tick().drawn);
    assert_eq!(field.failed_frames(), 6);
}

#[test]
fn test_missing_surface_is_silent() {
    let field = ParticleField::<RecordingSurface>::attach(None, FieldConfig::default());
    assert!(field.is_none());
}
