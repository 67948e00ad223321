//! The particle field: simulation state bound to one drawable surface.

use glam::Vec2;
use rand::rngs::SmallRng;

use crate::config::FieldConfig;
use crate::error::DrawError;
use crate::links::links;
use crate::particle::Particle;
use crate::spawn::SpawnContext;
use crate::surface::{resolve_scale, Surface, SurfaceMetrics};
use crate::visuals::FieldStyle;

/// Summary of one [`ParticleField::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number, starting at 1 for the first tick.
    pub frame: u64,
    /// Links drawn this frame.
    pub links: usize,
    /// Whether every draw call of the frame succeeded.
    pub drawn: bool,
}

/// A bounded, continuously animated set of particles over a surface.
///
/// The field owns its surface and particle population. It does not schedule
/// itself: a host calls [`tick`](Self::tick) once per animation frame
/// (or [`run`](Self::run) for a fixed number of frames), and calls
/// [`resize`](Self::resize) when the surface may have changed size.
pub struct ParticleField<S: Surface> {
    surface: S,
    config: FieldConfig,
    style: FieldStyle,
    metrics: SurfaceMetrics,
    particles: Vec<Particle>,
    rng: SmallRng,
    frame: u64,
    failed_frames: u64,
}

impl<S: Surface> ParticleField<S> {
    /// Attach to a surface with a clock-seeded RNG.
    ///
    /// See [`attach_with_rng`](Self::attach_with_rng).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn attach(surface: Option<S>, config: FieldConfig) -> Option<Self> {
        Self::attach_with_rng(surface, config, crate::spawn::clock_seeded_rng())
    }

    /// Attach to a surface: size it, then seed `config.count()` particles.
    ///
    /// A missing surface disables the field: `None` is returned and nothing
    /// else happens.
    pub fn attach_with_rng(surface: Option<S>, config: FieldConfig, rng: SmallRng) -> Option<Self> {
        let Some(surface) = surface else {
            log::info!("No particle surface present; particle field disabled");
            return None;
        };

        let mut field = Self {
            surface,
            config,
            style: FieldStyle::default(),
            metrics: SurfaceMetrics::default(),
            particles: Vec::new(),
            rng,
            frame: 0,
            failed_frames: 0,
        };
        field.resize();
        field.seed(config.count() as usize);

        log::info!(
            "Particle field attached: {} particles on {}x{} (scale {})",
            field.particles.len(),
            field.metrics.width(),
            field.metrics.height(),
            field.metrics.scale
        );
        Some(field)
    }

    /// Set the visual style.
    pub fn with_style(mut self, style: FieldStyle) -> Self {
        self.style = style;
        self
    }

    /// Re-measure the surface and resize its backing store.
    ///
    /// Particles are neither moved nor reseeded. Particles left outside a
    /// shrunken surface turn inward on their next frame and drift back in.
    /// The device pixel ratio is read again, so zoom changes are followed.
    pub fn resize(&mut self) {
        let scale = resolve_scale(self.surface.device_pixel_ratio());
        let metrics = SurfaceMetrics::of(&self.surface, scale);
        let (width, height) = metrics.backing_size();

        self.surface.set_backing_size(width, height);
        // Resizing a canvas resets its transform, so reapply it every time.
        if let Err(e) = self.surface.set_transform(metrics.transform()) {
            log::warn!("Failed to set surface transform: {}", e);
        }
        self.metrics = metrics;

        log::debug!(
            "Particle surface resized to {}x{} logical, {}x{} backing",
            metrics.width(),
            metrics.height(),
            width,
            height
        );
    }

    /// Replace the population with `count` freshly generated particles.
    pub fn seed(&mut self, count: usize) {
        let mut ctx = SpawnContext::new(self.metrics.logical, self.config.max_speed(), &mut self.rng);
        self.particles = ctx.particles(count);
    }

    /// Replace the population with the given particles.
    pub fn seed_from(&mut self, particles: impl IntoIterator<Item = Particle>) {
        self.particles = particles.into_iter().collect();
    }

    /// Advance the simulation by one frame and draw it.
    ///
    /// Clears the surface, moves and bounces every particle, draws the links,
    /// then the points. A failing draw call abandons drawing for the rest of
    /// this frame; the simulation itself always advances.
    pub fn tick(&mut self) -> FrameStats {
        self.frame += 1;
        let bounds = self.metrics.logical;

        for particle in &mut self.particles {
            particle.advance(bounds);
        }

        let mut links_drawn = 0;
        let drawn = match self.draw(bounds, &mut links_drawn) {
            Ok(()) => true,
            Err(e) => {
                self.failed_frames += 1;
                if self.failed_frames == 1 {
                    log::warn!("Particle frame {} not drawn: {}", self.frame, e);
                } else {
                    log::debug!("Particle frame {} not drawn: {}", self.frame, e);
                }
                false
            }
        };

        FrameStats {
            frame: self.frame,
            links: links_drawn,
            drawn,
        }
    }

    fn draw(&mut self, bounds: Vec2, links_drawn: &mut usize) -> Result<(), DrawError> {
        self.surface.clear(bounds.x, bounds.y)?;

        for link in links(&self.particles, self.config.link_dist()) {
            let a = self.particles[link.a].position;
            let b = self.particles[link.b].position;
            self.surface
                .stroke_line(a, b, self.style.link(link.alpha), self.style.link_width)?;
            *links_drawn += 1;
        }

        let fill = self.style.point();
        for particle in &self.particles {
            self.surface.fill_disc(particle.position, particle.radius, fill)?;
        }
        Ok(())
    }

    /// Run `frames` ticks back to back.
    pub fn run(&mut self, frames: usize) -> Option<FrameStats> {
        (0..frames).map(|_| self.tick()).last()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn style(&self) -> &FieldStyle {
        &self.style
    }

    pub fn metrics(&self) -> SurfaceMetrics {
        self.metrics
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface, e.g. to feed it a new host size
    /// before calling [`resize`](Self::resize).
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Frames ticked so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Frames whose drawing failed.
    pub fn failed_frames(&self) -> u64 {
        self.failed_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingSurface;
    use rand::SeedableRng;

    fn field(width: f32, height: f32) -> ParticleField<RecordingSurface> {
        ParticleField::attach_with_rng(
            Some(RecordingSurface::sized(width, height)),
            FieldConfig::default(),
            SmallRng::seed_from_u64(11),
        )
        .unwrap()
    }

    #[test]
    fn test_missing_surface_disables_field() {
        let field = ParticleField::<RecordingSurface>::attach_with_rng(
            None,
            FieldConfig::default(),
            SmallRng::seed_from_u64(0),
        );
        assert!(field.is_none());
    }

    #[test]
    fn test_attach_sizes_and_seeds() {
        let field = field(640.0, 480.0);
        assert_eq!(field.particles().len(), 60);
        assert_eq!(field.surface().backing_size(), (640, 480));
        assert_eq!(field.frame(), 0);
    }

    #[test]
    fn test_tick_draws_links_then_points() {
        let mut field = field(200.0, 200.0);
        let stats = field.tick();
        assert!(stats.drawn);
        assert_eq!(stats.frame, 1);

        let list = field.surface().display_list();
        assert_eq!(list.disc_count(), 60);
        assert_eq!(list.line_count(), stats.links);

        let first_disc = list
            .commands()
            .iter()
            .position(|c| matches!(c, crate::recording::DrawCommand::Disc { .. }))
            .unwrap();
        let last_line = list
            .commands()
            .iter()
            .rposition(|c| matches!(c, crate::recording::DrawCommand::Line { .. }));
        if let Some(last_line) = last_line {
            assert!(last_line < first_disc);
        }
    }

    #[test]
    fn test_run_returns_last_frame() {
        let mut field = field(100.0, 100.0);
        assert_eq!(field.run(0), None);
        assert_eq!(field.run(5).unwrap().frame, 5);
        assert_eq!(field.frame(), 5);
    }
}
