//! # Particle Field
//!
//! An ambient background animation: a bounded set of drifting particles, with
//! a line drawn between every pair closer than a threshold.
//!
//! The simulation is independent of any host. It draws through the [`Surface`]
//! trait, and something else decides when frames happen: a browser animation
//! frame, a native window redraw, or a test calling [`ParticleField::tick`]
//! in a loop.
//!
//! ## Quick Start
//!
//! ```
//! use particle_field::prelude::*;
//!
//! let surface = RecordingSurface::sized(800.0, 600.0);
//! let mut field = ParticleField::attach(Some(surface), FieldConfig::default()).unwrap();
//!
//! let stats = field.tick();
//! assert_eq!(stats.frame, 1);
//! assert_eq!(field.surface().display_list().disc_count(), 60);
//! ```
//!
//! ## Core Concepts
//!
//! ### Frames
//!
//! Each [`tick`](ParticleField::tick) clears the surface, moves every particle
//! by its velocity, flips a velocity component when the particle leaves the
//! surface on that axis, then draws links and points. Velocities are never
//! scaled, so each particle keeps its speed per axis forever.
//!
//! ### Links
//!
//! Two particles closer than `link_dist` are joined by a line with opacity
//! `1 - distance / link_dist`. See [`links()`].
//!
//! ### Surfaces
//!
//! A [`Surface`] reports its logical size, the viewport size (used when the
//! surface has not been laid out yet) and its device pixel ratio. On
//! [`resize`](ParticleField::resize) the field sizes the backing store to
//! `floor(logical * scale)` and sets a transform so drawing stays in logical
//! pixels.
//!
//! ## Feature Overview
//!
//! | Feature | Default | Provides |
//! |---------|---------|----------|
//! | `viewer` | yes | [`Viewer`], a native window rendered with wgpu |

pub mod config;
pub mod error;
pub mod field;
#[cfg(feature = "viewer")]
mod gpu;
pub mod links;
pub mod particle;
pub mod recording;
pub mod spawn;
pub mod surface;
pub mod time;
#[cfg(feature = "viewer")]
mod viewer;
pub mod visuals;

pub use config::{FieldConfig, Settings};
pub use error::{ConfigError, DrawError};
pub use field::{FrameStats, ParticleField};
pub use glam::{Affine2, Vec2};
pub use links::{link_alpha, links, Link};
pub use particle::Particle;
pub use recording::{DisplayList, DrawCommand, RecordingSurface};
pub use spawn::SpawnContext;
pub use surface::{resolve_scale, Canvas2d, Surface, SurfaceMetrics};
#[cfg(feature = "viewer")]
pub use error::{GpuError, ViewerError};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
pub use visuals::{FieldStyle, Rgba};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use particle_field::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{FieldConfig, Settings};
    pub use crate::field::{FrameStats, ParticleField};
    pub use crate::particle::Particle;
    pub use crate::recording::RecordingSurface;
    pub use crate::surface::{Canvas2d, Surface};
    pub use crate::time::Time;
    #[cfg(feature = "viewer")]
    pub use crate::viewer::Viewer;
    pub use crate::visuals::{FieldStyle, Rgba};
    pub use crate::Vec2;
}
