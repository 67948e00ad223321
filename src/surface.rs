//! Drawable surfaces and their pixel geometry.
//!
//! A surface has a logical (CSS pixel) size and a backing store that is
//! `scale` times larger, where `scale` is the device pixel ratio. All drawing
//! happens in logical units; a uniform scale transform maps them onto the
//! backing store.

use glam::{Affine2, Vec2};

use crate::error::DrawError;
use crate::visuals::Rgba;

/// The 2D drawing operations the particle field needs.
pub trait Canvas2d {
    /// Replace the current drawing transform.
    fn set_transform(&mut self, transform: Affine2) -> Result<(), DrawError>;

    /// Erase the rectangle `(0, 0, width, height)` in logical units.
    fn clear(&mut self, width: f32, height: f32) -> Result<(), DrawError>;

    /// Stroke a straight line.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32)
        -> Result<(), DrawError>;

    /// Fill a disc.
    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba) -> Result<(), DrawError>;
}

/// A host drawing surface: a [`Canvas2d`] that can also report its size.
pub trait Surface: Canvas2d {
    /// Laid-out logical size. Either axis may be zero before layout.
    fn client_size(&self) -> Vec2;

    /// Logical size of the host viewport, used when the client size is zero.
    fn viewport_size(&self) -> Vec2;

    /// Device pixel ratio, if the host exposes one.
    fn device_pixel_ratio(&self) -> Option<f64>;

    /// Resize the backing store in physical pixels.
    fn set_backing_size(&mut self, width: u32, height: u32);
}

/// Resolve the backing-store scale from an optional device pixel ratio.
///
/// Missing or non-finite ratios count as 1, and the result is never below 1.
pub fn resolve_scale(device_pixel_ratio: Option<f64>) -> f64 {
    match device_pixel_ratio {
        Some(dpr) if dpr.is_finite() => dpr.max(1.0),
        _ => 1.0,
    }
}

/// Logical size and backing scale of a surface at one point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMetrics {
    /// Logical width and height.
    pub logical: Vec2,
    /// Backing-store pixels per logical pixel, `>= 1`.
    pub scale: f64,
}

impl SurfaceMetrics {
    pub fn new(logical: Vec2, scale: f64) -> Self {
        Self { logical, scale }
    }

    /// Measure a surface, falling back to the viewport per axis.
    ///
    /// A client width of zero (not yet laid out) is replaced by the viewport
    /// width, and likewise for height.
    pub fn measure(client: Vec2, viewport: Vec2, scale: f64) -> Self {
        let width = if client.x > 0.0 { client.x } else { viewport.x };
        let height = if client.y > 0.0 { client.y } else { viewport.y };
        Self::new(Vec2::new(width, height), scale)
    }

    /// Measure a live surface.
    pub fn of<S: Surface + ?Sized>(surface: &S, scale: f64) -> Self {
        Self::measure(surface.client_size(), surface.viewport_size(), scale)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.logical.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.logical.y
    }

    /// Backing-store size in physical pixels, floored.
    pub fn backing_size(&self) -> (u32, u32) {
        let w = (self.logical.x as f64 * self.scale).floor();
        let h = (self.logical.y as f64 * self.scale).floor();
        (w.max(0.0) as u32, h.max(0.0) as u32)
    }

    /// Transform from logical drawing coordinates to backing-store pixels.
    ///
    /// Equivalent to the canvas matrix `(scale, 0, 0, scale, 0, 0)`.
    pub fn transform(&self) -> Affine2 {
        Affine2::from_scale(Vec2::splat(self.scale as f32))
    }
}

impl Default for SurfaceMetrics {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 1.0)
    }
}

/// The six canvas matrix components `(a, b, c, d, e, f)` of an affine transform.
pub fn canvas_matrix(transform: &Affine2) -> [f64; 6] {
    let m = transform.matrix2;
    let t = transform.translation;
    [
        m.x_axis.x as f64,
        m.x_axis.y as f64,
        m.y_axis.x as f64,
        m.y_axis.y as f64,
        t.x as f64,
        t.y as f64,
    ]
}
