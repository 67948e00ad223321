//! Headless drawing: a display list and a surface that records into it.
//!
//! The native viewer draws the field into a [`RecordingSurface`] and uploads
//! the resulting [`DisplayList`] to the GPU each frame. Tests use it to
//! observe exactly what a frame drew.

use glam::{Affine2, Vec2};

use crate::error::DrawError;
use crate::surface::{Canvas2d, Surface};
use crate::visuals::Rgba;

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetTransform(Affine2),
    Clear { width: f32, height: f32 },
    Line { from: Vec2, to: Vec2, color: Rgba, width: f32 },
    Disc { center: Vec2, radius: f32, color: Rgba },
}

/// Drawing commands since the last clear.
///
/// A clear drops everything drawn before it, so the list holds at most one
/// frame. The most recent transform is kept across clears.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    transform: Option<Affine2>,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently set transform.
    pub fn transform(&self) -> Option<Affine2> {
        self.transform
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Line segments in draw order as `(from, to, color, width)`.
    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, Rgba, f32)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Line {
                from,
                to,
                color,
                width,
            } => Some((from, to, color, width)),
            _ => None,
        })
    }

    /// Discs in draw order as `(center, radius, color)`.
    pub fn discs(&self) -> impl Iterator<Item = (Vec2, f32, Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Disc {
                center,
                radius,
                color,
            } => Some((center, radius, color)),
            _ => None,
        })
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    pub fn disc_count(&self) -> usize {
        self.discs().count()
    }
}

impl Canvas2d for DisplayList {
    fn set_transform(&mut self, transform: Affine2) -> Result<(), DrawError> {
        self.transform = Some(transform);
        self.commands.push(DrawCommand::SetTransform(transform));
        Ok(())
    }

    fn clear(&mut self, width: f32, height: f32) -> Result<(), DrawError> {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { width, height });
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        color: Rgba,
        width: f32,
    ) -> Result<(), DrawError> {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
        Ok(())
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba) -> Result<(), DrawError> {
        self.commands.push(DrawCommand::Disc {
            center,
            radius,
            color,
        });
        Ok(())
    }
}

/// An in-memory [`Surface`] with configurable size and pixel ratio.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    client: Vec2,
    viewport: Vec2,
    device_pixel_ratio: Option<f64>,
    backing: (u32, u32),
    list: DisplayList,
}

impl RecordingSurface {
    pub fn new(client: Vec2, viewport: Vec2, device_pixel_ratio: Option<f64>) -> Self {
        Self {
            client,
            viewport,
            device_pixel_ratio,
            backing: (0, 0),
            list: DisplayList::new(),
        }
    }

    /// A laid-out surface whose viewport matches its own size.
    pub fn sized(width: f32, height: f32) -> Self {
        let size = Vec2::new(width, height);
        Self::new(size, size, None)
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = Some(ratio);
        self
    }

    /// Simulate the host laying the surface out at a new size.
    pub fn set_client_size(&mut self, size: Vec2) {
        self.client = size;
    }

    pub fn set_viewport_size(&mut self, size: Vec2) {
        self.viewport = size;
    }

    pub fn set_device_pixel_ratio(&mut self, ratio: Option<f64>) {
        self.device_pixel_ratio = ratio;
    }

    /// Backing-store size last assigned by the field.
    pub fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    pub fn display_list(&self) -> &DisplayList {
        &self.list
    }
}

impl Canvas2d for RecordingSurface {
    fn set_transform(&mut self, transform: Affine2) -> Result<(), DrawError> {
        self.list.set_transform(transform)
    }

    fn clear(&mut self, width: f32, height: f32) -> Result<(), DrawError> {
        self.list.clear(width, height)
    }

    fn stroke_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        color: Rgba,
        width: f32,
    ) -> Result<(), DrawError> {
        self.list.stroke_line(from, to, color, width)
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba) -> Result<(), DrawError> {
        self.list.fill_disc(center, radius, color)
    }
}

impl Surface for RecordingSurface {
    fn client_size(&self) -> Vec2 {
        self.client
    }

    fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        self.device_pixel_ratio
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_drops_previous_frame() {
        let mut list = DisplayList::new();
        let white = Rgba::new(255, 255, 255, 1.0);
        list.set_transform(Affine2::IDENTITY).unwrap();
        list.fill_disc(Vec2::ONE, 1.0, white).unwrap();
        list.clear(10.0, 10.0).unwrap();
        list.stroke_line(Vec2::ZERO, Vec2::ONE, white, 1.0).unwrap();

        assert_eq!(list.disc_count(), 0);
        assert_eq!(list.line_count(), 1);
        assert_eq!(list.transform(), Some(Affine2::IDENTITY));
        assert!(matches!(list.commands()[0], DrawCommand::Clear { .. }));
    }

    #[test]
    fn test_recording_surface_reports_configured_size() {
        let surface = RecordingSurface::new(Vec2::ZERO, Vec2::new(800.0, 600.0), Some(2.0));
        assert_eq!(surface.client_size(), Vec2::ZERO);
        assert_eq!(surface.viewport_size(), Vec2::new(800.0, 600.0));
        assert_eq!(surface.device_pixel_ratio(), Some(2.0));
        assert_eq!(surface.backing_size(), (0, 0));
    }
}
