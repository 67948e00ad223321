//! Colors and visual style.

use serde::{Deserialize, Serialize};

/// An sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `0.0..=1.0`.
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different opacity.
    pub fn from_rgb(rgb: [u8; 3], a: f32) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2], a)
    }

    /// CSS `rgba()` form with the alpha printed to three decimals.
    ///
    /// ```
    /// use particle_field::Rgba;
    /// assert_eq!(Rgba::new(255, 255, 255, 0.2).to_css(), "rgba(255,255,255,0.200)");
    /// ```
    pub fn to_css(&self) -> String {
        format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
    }

    /// Linear-light RGBA for an sRGB render target.
    pub fn to_linear(&self) -> [f32; 4] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            self.a,
        ]
    }
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn default_link_width() -> f32 {
    1.0
}

fn default_point_alpha() -> f32 {
    0.8
}

fn default_background() -> [u8; 3] {
    [5, 5, 13]
}

/// How links and points are painted.
///
/// Link opacity is not part of the style: it comes from the link pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStyle {
    /// Link stroke color.
    #[serde(default = "white")]
    pub link_color: [u8; 3],
    /// Link stroke width in logical pixels.
    #[serde(default = "default_link_width")]
    pub link_width: f32,
    /// Point fill color.
    #[serde(default = "white")]
    pub point_color: [u8; 3],
    /// Fixed point fill opacity.
    #[serde(default = "default_point_alpha")]
    pub point_alpha: f32,
    /// Clear color of the native viewer. Browser canvases stay transparent.
    #[serde(default = "default_background")]
    pub background: [u8; 3],
}

fn white() -> [u8; 3] {
    [255, 255, 255]
}

impl Default for FieldStyle {
    fn default() -> Self {
        Self {
            link_color: white(),
            link_width: default_link_width(),
            point_color: white(),
            point_alpha: default_point_alpha(),
            background: default_background(),
        }
    }
}

impl FieldStyle {
    /// Stroke color for a link of the given opacity.
    #[inline]
    pub fn link(&self, alpha: f32) -> Rgba {
        Rgba::from_rgb(self.link_color, alpha)
    }

    /// Fill color for points.
    #[inline]
    pub fn point(&self) -> Rgba {
        Rgba::from_rgb(self.point_color, self.point_alpha)
    }
}
