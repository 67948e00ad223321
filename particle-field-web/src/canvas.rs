//! [`Surface`] over an HTML canvas and its 2D context.

use std::f64::consts::TAU;

use particle_field::surface::canvas_matrix;
use particle_field::{Affine2, Canvas2d, DrawError, Rgba, Surface, Vec2};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

pub struct CanvasSurface {
    window: Window,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

fn draw_error(value: JsValue) -> DrawError {
    DrawError::new(format!("{:?}", value))
}

impl CanvasSurface {
    /// Find the canvas with `id` and open its 2D context.
    ///
    /// `Ok(None)` when there is no such element; an element that is not a
    /// canvas, or a canvas without a 2D context, is an error.
    pub fn find(window: &Window, id: &str) -> Result<Option<Self>, JsValue> {
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let Some(element) = document.get_element_by_id(id) else {
            return Ok(None);
        };
        let canvas = element.dyn_into::<HtmlCanvasElement>()?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Some(Self {
            window: window.clone(),
            canvas,
            context,
        }))
    }
}

impl Canvas2d for CanvasSurface {
    fn set_transform(&mut self, transform: Affine2) -> Result<(), DrawError> {
        let [a, b, c, d, e, f] = canvas_matrix(&transform);
        self.context.set_transform(a, b, c, d, e, f).map_err(draw_error)
    }

    fn clear(&mut self, width: f32, height: f32) -> Result<(), DrawError> {
        self.context.clear_rect(0.0, 0.0, width as f64, height as f64);
        Ok(())
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) -> Result<(), DrawError> {
        let ctx = &self.context;
        ctx.set_stroke_style_str(&color.to_css());
        ctx.set_line_width(width as f64);
        ctx.begin_path();
        ctx.move_to(from.x as f64, from.y as f64);
        ctx.line_to(to.x as f64, to.y as f64);
        ctx.stroke();
        Ok(())
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Rgba) -> Result<(), DrawError> {
        let ctx = &self.context;
        ctx.set_fill_style_str(&color.to_css());
        ctx.begin_path();
        ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .map_err(draw_error)?;
        ctx.fill();
        Ok(())
    }
}

impl Surface for CanvasSurface {
    fn client_size(&self) -> Vec2 {
        Vec2::new(
            self.canvas.client_width() as f32,
            self.canvas.client_height() as f32,
        )
    }

    fn viewport_size(&self) -> Vec2 {
        let extent = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Vec2::new(
            extent(self.window.inner_width()) as f32,
            extent(self.window.inner_height()) as f32,
        )
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        Some(self.window.device_pixel_ratio())
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}
