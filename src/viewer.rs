//! Native preview window.
//!
//! Runs a [`ParticleField`] in a desktop window. The field draws into a
//! [`RecordingSurface`] sized to the window's logical inner size, and the
//! recorded frame is presented with wgpu. Every redraw requests the next one,
//! so the animation runs until the window is closed.

use std::sync::Arc;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::Settings;
use crate::error::ViewerError;
use crate::field::ParticleField;
use crate::gpu::GpuState;
use crate::recording::RecordingSurface;
use crate::time::Time;

/// A particle field preview builder.
///
/// ```ignore
/// Viewer::new(Settings::default())
///     .with_size(1280, 720)
///     .run()?;
/// ```
pub struct Viewer {
    settings: Settings,
    size: (u32, u32),
}

impl Viewer {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            size: (1280, 720),
        }
    }

    /// Initial logical window size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Open the window and animate until it is closed.
    pub fn run(self) -> Result<(), ViewerError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.settings, self.size);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Surface metrics of a window, in logical pixels.
fn window_surface(size: PhysicalSize<u32>, scale_factor: f64) -> (Vec2, f64) {
    let logical = size.to_logical::<f32>(scale_factor);
    (Vec2::new(logical.width, logical.height), scale_factor)
}

struct App {
    settings: Settings,
    size: (u32, u32),
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    field: Option<ParticleField<RecordingSurface>>,
    time: Time,
    error: Option<ViewerError>,
}

impl App {
    fn new(settings: Settings, size: (u32, u32)) -> Self {
        Self {
            settings,
            size,
            window: None,
            gpu_state: None,
            field: None,
            time: Time::new(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(self.size.0, self.size.1));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.window = Some(window.clone());

        let (logical, scale) = window_surface(window.inner_size(), window.scale_factor());
        let surface = RecordingSurface::new(logical, logical, Some(scale));
        self.field = ParticleField::attach(Some(surface), self.settings.field)
            .map(|field| field.with_style(self.settings.style));

        let mut gpu_state = pollster::block_on(GpuState::new(window, self.settings.style.background))?;
        if let Some(field) = &self.field {
            let (width, height) = field.surface().backing_size();
            gpu_state.resize(width, height);
        }
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn resized(&mut self, physical_size: PhysicalSize<u32>, scale_factor: f64) {
        let Some(field) = &mut self.field else {
            return;
        };
        let (logical, scale) = window_surface(physical_size, scale_factor);
        let surface = field.surface_mut();
        surface.set_client_size(logical);
        surface.set_viewport_size(logical);
        surface.set_device_pixel_ratio(Some(scale));
        field.resize();

        if let Some(gpu_state) = &mut self.gpu_state {
            let (width, height) = field.surface().backing_size();
            gpu_state.resize(width, height);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(field), Some(gpu_state)) = (&mut self.field, &mut self.gpu_state) else {
            return;
        };

        field.tick();
        let logical = field.metrics().logical;
        match gpu_state.render(field.surface().display_list(), logical) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = (gpu_state.config.width, gpu_state.config.height);
                gpu_state.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory; closing viewer");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        if self.time.update() {
            if let Some(window) = &self.window {
                window.set_title(&format!(
                    "{} - {:.0} fps",
                    self.settings.title,
                    self.time.fps()
                ));
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("{}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                let scale_factor = self
                    .window
                    .as_ref()
                    .map(|w| w.scale_factor())
                    .unwrap_or(1.0);
                self.resized(physical_size, scale_factor);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = self.window.clone() {
                    self.resized(window.inner_size(), scale_factor);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
