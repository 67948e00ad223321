//! The background particle field on `#bg-particles`.

use std::cell::RefCell;
use std::rc::Rc;

use particle_field::{FieldConfig, ParticleField};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;

use crate::canvas::CanvasSurface;

/// Id of the canvas the field draws on.
pub const CANVAS_ID: &str = "bg-particles";

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `SystemTime` is unavailable in the browser, so seed from `Math.random`.
fn browser_rng() -> SmallRng {
    let word = |r: f64| (r * f64::from(u32::MAX)) as u64;
    SmallRng::seed_from_u64((word(js_sys::Math::random()) << 32) | word(js_sys::Math::random()))
}

fn request_frame(window: &Window, callback: &FrameCallback) -> Result<i32, JsValue> {
    let callback = callback.borrow();
    let closure = callback
        .as_ref()
        .ok_or_else(|| JsValue::from_str("frame callback missing"))?;
    window.request_animation_frame(closure.as_ref().unchecked_ref())
}

/// Attach the field to its canvas, follow window resizes, and tick once per
/// animation frame for the lifetime of the page.
///
/// Without the canvas this does nothing.
pub fn init(window: &Window) -> Result<(), JsValue> {
    let surface = CanvasSurface::find(window, CANVAS_ID)?;
    let Some(field) = ParticleField::attach_with_rng(surface, FieldConfig::default(), browser_rng())
    else {
        return Ok(());
    };
    let field = Rc::new(RefCell::new(field));

    let on_resize = {
        let field = field.clone();
        Closure::<dyn FnMut()>::new(move || field.borrow_mut().resize())
    };
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    // The frame closure re-requests itself, so it holds a handle to its own slot.
    let frame: FrameCallback = Rc::new(RefCell::new(None));
    let next = frame.clone();
    let loop_window = window.clone();
    *frame.borrow_mut() = Some(Closure::new(move || {
        field.borrow_mut().tick();
        if let Err(e) = request_frame(&loop_window, &next) {
            log::error!("Particle animation stopped: {:?}", e);
        }
    }));

    request_frame(window, &frame)?;
    Ok(())
}
