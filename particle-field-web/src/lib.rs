//! Browser host for the particle field.
//!
//! Built as a `cdylib` for `wasm32-unknown-unknown`, the module wires up the
//! page once the DOM is ready: the background [`particle_field::ParticleField`]
//! on `#bg-particles` plus a handful of progressive enhancements driven by
//! `data-*` attributes. Each enhancement is independent; one that fails is
//! logged and the rest still run.
//!
//! The attribute-level logic (template rendering, theme and panel toggling,
//! parallax math) lives in plain modules that build and test natively.

pub mod collapse;
pub mod parallax;
pub mod scroll;
pub mod template;
pub mod theme;

#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod page;
#[cfg(target_arch = "wasm32")]
mod particles;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
type Step = fn(&web_sys::Window) -> Result<(), JsValue>;

#[cfg(target_arch = "wasm32")]
const STEPS: [(&str, Step); 9] = [
    ("year", page::inject_year),
    ("smooth scroll", page::smooth_scroll),
    ("theme toggle", page::theme_toggle),
    ("lazy images", page::lazy_images),
    ("collapsibles", page::collapsibles),
    ("data lists", page::data_lists),
    ("scroll reveal", page::scroll_reveal),
    ("parallax", page::parallax),
    ("particles", particles::init),
];

#[cfg(target_arch = "wasm32")]
fn enhance(window: &web_sys::Window) {
    for (name, step) in STEPS {
        if let Err(e) = step(window) {
            log::error!("Initialization error ({}): {:?}", name, e);
        }
    }
}

// ============================================================================
// WASM entry point
// ============================================================================

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Redirect panic messages to console.error
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() != "loading" {
        enhance(&window);
        return Ok(());
    }

    let ready_window = window.clone();
    let on_ready = Closure::once(move || enhance(&ready_window));
    document.add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())?;
    on_ready.forget();
    Ok(())
}
