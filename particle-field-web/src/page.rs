//! One-shot DOM wiring for the page enhancements.
//!
//! Every function here looks up its markup and returns `Ok(())` when there is
//! none. Listeners live for the lifetime of the page, so their closures are
//! leaked with [`Closure::forget`].

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, RequestCache, RequestInit, Response,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

use crate::{collapse, parallax, scroll, template, theme};

// ============================================================================
// Helpers
// ============================================================================

fn document(window: &Window) -> Result<Document, JsValue> {
    window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn on_click(element: &Element, handler: impl FnMut(Event) + 'static) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn attribute(element: &Element, name: &str) -> Option<String> {
    element.get_attribute(name).filter(|value| !value.is_empty())
}

/// Call `on_visible` once per element, the first time it scrolls into view.
/// Without IntersectionObserver every element is handled immediately.
fn when_visible(
    window: &Window,
    elements: Vec<Element>,
    threshold: Option<f64>,
    on_visible: fn(&Element),
) -> Result<(), JsValue> {
    let supported = js_sys::Reflect::has(window, &JsValue::from_str("IntersectionObserver"))
        .unwrap_or(false);
    if !supported {
        elements.iter().for_each(on_visible);
        return Ok(());
    }

    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if entry.is_intersecting() {
                    let target = entry.target();
                    on_visible(&target);
                    observer.unobserve(&target);
                }
            }
        },
    );

    let observer = match threshold {
        Some(threshold) => {
            let options = IntersectionObserverInit::new();
            options.set_threshold(&JsValue::from_f64(threshold));
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?
        }
        None => IntersectionObserver::new(callback.as_ref().unchecked_ref())?,
    };
    callback.forget();

    for element in &elements {
        observer.observe(element);
    }
    Ok(())
}

// ============================================================================
// Enhancements
// ============================================================================

/// Write the current year into every `[data-year]` element.
pub fn inject_year(window: &Window) -> Result<(), JsValue> {
    let elements = query_all(&document(window)?, "[data-year]")?;
    if elements.is_empty() {
        return Ok(());
    }
    let year = js_sys::Date::new_0().get_full_year().to_string();
    for element in elements {
        element.set_text_content(Some(&year));
    }
    Ok(())
}

/// Smoothly scroll same-page anchors to their target and record the hash.
pub fn smooth_scroll(window: &Window) -> Result<(), JsValue> {
    let document = document(window)?;
    for anchor in query_all(&document, r##"a[href^="#"]"##)? {
        let link = anchor.clone();
        let document = document.clone();
        let window = window.clone();
        on_click(&anchor, move |event| {
            let href = link.get_attribute("href");
            let Some(href) = scroll::scroll_target(href.as_deref()) else {
                return;
            };
            let Ok(Some(target)) = document.query_selector(href) else {
                return;
            };
            event.prevent_default();

            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            target.scroll_into_view_with_scroll_into_view_options(&options);

            if let Ok(history) = window.history() {
                let _ = history.push_state_with_url(&JsValue::NULL, "", Some(href));
            }
        })?;
    }
    Ok(())
}

/// Apply the stored theme and flip it on `[data-theme-toggle]` clicks.
pub fn theme_toggle(window: &Window) -> Result<(), JsValue> {
    let document = document(window)?;
    let Some(toggle) = document.query_selector("[data-theme-toggle]")? else {
        return Ok(());
    };
    let Some(html) = document.document_element() else {
        return Ok(());
    };

    let storage = window.local_storage().ok().flatten();
    if let Some(preferred) = storage
        .as_ref()
        .and_then(|s| s.get_item(theme::STORAGE_KEY).ok().flatten())
        .filter(|theme| !theme.is_empty())
    {
        html.set_attribute(theme::THEME_ATTRIBUTE, &preferred)?;
    }

    on_click(&toggle, move |_| {
        let current = html.get_attribute(theme::THEME_ATTRIBUTE);
        let next = theme::toggled(current.as_deref());
        if let Err(e) = html.set_attribute(theme::THEME_ATTRIBUTE, next) {
            log::warn!("Failed to set theme: {:?}", e);
        }
        if let Some(storage) = &storage {
            let _ = storage.set_item(theme::STORAGE_KEY, next);
        }
    })
}

fn load_image(img: &Element) {
    if attribute(img, "src").is_some() {
        return;
    }
    let Some(src) = attribute(img, "data-src") else {
        return;
    };
    if img.set_attribute("src", &src).is_ok() {
        let _ = img.remove_attribute("data-src");
    }
}

/// Load `img[data-src]` when the image scrolls into view.
pub fn lazy_images(window: &Window) -> Result<(), JsValue> {
    let images = query_all(&document(window)?, "img[data-src]")?;
    if images.is_empty() {
        return Ok(());
    }
    when_visible(window, images, None, load_image)
}

/// Toggle the panel named by `[data-toggle-target]` on click.
pub fn collapsibles(window: &Window) -> Result<(), JsValue> {
    let document = document(window)?;
    for trigger in query_all(&document, "[data-toggle-target]")? {
        let source = trigger.clone();
        let document = document.clone();
        on_click(&trigger, move |event| {
            let Some(selector) = attribute(&source, "data-toggle-target") else {
                return;
            };
            let Ok(Some(target)) = document.query_selector(&selector) else {
                return;
            };
            event.prevent_default();

            let Some(panel) = target.dyn_ref::<HtmlElement>() else {
                return;
            };
            let style = panel.style();
            let display = style.get_property_value("display").unwrap_or_default();
            let hidden = collapse::is_hidden(panel.get_attribute("aria-hidden").as_deref(), &display);
            let (display, aria_hidden) = collapse::toggled(hidden);
            let _ = style.set_property("display", display);
            let _ = panel.set_attribute("aria-hidden", aria_hidden);
        })?;
    }
    Ok(())
}

async fn fetch_json(window: &Window, url: &str) -> Result<serde_json::Value, JsValue> {
    let init = RequestInit::new();
    init.set_cache(RequestCache::NoStore);
    let response: Response = JsFuture::from(window.fetch_with_str_and_init(url, &init))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!("Failed to fetch: {}", url)));
    }
    let text = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("response body is not text"))?;
    serde_json::from_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn fill_list(document: &Document, list: &Element, items: Vec<String>) -> Result<(), JsValue> {
    let fragment = document.create_document_fragment();
    for html in items {
        let container = document.create_element("div")?;
        container.set_inner_html(&html);
        while let Some(child) = container.first_child() {
            fragment.append_child(&child)?;
        }
    }
    list.set_inner_html("");
    list.append_child(&fragment)?;
    Ok(())
}

/// Render `[data-list-src][data-list-template]` lists from fetched JSON.
pub fn data_lists(window: &Window) -> Result<(), JsValue> {
    let document = document(window)?;
    for list in query_all(&document, "[data-list-src][data-list-template]")? {
        let (Some(src), Some(template_selector)) = (
            attribute(&list, "data-list-src"),
            attribute(&list, "data-list-template"),
        ) else {
            continue;
        };
        let Some(template_element) = document.query_selector(&template_selector)? else {
            continue;
        };

        let window = window.clone();
        let document = document.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let rendered = fetch_json(&window, &src).await.and_then(|items| {
                match template::render_all(&template_element.inner_html(), &items) {
                    Some(html) => fill_list(&document, &list, html),
                    None => Ok(()),
                }
            });
            if let Err(e) = rendered {
                log::error!("List render error: {:?}", e);
            }
        });
    }
    Ok(())
}

/// Add `is-visible` to `[data-reveal]` elements the first time they show.
pub fn scroll_reveal(window: &Window) -> Result<(), JsValue> {
    let elements = query_all(&document(window)?, "[data-reveal]")?;
    if elements.is_empty() {
        return Ok(());
    }
    when_visible(window, elements, Some(0.15), |element| {
        let _ = element.class_list().add_1("is-visible");
    })
}

fn apply_parallax(window: &Window, elements: &[HtmlElement]) {
    let height = window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0);
    for element in elements {
        let speed = parallax::speed(element.get_attribute("data-parallax-speed").as_deref());
        let rect = element.get_bounding_client_rect();
        if !parallax::is_visible(rect.top(), rect.bottom(), height) {
            continue;
        }
        let offset = parallax::offset(rect.top(), height, speed);
        let _ = element
            .style()
            .set_property("transform", &parallax::transform(offset));
    }
}

/// Shift `[data-parallax]` elements with scroll, at most once per frame.
pub fn parallax(window: &Window) -> Result<(), JsValue> {
    let elements: Vec<HtmlElement> = query_all(&document(window)?, "[data-parallax]")?
        .into_iter()
        .filter_map(|element| element.dyn_into().ok())
        .collect();
    if elements.is_empty() {
        return Ok(());
    }
    let elements = Rc::new(elements);
    let ticking = Rc::new(Cell::new(false));

    let update = {
        let window = window.clone();
        let elements = elements.clone();
        let ticking = ticking.clone();
        Closure::<dyn FnMut()>::new(move || {
            apply_parallax(&window, &elements);
            ticking.set(false);
        })
    };

    let on_scroll = {
        let window = window.clone();
        Closure::<dyn FnMut()>::new(move || {
            if ticking.get() {
                return;
            }
            match window.request_animation_frame(update.as_ref().unchecked_ref()) {
                Ok(_) => ticking.set(true),
                Err(e) => log::warn!("Parallax frame request failed: {:?}", e),
            }
        })
    };
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    window.add_event_listener_with_callback_and_add_event_listener_options(
        "scroll",
        on_scroll.as_ref().unchecked_ref(),
        &options,
    )?;
    on_scroll.forget();

    apply_parallax(window, &elements);
    Ok(())
}
