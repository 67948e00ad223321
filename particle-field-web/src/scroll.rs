//! Same-page anchor scrolling.

/// A same-page anchor worth scrolling to: anything but an empty or bare `#` href.
pub fn scroll_target(href: Option<&str>) -> Option<&str> {
    href.filter(|h| !h.is_empty() && *h != "#")
}
