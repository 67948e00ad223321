//! Collapsible panel state.

/// A panel counts as hidden when `aria-hidden` is `"true"` or its inline
/// `display` is `none`.
pub fn is_hidden(aria_hidden: Option<&str>, display: &str) -> bool {
    aria_hidden == Some("true") || display == "none"
}

/// Inline `display` and `aria-hidden` to apply when toggling a panel.
pub fn toggled(hidden: bool) -> (&'static str, &'static str) {
    if hidden {
        ("", "false")
    } else {
        ("none", "true")
    }
}
