//! Light/dark theme toggling.

/// Local storage key holding the chosen theme.
pub const STORAGE_KEY: &str = "site-theme";

/// The `data-theme` attribute on `<html>`.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// The theme to switch to from `current`.
///
/// A missing attribute counts as `light`. Anything other than `dark`
/// switches to `dark`.
pub fn toggled(current: Option<&str>) -> &'static str {
    match current.unwrap_or("light") {
        "dark" => "light",
        _ => "dark",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        assert_eq!(toggled(None), "dark");
        assert_eq!(toggled(Some("light")), "dark");
        assert_eq!(toggled(Some("dark")), "light");
        assert_eq!(toggled(Some("sepia")), "dark");
    }
}
