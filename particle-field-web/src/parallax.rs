//! Scroll-driven parallax offsets.

/// Speed used when `data-parallax-speed` is missing or not a number.
pub const DEFAULT_SPEED: f64 = 0.2;

/// Parse a `data-parallax-speed` value.
///
/// Like `parseFloat`, leading whitespace is skipped and the longest numeric
/// prefix is used, so `"0.5x"` is `0.5`.
pub fn speed(attribute: Option<&str>) -> f64 {
    attribute
        .and_then(numeric_prefix)
        .filter(|s| !s.is_nan())
        .unwrap_or(DEFAULT_SPEED)
}

fn numeric_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    (1..=s.len())
        .rev()
        .filter(|&end| s.is_char_boundary(end))
        .find_map(|end| {
            let prefix = &s[..end];
            // Rust also accepts "inf"/"nan" spellings that parseFloat does not.
            if prefix.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
                return None;
            }
            prefix.parse::<f64>().ok()
        })
}

/// Whether an element spanning `top..bottom` overlaps a viewport of `height`.
pub fn is_visible(top: f64, bottom: f64, height: f64) -> bool {
    top < height && bottom > 0.0
}

/// Vertical offset of an element whose top edge is at `top`.
pub fn offset(top: f64, height: f64, speed: f64) -> f64 {
    (top - height / 2.0) * speed
}

/// CSS transform for an offset, printed to one decimal.
pub fn transform(offset: f64) -> String {
    format!("translate3d(0,{:.1}px,0)", offset)
}
