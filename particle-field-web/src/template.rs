//! `{{key}}` substitution for data-driven lists.

use serde_json::Value;

/// Render one list item.
///
/// Every `{{key}}` whose key is made of ASCII letters, digits and `_` is
/// replaced by the item's value for that key, printed by [`js_string`].
/// Missing keys render as nothing. Braces that do not form such a
/// placeholder are copied unchanged.
pub fn render(template: &str, item: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match placeholder_key(after) {
            Some(key) => {
                push_value(&mut out, item.get(key));
                rest = &after[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &rest[open + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// The key of a placeholder starting right after `{{`, if it is closed by `}}`.
fn placeholder_key(s: &str) -> Option<&str> {
    let end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(s.len());
    if end == 0 || !s[end..].starts_with("}}") {
        return None;
    }
    Some(&s[..end])
}

fn push_value(out: &mut String, value: Option<&Value>) {
    if let Some(value) = value {
        out.push_str(&js_string(value));
    }
}

/// Text of a JSON value as the page's own scripts would print it.
///
/// Numbers use the shortest round-trip digits, with no trailing `.0` and
/// exponent notation outside `1e-6..1e21`. Arrays join their elements with
/// `,` and objects print as `[object Object]`.
pub fn js_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        // Integers in JSON never reach 1e21, so only floats need JS formatting.
        Value::Number(n) if n.is_f64() => n.as_f64().map(js_number).unwrap_or_default(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(js_string).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".into(),
    }
}

fn js_number(n: f64) -> String {
    if n == 0.0 {
        return "0".into();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }
    // `{:e}` gives `1e21`, `1.5e-7`; the positive exponent needs a sign.
    let text = format!("{:e}", n);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}

/// Render every item of a JSON array. Returns `None` for anything else.
pub fn render_all(template: &str, items: &Value) -> Option<Vec<String>> {
    let items = items.as_array()?;
    Some(items.iter().map(|item| render(template, item)).collect())
}
