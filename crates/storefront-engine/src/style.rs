//! Block style conversion: static entries, bound values and `bind_style` forms.

use once_cell::sync::Lazy;
use regex::Regex;
use schema::{Block, Map, Value};

use crate::{
    binding::{display, format_number, is_truthy, resolve},
    node::Style,
};

/// Value prefixes that mark a static style entry as a binding.
pub const BINDING_PREFIXES: &[&str] = &[
    "slide.", "item.", "product.", "category.", "review.", "post.", "brand.",
];

/// CSS properties that take bare numbers.
const UNITLESS: &[&str] = &[
    "animation-iteration-count",
    "column-count",
    "columns",
    "fill-opacity",
    "flex",
    "flex-grow",
    "flex-shrink",
    "font-weight",
    "grid-column",
    "grid-row",
    "line-height",
    "opacity",
    "order",
    "orphans",
    "stroke-opacity",
    "tab-size",
    "widows",
    "z-index",
    "zoom",
];

/// `path / 12.5`
static DIV_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z_][a-zA-Z0-9_.]*)\s*/\s*(\d+(?:\.\d+)?)$").unwrap());
/// `path * 12.5`
static MUL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z_][a-zA-Z0-9_.]*)\s*\*\s*(\d+(?:\.\d+)?)$").unwrap());

/// Whether a static style value should be resolved as a binding.
pub fn is_style_binding(value: &str) -> bool {
    BINDING_PREFIXES.iter().any(|p| value.starts_with(p))
}

/// `background_color` / `backgroundColor` to `background-color`.
pub fn css_property(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        match c {
            '_' => out.push('-'),
            c if c.is_ascii_uppercase() => {
                out.push('-');
                out.push(c.to_ascii_lowercase());
            }
            c => out.push(c),
        }
    }
    out
}

/// CSS text for a value under `property`. Non-zero numbers gain `px` unless unitless.
pub fn css_value(property: &str, value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => {
            let f = n.as_f64()?;
            let text = display(value).unwrap_or_else(|| format_number(f));
            if f == 0.0 || UNITLESS.contains(&property) {
                Some(text)
            } else {
                Some(format!("{text}px"))
            }
        }
        Value::Null | Value::Object(_) | Value::Array(_) => None,
        other => display(other),
    }
}

/// Evaluate a style expression: `path / n`, `path * n`, or a bare binding.
pub fn evaluate_expression(expr: &str, data: &Map, context: &Map) -> Option<Value> {
    let expr = expr.trim();
    for (re, op) in [(&*DIV_RE, '/'), (&*MUL_RE, '*')] {
        if let Some(caps) = re.captures(expr) {
            let Some(value) = resolve(&caps[1], data, context).and_then(Value::as_f64) else {
                continue;
            };
            let Ok(operand) = caps[2].parse::<f64>() else {
                continue;
            };
            let result = if op == '/' { value / operand } else { value * operand };
            return serde_json::Number::from_f64(result).map(Value::Number);
        }
    }
    if is_style_binding(expr) {
        return resolve(expr, data, context).cloned();
    }
    None
}

/// Apply one `bind_style` entry.
fn apply_bound(style: &mut Style, property: &str, spec: &Value, data: &Map, context: &Map) {
    match spec {
        Value::Object(obj) if obj.get("type").and_then(Value::as_str) == Some("gradient") => {
            let (Some(start), Some(end)) = (
                obj.get("start").and_then(Value::as_str),
                obj.get("end").and_then(Value::as_str),
            ) else {
                return;
            };
            let start = resolve(start, data, context).filter(|v| is_truthy(v)).and_then(display);
            let end = resolve(end, data, context).filter(|v| is_truthy(v)).and_then(display);
            let direction = obj
                .get("direction")
                .and_then(Value::as_str)
                .unwrap_or("to right");
            if let (Some(start), Some(end)) = (start, end) {
                style.set(property, format!("linear-gradient({direction}, {start}, {end})"));
            }
        }
        Value::Object(obj) if obj.get("expr").is_some_and(Value::is_string) => {
            let expr = obj.get("expr").and_then(Value::as_str).unwrap_or_default();
            if let Some(css) = evaluate_expression(expr, data, context)
                .and_then(|v| css_value(property, &v))
            {
                style.set(property, css);
            }
        }
        Value::Object(obj) => {
            let (Some(field), Some(transform)) = (
                obj.get("field").and_then(Value::as_str),
                obj.get("transform").and_then(Value::as_str),
            ) else {
                return;
            };
            let Some(n) = resolve(field, data, context).and_then(Value::as_f64) else {
                return;
            };
            let css = match transform {
                "divide_100" => format_number(n / 100.0),
                "multiply_100" => format_number(n * 100.0),
                "percent" => format!("{}%", format_number(n)),
                "px" => format!("{}px", format_number(n)),
                _ => format_number(n),
            };
            style.set(property, css);
        }
        Value::String(path) => {
            if let Some(css) = resolve(path, data, context).and_then(|v| css_value(property, v)) {
                style.set(property, css);
            }
        }
        _ => {}
    }
}

/// Compute the inline style of `block` under the given data and context.
pub fn compute(block: &Block, data: &Map, context: &Map) -> Style {
    compute_from(&block.style, &block.bind_style, data, context)
}

/// Compute a style from explicit static and bound entries.
pub fn compute_from(static_style: &Map, bind_style: &Map, data: &Map, context: &Map) -> Style {
    let mut style = Style::new();
    for (key, value) in static_style {
        let property = css_property(key);
        let resolved = match value {
            Value::String(s) if is_style_binding(s) => resolve(s, data, context)
                .filter(|v| !v.is_null())
                .unwrap_or(value),
            _ => value,
        };
        if let Some(css) = css_value(&property, resolved) {
            style.set(property, css);
        }
    }
    for (key, spec) in bind_style {
        apply_bound(&mut style, &css_property(key), spec, data, context);
    }
    style
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn obj(v: Value) -> Map {
        match v {
            Value::Object(m) => m,
            _ => Map::new(),
        }
    }

    #[test]
    fn property_names_and_units() {
        assert_eq!(css_property("background_color"), "background-color");
        assert_eq!(css_property("zIndex"), "z-index");
        assert_eq!(css_value("width", &json!(12)).as_deref(), Some("12px"));
        assert_eq!(css_value("width", &json!(0)).as_deref(), Some("0"));
        assert_eq!(css_value("opacity", &json!(0.5)).as_deref(), Some("0.5"));
        assert_eq!(css_value("z-index", &json!(10)).as_deref(), Some("10"));
    }

    #[test]
    fn static_bindings_resolve_with_literal_fallback() {
        let ctx = obj(json!({"slide": {"bg": "#111"}}));
        let style = compute_from(
            &obj(json!({"background_color": "slide.bg", "color": "slide.missing", "padding": "4px"})),
            &Map::new(),
            &Map::new(),
            &ctx,
        );
        assert_eq!(style.get("background-color"), Some("#111"));
        assert_eq!(style.get("color"), Some("slide.missing"));
        assert_eq!(style.get("padding"), Some("4px"));
    }

    #[test]
    fn bind_style_forms() {
        let ctx = obj(json!({"slide": {"from": "#000", "to": "#fff", "overlay": 40, "w": 30}}));
        let style = compute_from(
            &Map::new(),
            &obj(json!({
                "background": {"type": "gradient", "start": "slide.from", "end": "slide.to"},
                "opacity": {"expr": "slide.overlay / 100"},
                "width": {"field": "slide.w", "transform": "percent"},
                "height": "slide.w"
            })),
            &Map::new(),
            &ctx,
        );
        assert_eq!(style.get("background"), Some("linear-gradient(to right, #000, #fff)"));
        assert_eq!(style.get("opacity"), Some("0.4"));
        assert_eq!(style.get("width"), Some("30%"));
        assert_eq!(style.get("height"), Some("30px"));
    }

    #[test]
    fn expressions() {
        let data = obj(json!({"item": {"x": 5}}));
        let empty = Map::new();
        assert_eq!(evaluate_expression("item.x * 2", &data, &empty), Some(json!(10.0)));
        assert_eq!(evaluate_expression("item.x", &data, &empty), Some(json!(5)));
        assert_eq!(evaluate_expression("x + 1", &data, &empty), None);
    }
}
