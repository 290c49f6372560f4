//! Dotted-path binding resolution against the data and context channels.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use schema::{Map, Value};

/// `items[0]` index segments.
static INDEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(\d+)\]").unwrap());

/// Rewrite `items[0].name` as `items.0.name`.
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    INDEX_RE.replace_all(path, ".$1")
}

/// Walk `path` from `root`. Array elements are addressed by numeric segments.
fn walk<'a>(root: &'a Map, segments: &[&str]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let mut current = root.get(*first)?;
    for seg in rest {
        current = match current {
            Value::Object(map) => map.get(*seg)?,
            Value::Array(items) => items.get(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Resolve `path` against `data`, falling back to `context`.
///
/// The leading segment picks the source: when it names a key of `data` the
/// whole path is walked from `data`, otherwise from `context`. Missing
/// segments yield `None`; absence is a normal outcome, never an error.
pub fn resolve<'a>(path: &str, data: &'a Map, context: &'a Map) -> Option<&'a Value> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    let normalized = normalize_path(path);
    let segments: Vec<&str> = normalized.split('.').filter(|s| !s.is_empty()).collect();
    let first = segments.first()?;
    if data.contains_key(*first) {
        walk(data, &segments)
    } else {
        walk(context, &segments)
    }
}

/// Text form of a value as it would appear in rendered output.
///
/// `null` has no text form. Integral floats print without a fraction.
pub fn display(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if !n.is_i64() && !n.is_u64() => format_number(f),
            _ => n.to_string(),
        }),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|v| display(v).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some("[object Object]".to_string()),
    }
}

/// Format a float the way a browser would print it.
pub fn format_number(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else {
        format!("{f}")
    }
}

/// Falsy values: `null`, `false`, `0`, `""`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Resolve a binding to non-empty text, or `None`.
pub fn resolve_text(path: &str, data: &Map, context: &Map) -> Option<String> {
    resolve(path, data, context)
        .filter(|v| is_truthy(v))
        .and_then(display)
}

/// Resolve a binding that must produce a non-empty string (URLs).
pub fn resolve_str(path: &str, data: &Map, context: &Map) -> Option<String> {
    match resolve(path, data, context)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
