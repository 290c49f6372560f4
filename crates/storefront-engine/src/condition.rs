//! Visibility predicate evaluation.

use schema::{Condition, Map, Operator, Value};

use crate::{
    binding::resolve,
    diagnostics::{DiagnosticKind, Diagnostics},
};

/// Strict equality; numbers compare by value so `1` equals `1.0`.
fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Equality where `None` models a missing value, distinct from `null`.
fn same(actual: Option<&Value>, expected: Option<&Value>) -> bool {
    match (actual, expected) {
        (None, None) => true,
        (Some(a), Some(b)) => strict_eq(a, b),
        _ => false,
    }
}

/// Missing, `null`, blank string or empty list.
fn is_empty(actual: Option<&Value>) -> bool {
    match actual {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Numeric comparison; any non-number operand yields `false`.
fn numeric(actual: Option<&Value>, expected: Option<&Value>, cmp: fn(f64, f64) -> bool) -> bool {
    match (actual.and_then(Value::as_f64), expected.and_then(Value::as_f64)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// Evaluate `condition` against the data and context channels.
///
/// An unknown operator evaluates to `false` and records a diagnostic.
pub(crate) fn evaluate(
    condition: &Condition,
    data: &Map,
    context: &Map,
    diag: &mut Diagnostics,
) -> bool {
    let actual = resolve(&condition.field, data, context);
    let expected = condition.value.as_ref();
    match &condition.op {
        Operator::Equals => same(actual, expected),
        Operator::NotEquals => !same(actual, expected),
        Operator::Empty => is_empty(actual),
        Operator::NotEmpty => !is_empty(actual),
        Operator::Gt => numeric(actual, expected, |a, b| a > b),
        Operator::Lt => numeric(actual, expected, |a, b| a < b),
        Operator::Gte => numeric(actual, expected, |a, b| a >= b),
        Operator::Lte => numeric(actual, expected, |a, b| a <= b),
        Operator::Contains => match (actual, expected) {
            (Some(Value::String(hay)), Some(Value::String(needle))) => hay.contains(needle.as_str()),
            (Some(Value::Array(items)), Some(needle)) => items.iter().any(|v| strict_eq(v, needle)),
            _ => false,
        },
        Operator::Unknown(name) => {
            diag.push(
                DiagnosticKind::UnknownOperator,
                format!("unknown condition operator `{name}` on field `{}`", condition.field),
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn check(cond: Value, data: Value) -> bool {
        let cond: Condition = serde_json::from_value(cond).unwrap();
        let Value::Object(data) = data else {
            panic!("data must be an object")
        };
        let mut diag = Diagnostics::new(true);
        evaluate(&cond, &data, &Map::new(), &mut diag)
    }

    #[test]
    fn equality() {
        assert!(check(json!({"field": "a", "op": "equals", "value": 1}), json!({"a": 1.0})));
        assert!(!check(json!({"field": "a", "op": "equals", "value": "1"}), json!({"a": 1})));
        assert!(check(json!({"field": "a", "op": "not_equals", "value": 2}), json!({"a": 1})));
        // missing field vs missing value
        assert!(check(json!({"field": "zz", "op": "equals"}), json!({})));
        assert!(!check(json!({"field": "zz", "op": "equals", "value": null}), json!({})));
    }

    #[test]
    fn emptiness() {
        assert!(check(json!({"field": "s", "op": "empty"}), json!({"s": "   "})));
        assert!(check(json!({"field": "l", "op": "empty"}), json!({"l": []})));
        assert!(check(json!({"field": "missing", "op": "empty"}), json!({})));
        assert!(check(json!({"field": "n", "op": "not_empty"}), json!({"n": 0})));
        assert!(!check(json!({"field": "n", "op": "not_empty"}), json!({"n": null})));
    }

    #[test]
    fn ordering_requires_numbers() {
        assert!(check(json!({"field": "c", "op": "gt", "value": 0}), json!({"c": 3})));
        assert!(!check(json!({"field": "c", "op": "gt", "value": 0}), json!({"c": "3"})));
        assert!(check(json!({"field": "c", "op": "lte", "value": 3}), json!({"c": 3})));
        assert!(!check(json!({"field": "c", "op": "lt", "value": 3}), json!({"c": 3})));
        assert!(check(json!({"field": "c", "op": "gte", "value": 3}), json!({"c": 3})));
    }

    #[test]
    fn contains() {
        assert!(check(json!({"field": "t", "op": "contains", "value": "sale"}), json!({"t": "big sale"})));
        assert!(check(json!({"field": "t", "op": "contains", "value": 2}), json!({"t": [1, 2]})));
        assert!(!check(json!({"field": "t", "op": "contains", "value": 2}), json!({"t": 12})));
    }

    #[test]
    fn unknown_operator_is_false_with_diagnostic() {
        let cond: Condition =
            serde_json::from_value(json!({"field": "a", "op": "between", "value": 1})).unwrap();
        let mut diag = Diagnostics::new(true);
        assert!(!evaluate(&cond, &Map::new(), &Map::new(), &mut diag));
        let items = diag.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, DiagnosticKind::UnknownOperator);
    }
}
