//! Repeater expansion: one template rendered per collection element.

use schema::{Block, Map, RepeaterSpec, Value};

use crate::{
    binding::{display, is_truthy, resolve},
    diagnostics::DiagnosticKind,
    node::Node,
    render::{RenderCx, set_key},
    scope::{Scope, child_path},
};

/// Stable sibling key for a collection element: its `id`, else its `name`
/// with the position, else the position alone.
pub(crate) fn item_key(item: &Value, index: usize, iterator: &str) -> String {
    let field = |name: &str| {
        item.get(name)
            .filter(|v| is_truthy(v))
            .and_then(display)
    };
    if let Some(id) = field("id") {
        format!("{iterator}-{id}")
    } else if let Some(name) = field("name") {
        format!("{iterator}-{name}-{index}")
    } else {
        format!("{iterator}-{index}")
    }
}

/// Template and collection of a repeater, or `None` after recording why not.
pub(crate) fn collection<'s>(
    cx: &mut dyn RenderCx,
    spec: &'s RepeaterSpec,
    scope: &Scope<'s>,
) -> Option<(&'s Block, &'s [Value])> {
    let (Some(source), Some(template)) = (spec.source.as_deref(), spec.template.as_deref()) else {
        cx.diag(
            DiagnosticKind::MissingTemplate,
            "repeater without `source` or `template`".to_string(),
        );
        return None;
    };
    match resolve(source, scope.data, scope.context) {
        Some(Value::Array(items)) if !items.is_empty() => Some((template, items.as_slice())),
        Some(Value::Array(_)) => {
            cx.diag(
                DiagnosticKind::EmptySource,
                format!("repeater source `{source}` is empty"),
            );
            None
        }
        Some(_) => {
            cx.diag(
                DiagnosticKind::EmptySource,
                format!("repeater source `{source}` is not a list"),
            );
            None
        }
        None => {
            cx.diag(
                DiagnosticKind::EmptySource,
                format!("repeater source `{source}` not found"),
            );
            None
        }
    }
}

/// Item context: the parent context plus the element under the iterator
/// name and, when requested, its position under the index name.
pub(crate) fn item_context(parent: &Map, spec: &RepeaterSpec, item: &Value, index: usize) -> Map {
    let mut ctx = parent.clone();
    ctx.insert(spec.iterator.clone(), item.clone());
    if let Some(name) = &spec.index {
        ctx.insert(name.clone(), Value::from(index));
    }
    ctx
}

/// Expand the template once per element into a fragment of keyed siblings.
pub(crate) fn render(cx: &mut dyn RenderCx, spec: &RepeaterSpec, scope: Scope<'_>) -> Option<Node> {
    let (template, items) = collection(cx, spec, &scope)?;
    let mut children = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let ctx = item_context(scope.context, spec, item, index);
        let path = child_path(scope.path, index);
        if let Some(mut node) = cx.render_block(template, scope.with_context(&ctx).at(&path)) {
            set_key(&mut node, item_key(item, index, &spec.iterator));
            children.push(node);
        }
    }
    Some(Node::Fragment { children })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn keys_prefer_id_then_name() {
        assert_eq!(item_key(&json!({"id": 7, "name": "x"}), 0, "product"), "product-7");
        assert_eq!(item_key(&json!({"name": "Shoes"}), 2, "cat"), "cat-Shoes-2");
        assert_eq!(item_key(&json!({"id": ""}), 1, "item"), "item-1");
        assert_eq!(item_key(&json!("plain"), 3, "item"), "item-3");
    }

    #[test]
    fn item_context_injects_iterator_and_index() {
        let spec = RepeaterSpec {
            source: Some("items".into()),
            iterator: "product".into(),
            index: Some("i".into()),
            template: None,
        };
        let parent = json!({"shop": "s"}).as_object().cloned().unwrap();
        let ctx = item_context(&parent, &spec, &json!({"id": 1}), 4);
        assert_eq!(ctx["shop"], "s");
        assert_eq!(ctx["product"]["id"], 1);
        assert_eq!(ctx["i"], 4);
    }
}
