//! Renders the collapsed item tree as canonical query text.
//!
//! Rendering is bottom-up: a child's text is produced first and handed to the
//! parent's aggregation template as its expression.

use crate::diagnostics::{DiagnosticKind, Diagnostics};

use super::item::{ItemArena, ItemId, Payload};

/// Canonical text of the whole tree. Empty when there is nothing to render.
pub fn render_query(items: &ItemArena, diagnostics: &mut Diagnostics) -> String {
    let roots: Vec<ItemId> = items.roots().collect();
    let Some(&root) = roots.first() else {
        return String::new();
    };

    for &extra in &roots[1..] {
        if let Some(item) = items.get(extra) {
            diagnostics
                .report(DiagnosticKind::StructuralInconsistency, item.range)
                .message(format!(
                    "query has {} top-level expressions, only the first is rendered",
                    roots.len()
                ))
                .emit();
        }
    }

    render_item(items, root, diagnostics)
}

/// Text of one item and its subtree.
///
/// Only an aggregation with exactly one child renders into its parent, so the
/// rendered part of any subtree is a chain. It is followed down to its end and
/// then wrapped back up, without recursion.
pub fn render_item(items: &ItemArena, id: ItemId, diagnostics: &mut Diagnostics) -> String {
    let mut chain = Vec::new();
    let mut current = id;
    while let Some(item) = items.get(current) {
        match (&item.payload, item.children.as_slice()) {
            (Payload::Aggregation(_), [child]) => {
                chain.push(current);
                current = *child;
            }
            _ => break,
        }
    }

    let mut text = render_end(items, current, diagnostics);
    while let Some(id) = chain.pop() {
        if let Some(Payload::Aggregation(pending)) = items.get(id).map(|item| &item.payload) {
            text = pending.op.render(&pending.params(text));
            tracing::trace!(item = %id, text = %text, "rendered");
        }
    }
    text
}

/// Text of the item that ends a chain: a selector, or an aggregation with no
/// child or several.
fn render_end(items: &ItemArena, id: ItemId, diagnostics: &mut Diagnostics) -> String {
    let Some(item) = items.get(id) else {
        return String::new();
    };

    let text = match &item.payload {
        Payload::Leaf(selector) => {
            if !item.children.is_empty() {
                diagnostics
                    .report(DiagnosticKind::StructuralInconsistency, item.range)
                    .message("a selector cannot have nested expressions")
                    .emit();
                return String::new();
            }
            selector.to_string()
        }
        Payload::Aggregation(pending) => {
            if item.children.len() > 1 {
                diagnostics
                    .report(DiagnosticKind::StructuralInconsistency, item.range)
                    .message(format!(
                        "`{}` aggregates {} expressions, expected one",
                        pending.op,
                        item.children.len()
                    ))
                    .emit();
                return String::new();
            }
            pending.op.render(&pending.params(String::new()))
        }
    };

    tracing::trace!(item = %id, text = %text, "rendered");
    text
}
