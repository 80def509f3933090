//! Attaches every item to its parent's `children`.
//!
//! Items are allocated in pre-order, so a single pass in allocation order
//! sees each parent before its children and keeps children in source order.

use crate::diagnostics::{DiagnosticKind, Diagnostics};

use super::item::{ItemArena, ItemId};

pub fn collapse(items: &mut ItemArena, diagnostics: &mut Diagnostics) {
    for index in 0..items.len() {
        let id = ItemId::new(index as u32);
        let Some(item) = items.get(id) else {
            continue;
        };
        let Some(parent) = item.parent else {
            continue;
        };
        let range = item.range;

        if parent == id {
            diagnostics
                .report(DiagnosticKind::StructuralInconsistency, range)
                .message(format!("item {} is its own parent", id))
                .emit();
            continue;
        }

        let Some(parent_item) = items.get_mut(parent) else {
            diagnostics
                .report(DiagnosticKind::StructuralInconsistency, range)
                .message(format!("parent {} of item {} does not exist", parent, id))
                .emit();
            continue;
        };

        parent_item.children.push(id);
        tracing::trace!(item = %id, parent = %parent, "attached");
    }
}
