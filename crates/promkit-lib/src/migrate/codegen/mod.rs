//! Builder code generation for selector-only queries.
//!
//! A query that migrates to a single selector becomes a function: every label
//! of the selector turns into an optional parameter, and the label's matcher
//! stays in place as a default with an empty value.

pub mod rust;
pub mod typescript;

#[cfg(test)]
mod typescript_tests;

pub use rust::{RustCodegenConfig, emit_rust};
pub use typescript::{TypeScriptCodegenConfig, emit_typescript};

use indexmap::IndexSet;
use promkit_core::{LabelSelector, SelectorExpression};
use rowan::TextRange;

use crate::diagnostics::{DiagnosticKind, Diagnostics};

use super::item::{ItemArena, ItemId, Payload};

/// Target language and its configuration.
#[derive(Debug, Clone)]
pub enum CodegenTarget {
    Rust(RustCodegenConfig),
    TypeScript(TypeScriptCodegenConfig),
}

impl Default for CodegenTarget {
    fn default() -> Self {
        Self::Rust(RustCodegenConfig::default())
    }
}

/// One optional parameter of the generated function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Label name as it appears in the query.
    pub label: String,
    /// Identifier in the target language, unique within the function.
    pub ident: String,
}

/// Language-neutral description of the generated function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorFunction {
    pub metric: String,
    pub params: Vec<Param>,
    /// Matchers of the source selector with their values blanked.
    pub defaults: Vec<LabelSelector>,
}

impl SelectorFunction {
    /// `ident` maps a label name to a target-language identifier.
    pub fn from_selector(selector: &SelectorExpression, ident: impl Fn(&str) -> String) -> Self {
        let mut taken = IndexSet::new();
        let mut params = Vec::new();
        let mut defaults = Vec::new();

        for s in selector.selectors() {
            let base = ident(&s.label);
            let mut name = base.clone();
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = format!("{}_{}", base, n);
                n += 1;
            }
            params.push(Param {
                label: s.label.clone(),
                ident: name,
            });
            defaults.push(LabelSelector::new(s.label.as_str(), s.operator, ""));
        }

        Self {
            metric: selector.metric().to_string(),
            params,
            defaults,
        }
    }
}

/// Generates code for the migrated tree, or nothing when it is not a bare selector.
pub fn generate(items: &ItemArena, target: &CodegenTarget, diagnostics: &mut Diagnostics) -> String {
    let roots: Vec<ItemId> = items.roots().collect();
    for &extra in roots.iter().skip(1) {
        if let Some(item) = items.get(extra) {
            diagnostics
                .report(DiagnosticKind::StructuralInconsistency, item.range)
                .message(format!(
                    "query has {} top-level expressions, code is generated for the first",
                    roots.len()
                ))
                .emit();
        }
    }

    let Some(root) = roots.first().and_then(|&id| items.get(id)) else {
        diagnostics
            .report(DiagnosticKind::UnsupportedConstruct, TextRange::default())
            .message("code generation for an empty query")
            .emit();
        return String::new();
    };

    let selector = match &root.payload {
        Payload::Leaf(selector) if root.children.is_empty() => selector,
        Payload::Leaf(_) => {
            diagnostics
                .report(DiagnosticKind::StructuralInconsistency, root.range)
                .message("a selector cannot have nested expressions")
                .emit();
            return String::new();
        }
        Payload::Aggregation(pending) => {
            diagnostics
                .report(DiagnosticKind::UnsupportedConstruct, root.range)
                .message(format!("code generation for `{}`", pending.op))
                .emit();
            return String::new();
        }
    };

    tracing::debug!(metric = selector.metric(), labels = selector.len(), "codegen");
    match target {
        CodegenTarget::Rust(config) => emit_rust(selector, config),
        CodegenTarget::TypeScript(config) => emit_typescript(selector, config),
    }
}
