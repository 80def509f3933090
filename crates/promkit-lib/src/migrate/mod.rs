//! Query migration: syntax tree → item tree → canonical text or builder code.
//!
//! # Architecture
//!
//! ```text
//! Root (parser) → walker → ItemArena → collapse → render / codegen
//! ```
//!
//! The walker allocates one item per supported selector or aggregation and
//! records its parent. Collapse attaches children to parents in one pass.
//! Rendering is pure: each aggregation receives its child's text explicitly.

pub mod codegen;
pub mod collapse;
pub mod item;
pub mod render;
pub mod walker;

#[cfg(test)]
mod render_tests;
#[cfg(test)]
mod walker_tests;

use std::fmt;

use crate::diagnostics::Diagnostics;
use crate::parser::Root;

use codegen::CodegenTarget;
use item::ItemArena;
use walker::Walker;

/// A migration of one parsed query.
///
/// Create with [`new`](Self::new), then call [`analyze`](Self::analyze).
/// Diagnostics never abort the migration: unsupported branches render as empty text.
#[derive(Debug, Clone)]
pub struct Migration<'a> {
    source: &'a str,
    root: Root,
    items: ItemArena,
    output: String,
    walk_diagnostics: Diagnostics,
    collapse_diagnostics: Diagnostics,
    render_diagnostics: Diagnostics,
}

impl<'a> Migration<'a> {
    pub fn new(source: &'a str, root: &Root) -> Self {
        Self {
            source,
            root: root.clone(),
            items: ItemArena::new(),
            output: String::new(),
            walk_diagnostics: Diagnostics::new(),
            collapse_diagnostics: Diagnostics::new(),
            render_diagnostics: Diagnostics::new(),
        }
    }

    /// Walks the tree, collapses the items and renders the canonical text.
    ///
    /// Starts from scratch each time, so analyzing twice gives the same result.
    pub fn analyze(mut self) -> Self {
        self.items = ItemArena::new();
        self.walk_diagnostics = Diagnostics::new();
        self.collapse_diagnostics = Diagnostics::new();
        self.render_diagnostics = Diagnostics::new();

        Walker::new(&mut self.items, &mut self.walk_diagnostics)
            .walk_root(&self.root);
        collapse::collapse(&mut self.items, &mut self.collapse_diagnostics);
        self.output = render::render_query(&self.items, &mut self.render_diagnostics);

        tracing::debug!(
            items = self.items.len(),
            diagnostics = self.diagnostics().len(),
            "migrated"
        );
        self
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn items(&self) -> &ItemArena {
        &self.items
    }

    /// Canonical query text. Empty when nothing could be migrated.
    pub fn to_query(&self) -> String {
        self.output.clone()
    }

    /// Builder code for the migrated query, with the diagnostics of this step.
    ///
    /// Only a bare selector can be turned into code; anything else yields empty text.
    pub fn to_code(&self, target: &CodegenTarget) -> (String, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let code = codegen::generate(&self.items, target, &mut diagnostics);
        (code, diagnostics)
    }

    /// All diagnostics combined from all passes.
    pub fn diagnostics(&self) -> Diagnostics {
        let mut all = Diagnostics::new();
        all.extend(self.walk_diagnostics.clone());
        all.extend(self.collapse_diagnostics.clone());
        all.extend(self.render_diagnostics.clone());
        all
    }

    /// Migration is complete if no pass produced an error (dropped modifiers are allowed).
    pub fn is_complete(&self) -> bool {
        !self.walk_diagnostics.has_errors()
            && !self.collapse_diagnostics.has_errors()
            && !self.render_diagnostics.has_errors()
    }
}

impl fmt::Display for Migration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.output)
    }
}
