//! Query processing pipeline.
//!
//! Stages: parse → migrate. Parsing populates the syntax diagnostics; the
//! [`Migration`] returned by [`Query::migrate`] carries its own.

mod dump;
mod printer;
pub use printer::QueryPrinter;

#[cfg(test)]
mod mod_tests;
#[cfg(test)]
mod printer_tests;

use rowan::GreenNodeBuilder;

use crate::Result;
use crate::diagnostics::Diagnostics;
use crate::migrate::Migration;
use crate::parser::cst::SyntaxKind;
use crate::parser::lexer::lex;
use crate::parser::{ParseResult, Parser, Root, SyntaxNode};

const DEFAULT_EXEC_FUEL: u32 = 1_000_000;
const DEFAULT_RECURSION_FUEL: u32 = 4096;

/// A parsed PromQL query.
///
/// Create with [`new`](Self::new), optionally configure fuel limits,
/// then call [`exec`](Self::exec) to parse.
///
/// Check [`is_valid`](Self::is_valid) or [`diagnostics`](Self::diagnostics)
/// to determine if the query has syntax issues.
#[derive(Debug, Clone)]
pub struct Query<'a> {
    source: &'a str,
    ast: Root,
    exec_fuel: Option<u32>,
    recursion_fuel: Option<u32>,
    exec_fuel_consumed: u32,
    parse_diagnostics: Diagnostics,
}

fn empty_root() -> Root {
    let mut builder = GreenNodeBuilder::new();
    builder.start_node(SyntaxKind::Root.into());
    builder.finish_node();
    let green = builder.finish();
    Root::cast(SyntaxNode::new_root(green)).expect("we just built a Root node")
}

impl<'a> Query<'a> {
    /// Create a new query from source text.
    ///
    /// Call [`exec`](Self::exec) to run the parser.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            ast: empty_root(),
            exec_fuel: Some(DEFAULT_EXEC_FUEL),
            recursion_fuel: Some(DEFAULT_RECURSION_FUEL),
            exec_fuel_consumed: 0,
            parse_diagnostics: Diagnostics::new(),
        }
    }

    /// Set execution fuel limit. None = infinite.
    ///
    /// Execution fuel never replenishes. It protects against large inputs.
    /// Returns error from [`exec`](Self::exec) when exhausted.
    pub fn with_exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.exec_fuel = limit;
        self
    }

    /// Set recursion depth limit. None = infinite.
    ///
    /// Recursion fuel restores when exiting recursion. It protects against
    /// deeply nested input. Returns error from [`exec`](Self::exec) when exhausted.
    pub fn with_recursion_fuel(mut self, limit: Option<u32>) -> Self {
        self.recursion_fuel = limit;
        self
    }

    /// Parse the source.
    ///
    /// Returns `Err` if fuel limits are exceeded.
    /// Syntax diagnostics are collected and accessible via [`diagnostics`](Self::diagnostics).
    pub fn exec(mut self) -> Result<Self> {
        self.try_parse()?;
        Ok(self)
    }

    fn try_parse(&mut self) -> Result<()> {
        let tokens = lex(self.source);
        let parser = Parser::new(self.source, tokens)
            .with_exec_fuel(self.exec_fuel)
            .with_recursion_fuel(self.recursion_fuel);

        let ParseResult {
            root,
            diagnostics,
            exec_fuel_consumed,
        } = parser.parse()?;
        self.ast = root;
        self.parse_diagnostics = diagnostics;
        self.exec_fuel_consumed = exec_fuel_consumed;
        tracing::debug!(
            exec_fuel_consumed,
            diagnostics = self.parse_diagnostics.len(),
            "parsed query"
        );
        Ok(())
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn root(&self) -> &Root {
        &self.ast
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        self.ast.as_cst()
    }

    pub fn exec_fuel_consumed(&self) -> u32 {
        self.exec_fuel_consumed
    }

    /// Syntax diagnostics.
    pub fn diagnostics(&self) -> Diagnostics {
        self.parse_diagnostics.clone()
    }

    /// Query is valid if there are no error-severity diagnostics (warnings are allowed).
    pub fn is_valid(&self) -> bool {
        !self.parse_diagnostics.has_errors()
    }

    /// Lowers the tree into builder values and renders them.
    ///
    /// Runs on invalid queries too: recovered subtrees are skipped, the rest migrates.
    pub fn migrate(&self) -> Migration<'a> {
        Migration::new(self.source, &self.ast).analyze()
    }

    pub fn printer(&self) -> QueryPrinter<'_, 'a> {
        QueryPrinter::new(self)
    }
}

impl<'a> TryFrom<&'a str> for Query<'a> {
    type Error = crate::Error;

    fn try_from(source: &'a str) -> Result<Self> {
        Self::new(source).exec()
    }
}

impl<'a> TryFrom<&'a String> for Query<'a> {
    type Error = crate::Error;

    fn try_from(source: &'a String) -> Result<Self> {
        Self::new(source.as_str()).exec()
    }
}
