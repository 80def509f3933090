//! Parser infrastructure for PromQL.
//!
//! # Architecture
//!
//! The parser produces a lossless concrete syntax tree (CST) via Rowan's green tree builder:
//!
//! - Zero-copy parsing: tokens carry spans, text sliced only when building tree nodes
//! - Trivia buffering: whitespace/comments collected, then attached as leading trivia
//! - Checkpoint-based wrapping: binary operators and postfix modifiers (`[5m]`, `offset`, `@`)
//!   wrap the already-parsed operand retroactively
//! - Explicit recovery sets determine when to bail vs consume
//!
//! # Recovery Strategy
//!
//! The parser is resilient: it always produces a tree.
//!
//! 1. Unknown tokens get wrapped in `SyntaxKind::Error` nodes and consumed
//! 2. Missing expected tokens emit a diagnostic but don't consume (parent may handle)
//! 3. Closing delimiters and commas are synchronization points, never consumed as garbage
//!
//! Fuel exhaustion (exec_fuel, recursion_fuel) returns an actual error immediately.

pub mod ast;
pub mod cst;
pub mod lexer;

mod core;
mod grammar;
mod invariants;

#[cfg(test)]
mod cst_tests;
#[cfg(test)]
mod lexer_tests;

pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};

pub use ast::{
    AggregateExpr, AggregateModifier, BinaryExpr, Expr, FunctionCall, LabelMatchers, Matcher,
    MatrixSelector, OffsetExpr, ParenExpr, Root, StepInvariantExpr, SubqueryExpr, UnaryExpr,
    VectorSelector,
};

pub use core::{ParseResult, Parser};

use crate::PassResult;
use lexer::lex;

/// Main entry point with default (unlimited) fuel. Returns Err on fuel exhaustion.
pub fn parse(source: &str) -> PassResult<Root> {
    let ParseResult {
        root, diagnostics, ..
    } = Parser::new(source, lex(source)).parse()?;
    Ok((root, diagnostics))
}
