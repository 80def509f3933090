//! promkit: PromQL parser and query migration engine.
//!
//! Parses PromQL into a lossless syntax tree, lowers the supported subset into
//! `promkit_core` builder values and renders them back as canonical query text
//! or as builder code.
//!
//! # Example
//!
//! ```
//! use promkit_lib::Query;
//!
//! let source = r#"count(up{"job"="api", env!="dev"}) by (cluster)"#;
//!
//! let query = Query::try_from(source).expect("out of fuel");
//! let migration = query.migrate();
//! assert_eq!(
//!     migration.to_query(),
//!     r#"count by (cluster) (up{job="api", env!="dev"})"#
//! );
//! eprintln!("{}", migration.diagnostics().render(source));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod diagnostics;
pub mod migrate;
pub mod parser;
pub mod query;

/// Result type for analysis passes that produce both output and diagnostics.
///
/// Each pass returns its typed output alongside any diagnostics it collected.
/// Fatal errors (like fuel exhaustion) use the outer `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use migrate::codegen::{CodegenTarget, RustCodegenConfig, TypeScriptCodegenConfig};
pub use migrate::Migration;
pub use query::{Query, QueryPrinter};

/// Errors that can occur during query parsing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Execution fuel exhausted (too many parser operations).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("query parsing failed with {} errors", .0.error_count())]
    QueryParseError(Diagnostics),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Parses and migrates `source` in one step.
///
/// Syntax errors abort with [`Error::QueryParseError`]. Migration diagnostics
/// (unsupported constructs, dropped modifiers) do not: the affected branches
/// render as empty text.
pub fn migrate_query(source: &str) -> Result<String> {
    let query = Query::try_from(source)?;
    if !query.is_valid() {
        return Err(Error::QueryParseError(query.diagnostics()));
    }
    Ok(query.migrate().to_query())
}
