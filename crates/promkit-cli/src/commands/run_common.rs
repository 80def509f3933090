//! Shared steps of the query commands: load, parse, exit on failure.

use std::path::Path;

use promkit_lib::Query;

use super::query_loader::{QuerySource, load_query_source};

pub fn load_query(query_path: Option<&Path>, query_text: Option<&str>) -> QuerySource {
    match load_query_source(query_path, query_text) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Parses the query. Fuel exhaustion is fatal; syntax errors are left to the caller.
pub fn parse_query(source: &QuerySource) -> Query<'_> {
    match Query::try_from(&source.text) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Prints syntax errors and exits if the query does not parse.
pub fn require_valid(source: &QuerySource, query: &Query<'_>, color: bool) {
    if !query.is_valid() {
        eprint!("{}", source.render(&query.diagnostics(), color));
        std::process::exit(1);
    }
}
