//! Rewrite a query in canonical form.

use std::path::PathBuf;

use promkit_lib::{Migration, Severity};
use serde::Serialize;

use super::run_common;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub struct MigrateArgs {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub format: OutputFormat,
    pub strict: bool,
    pub color: bool,
}

/// Machine-readable result of `migrate --format json`.
#[derive(Debug, Serialize)]
pub struct MigrationReport {
    pub query: String,
    pub complete: bool,
    pub diagnostics: Vec<DiagnosticReport>,
}

#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    pub severity: Severity,
    pub kind: String,
    pub start: u32,
    pub end: u32,
    pub message: String,
}

impl MigrationReport {
    pub fn new(migration: &Migration<'_>) -> Self {
        let diagnostics = migration
            .diagnostics()
            .iter()
            .map(|d| DiagnosticReport {
                severity: d.severity(),
                kind: format!("{:?}", d.kind()),
                start: d.range().start().into(),
                end: d.range().end().into(),
                message: d.message().to_string(),
            })
            .collect();

        Self {
            query: migration.to_query(),
            complete: migration.is_complete(),
            diagnostics,
        }
    }
}

pub fn run(args: MigrateArgs) {
    let source = run_common::load_query(args.query_path.as_deref(), args.query_text.as_deref());
    let query = run_common::parse_query(&source);
    run_common::require_valid(&source, &query, args.color);

    let migration = query.migrate();
    let diagnostics = migration.diagnostics();

    match args.format {
        OutputFormat::Text => {
            if !diagnostics.is_empty() {
                eprint!("{}", source.render(&diagnostics, args.color));
            }
            println!("{}", migration.to_query());
        }
        OutputFormat::Json => {
            let report = MigrationReport::new(&migration);
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    if args.strict && !diagnostics.is_empty() {
        std::process::exit(1);
    }
}
