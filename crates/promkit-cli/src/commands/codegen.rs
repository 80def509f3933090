//! Generate builder code for a selector query.

use std::fs;
use std::path::PathBuf;

use promkit_lib::CodegenTarget;

use super::run_common;

pub struct CodegenArgs {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub target: CodegenTarget,
    pub output: Option<PathBuf>,
    pub color: bool,
}

pub fn run(args: CodegenArgs) {
    let source = run_common::load_query(args.query_path.as_deref(), args.query_text.as_deref());
    let query = run_common::parse_query(&source);
    run_common::require_valid(&source, &query, args.color);

    let migration = query.migrate();
    let mut diagnostics = migration.diagnostics();
    let (code, codegen_diagnostics) = migration.to_code(&args.target);
    diagnostics.extend(codegen_diagnostics);

    if !diagnostics.is_empty() {
        eprint!("{}", source.render(&diagnostics, args.color));
    }
    if diagnostics.has_errors() {
        std::process::exit(1);
    }

    let output = format!("{}\n", code);
    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &output) {
                eprintln!("error: failed to write '{}': {}", path.display(), e);
                std::process::exit(1);
            }
            tracing::debug!(path = %path.display(), "wrote generated code");
        }
        None => print!("{}", output),
    }
}
