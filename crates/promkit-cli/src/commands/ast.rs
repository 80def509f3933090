//! Show the syntax tree of a query.

use std::path::PathBuf;

use super::run_common;

pub struct AstArgs {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub raw: bool,
    pub spans: bool,
    pub color: bool,
}

pub fn run(args: AstArgs) {
    let source = run_common::load_query(args.query_path.as_deref(), args.query_text.as_deref());
    let query = run_common::parse_query(&source);

    // The tree is printed even when recovery was needed
    let diagnostics = query.diagnostics();
    if !diagnostics.is_empty() {
        eprint!("{}", source.render(&diagnostics, args.color));
    }

    let output = query
        .printer()
        .raw(args.raw)
        .with_trivia(args.raw)
        .with_spans(args.spans)
        .dump();
    print!("{}", output);
}
