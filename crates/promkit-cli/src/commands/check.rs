use std::path::PathBuf;

use super::run_common;

pub struct CheckArgs {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub strict: bool,
    pub color: bool,
}

pub fn run(args: CheckArgs) {
    let source = run_common::load_query(args.query_path.as_deref(), args.query_text.as_deref());
    let query = run_common::parse_query(&source);

    let mut diagnostics = query.diagnostics();
    if args.strict {
        diagnostics.extend(query.migrate().diagnostics());
    }

    let is_valid = if args.strict {
        diagnostics.is_empty()
    } else {
        !diagnostics.has_errors()
    };

    if !is_valid {
        eprint!("{}", source.render(&diagnostics, args.color));
        std::process::exit(1);
    }

    // Silent on success (like cargo check)
}
