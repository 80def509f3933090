//! Command builders for the CLI.
//!
//! Each command is built using the shared arg builders from `args.rs`.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("promkit")
        .about("Migrate PromQL queries to canonical text and builder code")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(migrate_command())
        .subcommand(codegen_command())
        .subcommand(ast_command())
        .subcommand(check_command())
}

/// Rewrite a query in canonical form.
pub fn migrate_command() -> Command {
    Command::new("migrate")
        .about("Rewrite a query in canonical form")
        .override_usage(
            "\
  promkit migrate <QUERY>
  promkit migrate -q <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  promkit migrate nodes.promql                 # canonical text
  promkit migrate -q 'count(up) by (job)'      # inline query
  promkit migrate nodes.promql --format json   # query and diagnostics as JSON
  cat nodes.promql | promkit migrate -         # from stdin"#,
        )
        .arg(query_path_arg())
        .arg(query_text_arg())
        .arg(format_arg())
        .arg(strict_arg())
        .arg(color_arg())
}

/// Generate builder code for a selector query.
pub fn codegen_command() -> Command {
    Command::new("codegen")
        .about("Generate builder code for a selector query")
        .override_usage(
            "\
  promkit codegen <QUERY> [-l <LANG>]
  promkit codegen -q <TEXT> [-l <LANG>]",
        )
        .after_help(
            r#"EXAMPLES:
  promkit codegen -q 'up{job="api"}'                 # rust function
  promkit codegen -q 'up{job="api"}' -l ts           # typescript function
  promkit codegen nodes.promql --name nodes -o nodes.rs"#,
        )
        .arg(query_path_arg())
        .arg(query_text_arg())
        .arg(lang_arg())
        .arg(name_arg())
        .arg(crate_path_arg())
        .arg(visibility_arg())
        .arg(no_export_arg())
        .arg(import_root_arg())
        .arg(output_file_arg())
        .arg(color_arg())
}

/// Show the syntax tree of a query.
pub fn ast_command() -> Command {
    Command::new("ast")
        .about("Show the syntax tree of a query")
        .override_usage(
            "\
  promkit ast <QUERY>
  promkit ast -q <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  promkit ast nodes.promql                   # typed tree
  promkit ast -q 'sum(up)' --raw             # concrete syntax tree
  promkit ast -q 'sum(up)' --raw --spans     # with byte ranges"#,
        )
        .arg(query_path_arg())
        .arg(query_text_arg())
        .arg(raw_arg())
        .arg(spans_arg())
        .arg(color_arg())
}

/// Validate a query.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Validate a query")
        .override_usage(
            "\
  promkit check <QUERY>
  promkit check -q <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  promkit check nodes.promql            # syntax only
  promkit check nodes.promql --strict   # migration warnings fail too"#,
        )
        .arg(query_path_arg())
        .arg(query_text_arg())
        .arg(strict_arg())
        .arg(color_arg())
}
