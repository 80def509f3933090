//! Tests for CLI dispatch logic.
//!
//! These tests verify:
//! 1. Params extraction: correct fields are extracted from ArgMatches
//! 2. Defaults and value validation of the shared args
//! 3. Conversion into the codegen target configuration

use std::path::PathBuf;

use promkit_lib::CodegenTarget;

use super::*;
use crate::cli::commands::{ast_command, check_command, codegen_command, migrate_command};
use crate::commands::codegen::CodegenArgs;
use crate::commands::migrate::OutputFormat;

use super::dispatch::CodegenLang;

#[test]
fn migrate_defaults() {
    let m = migrate_command()
        .try_get_matches_from(["migrate", "nodes.promql"])
        .unwrap();
    let params = MigrateParams::from_matches(&m);

    assert_eq!(params.query_path, Some(PathBuf::from("nodes.promql")));
    assert_eq!(params.query_text, None);
    assert_eq!(params.format, OutputFormat::Text);
    assert!(!params.strict);
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn migrate_json_strict() {
    let m = migrate_command()
        .try_get_matches_from([
            "migrate",
            "-q",
            "count(up)",
            "--format",
            "json",
            "--strict",
            "--color",
            "never",
        ])
        .unwrap();
    let params = MigrateParams::from_matches(&m);

    assert_eq!(params.query_path, None);
    assert_eq!(params.query_text.as_deref(), Some("count(up)"));
    assert_eq!(params.format, OutputFormat::Json);
    assert!(params.strict);
    assert_eq!(params.color, ColorChoice::Never);
}

#[test]
fn migrate_rejects_unknown_format() {
    let result = migrate_command().try_get_matches_from(["migrate", "-q", "up", "--format", "yaml"]);

    assert!(result.is_err());
}

#[test]
fn migrate_stdin_path() {
    let m = migrate_command()
        .try_get_matches_from(["migrate", "-"])
        .unwrap();
    let params = MigrateParams::from_matches(&m);

    assert_eq!(params.query_path, Some(PathBuf::from("-")));
}

#[test]
fn query_text_conflicts_with_path() {
    let result = check_command().try_get_matches_from(["check", "nodes.promql", "-q", "up"]);

    assert!(result.is_err());
}

#[test]
fn codegen_defaults_to_rust() {
    let m = codegen_command()
        .try_get_matches_from(["codegen", "-q", "up"])
        .unwrap();
    let params = CodegenParams::from_matches(&m);

    assert_eq!(params.lang, CodegenLang::Rust);
    assert_eq!(params.name, None);
    assert_eq!(params.output, None);

    let args: CodegenArgs = params.into();
    assert!(matches!(args.target, CodegenTarget::Rust(_)));
}

#[test]
fn codegen_rust_options() {
    let m = codegen_command()
        .try_get_matches_from([
            "codegen",
            "-q",
            "up",
            "-l",
            "rs",
            "--name",
            "nodes",
            "--crate-path",
            "crate::promql",
            "--visibility",
            "pub(crate)",
            "-o",
            "nodes.rs",
        ])
        .unwrap();
    let params = CodegenParams::from_matches(&m);

    assert_eq!(params.output, Some(PathBuf::from("nodes.rs")));

    let args: CodegenArgs = params.into();
    assert_eq!(
        format!("{:?}", args.target),
        r#"Rust(RustCodegenConfig { function_name: Some("nodes"), crate_path: "crate::promql", visibility: "pub(crate)" })"#
    );
}

#[test]
fn codegen_typescript_options() {
    let m = codegen_command()
        .try_get_matches_from([
            "codegen",
            "-q",
            "up",
            "--lang",
            "ts",
            "--no-export",
            "--import-root",
            "../promql",
        ])
        .unwrap();
    let params = CodegenParams::from_matches(&m);

    assert_eq!(params.lang, CodegenLang::TypeScript);

    let args: CodegenArgs = params.into();
    assert_eq!(
        format!("{:?}", args.target),
        r#"TypeScript(TypeScriptCodegenConfig { function_name: None, export: false, import_root: "../promql" })"#
    );
}

#[test]
fn codegen_rejects_unknown_lang() {
    let result = codegen_command().try_get_matches_from(["codegen", "-q", "up", "-l", "go"]);

    assert!(result.is_err());
}

#[test]
fn ast_flags() {
    let m = ast_command()
        .try_get_matches_from(["ast", "-q", "sum(up)", "--raw", "--spans"])
        .unwrap();
    let params = AstParams::from_matches(&m);

    assert_eq!(params.query_text.as_deref(), Some("sum(up)"));
    assert!(params.raw);
    assert!(params.spans);
}

#[test]
fn check_always_color() {
    let m = check_command()
        .try_get_matches_from(["check", "nodes.promql", "--color", "always"])
        .unwrap();
    let params = CheckParams::from_matches(&m);

    assert_eq!(params.color, ColorChoice::Always);
    assert!(params.color.should_colorize());
}

#[test]
fn verbose_is_global() {
    let m = build_cli()
        .try_get_matches_from(["promkit", "check", "-q", "up", "-vv"])
        .unwrap();

    let (name, sub) = m.subcommand().unwrap();
    assert_eq!(name, "check");
    assert_eq!(sub.get_count("verbose"), 2);
}

#[test]
fn subcommand_is_required() {
    let result = build_cli().try_get_matches_from(["promkit"]);

    assert!(result.is_err());
}
