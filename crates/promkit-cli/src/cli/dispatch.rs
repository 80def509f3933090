//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! This module contains:
//! - `*Params` structs that mirror command `*Args` but are populated from clap
//! - `from_matches()` extractors
//! - `Into<*Args>` impls to bridge dispatch → command handlers

use std::path::PathBuf;

use clap::ArgMatches;
use promkit_lib::{CodegenTarget, RustCodegenConfig, TypeScriptCodegenConfig};

use super::ColorChoice;
use crate::commands::ast::AstArgs;
use crate::commands::check::CheckArgs;
use crate::commands::codegen::CodegenArgs;
use crate::commands::migrate::{MigrateArgs, OutputFormat};

pub struct MigrateParams {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub format: OutputFormat,
    pub strict: bool,
    pub color: ColorChoice,
}

impl MigrateParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let format = match m.get_one::<String>("format").map(|s| s.as_str()) {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Text,
        };

        Self {
            query_path: m.get_one::<PathBuf>("query_path").cloned(),
            query_text: m.get_one::<String>("query_text").cloned(),
            format,
            strict: m.get_flag("strict"),
            color: parse_color(m),
        }
    }
}

impl From<MigrateParams> for MigrateArgs {
    fn from(p: MigrateParams) -> Self {
        Self {
            query_path: p.query_path,
            query_text: p.query_text,
            format: p.format,
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}

/// Target language of `codegen`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodegenLang {
    Rust,
    TypeScript,
}

pub struct CodegenParams {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub lang: CodegenLang,
    pub name: Option<String>,
    pub crate_path: Option<String>,
    pub visibility: Option<String>,
    pub no_export: bool,
    pub import_root: Option<String>,
    pub output: Option<PathBuf>,
    pub color: ColorChoice,
}

impl CodegenParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let lang = match m.get_one::<String>("lang").map(|s| s.as_str()) {
            Some("typescript" | "ts") => CodegenLang::TypeScript,
            _ => CodegenLang::Rust,
        };

        Self {
            // Query input
            query_path: m.get_one::<PathBuf>("query_path").cloned(),
            query_text: m.get_one::<String>("query_text").cloned(),

            // Target options
            lang,
            name: m.get_one::<String>("name").cloned(),
            crate_path: m.get_one::<String>("crate_path").cloned(),
            visibility: m.get_one::<String>("visibility").cloned(),
            no_export: m.get_flag("no_export"),
            import_root: m.get_one::<String>("import_root").cloned(),

            // Output
            output: m.get_one::<PathBuf>("output").cloned(),
            color: parse_color(m),
        }
    }

    fn target(&self) -> CodegenTarget {
        match self.lang {
            CodegenLang::Rust => {
                let mut config = RustCodegenConfig::new();
                if let Some(name) = &self.name {
                    config = config.function_name(name);
                }
                if let Some(path) = &self.crate_path {
                    config = config.crate_path(path);
                }
                if let Some(vis) = &self.visibility {
                    config = config.visibility(vis);
                }
                CodegenTarget::Rust(config)
            }
            CodegenLang::TypeScript => {
                let mut config = TypeScriptCodegenConfig::new().export(!self.no_export);
                if let Some(name) = &self.name {
                    config = config.function_name(name);
                }
                if let Some(root) = &self.import_root {
                    config = config.import_root(root);
                }
                CodegenTarget::TypeScript(config)
            }
        }
    }
}

impl From<CodegenParams> for CodegenArgs {
    fn from(p: CodegenParams) -> Self {
        let target = p.target();
        Self {
            query_path: p.query_path,
            query_text: p.query_text,
            target,
            output: p.output,
            color: p.color.should_colorize(),
        }
    }
}

pub struct AstParams {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub raw: bool,
    pub spans: bool,
    pub color: ColorChoice,
}

impl AstParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            query_path: m.get_one::<PathBuf>("query_path").cloned(),
            query_text: m.get_one::<String>("query_text").cloned(),
            raw: m.get_flag("raw"),
            spans: m.get_flag("spans"),
            color: parse_color(m),
        }
    }
}

impl From<AstParams> for AstArgs {
    fn from(p: AstParams) -> Self {
        Self {
            query_path: p.query_path,
            query_text: p.query_text,
            raw: p.raw,
            spans: p.spans,
            color: p.color.should_colorize(),
        }
    }
}

pub struct CheckParams {
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub strict: bool,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            query_path: m.get_one::<PathBuf>("query_path").cloned(),
            query_text: m.get_one::<String>("query_text").cloned(),
            strict: m.get_flag("strict"),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            query_path: p.query_path,
            query_text: p.query_text,
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}

/// Parse --color flag into ColorChoice.
fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
