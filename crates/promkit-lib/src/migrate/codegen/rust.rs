//! Rust emitter: a function over `promkit_core::SelectorExpression`.

use promkit_core::SelectorExpression;
use promkit_core::utils::rust_identifier;

use super::SelectorFunction;

/// Configuration for Rust emission.
#[derive(Debug, Clone)]
pub struct RustCodegenConfig {
    /// Defaults to the snake-cased metric name.
    pub(crate) function_name: Option<String>,
    /// Path the builder types are imported from.
    pub(crate) crate_path: String,
    /// Visibility prefix of the function, empty for private.
    pub(crate) visibility: String,
}

impl Default for RustCodegenConfig {
    fn default() -> Self {
        Self {
            function_name: None,
            crate_path: "promkit_core".to_string(),
            visibility: "pub".to_string(),
        }
    }
}

impl RustCodegenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }

    pub fn crate_path(mut self, path: impl Into<String>) -> Self {
        self.crate_path = path.into();
        self
    }

    pub fn visibility(mut self, visibility: impl Into<String>) -> Self {
        self.visibility = visibility.into();
        self
    }
}

pub fn emit_rust(selector: &SelectorExpression, config: &RustCodegenConfig) -> String {
    let function = SelectorFunction::from_selector(selector, rust_identifier);
    let name = match &config.function_name {
        Some(name) => name.clone(),
        None if function.metric.is_empty() => "selector".to_string(),
        None => rust_identifier(&function.metric),
    };

    let mut out = String::new();

    if function.defaults.is_empty() {
        out.push_str(&format!(
            "use {}::{{MatchOp, SelectorExpression}};\n\n",
            config.crate_path
        ));
    } else {
        out.push_str(&format!(
            "use {}::{{LabelSelector, MatchOp, SelectorExpression}};\n\n",
            config.crate_path
        ));
    }

    let params: Vec<String> = function
        .params
        .iter()
        .map(|p| format!("{}: Option<&str>", p.ident))
        .collect();
    let vis = if config.visibility.is_empty() {
        String::new()
    } else {
        format!("{} ", config.visibility)
    };
    out.push_str(&format!(
        "{}fn {}({}) -> String {{\n",
        vis,
        name,
        params.join(", ")
    ));

    let values: Vec<String> = function
        .params
        .iter()
        .map(|p| format!("({:?}, {})", p.label, p.ident))
        .collect();

    out.push_str("    SelectorExpression::new(\n");
    out.push_str(&format!("        {:?},\n", function.metric));
    out.push_str(&format!("        &[{}],\n", values.join(", ")));
    out.push_str(&format!(
        "        MatchOp::{},\n",
        selector.default_operator().variant_name()
    ));
    if function.defaults.is_empty() {
        out.push_str("        &[],\n");
    } else {
        out.push_str("        &[\n");
        for default in &function.defaults {
            out.push_str(&format!(
                "            LabelSelector::new({:?}, MatchOp::{}, {:?}),\n",
                default.label,
                default.operator.variant_name(),
                default.value
            ));
        }
        out.push_str("        ],\n");
    }
    out.push_str("    )\n");
    out.push_str("    .to_string()\n");
    out.push('}');

    out
}
