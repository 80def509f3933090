//! TypeScript emitter: a function over the `Expression` builder class.

use promkit_core::utils::ts_identifier;
use promkit_core::{MatchOp, SelectorExpression};

use super::SelectorFunction;

/// Configuration for TypeScript emission.
#[derive(Debug, Clone)]
pub struct TypeScriptCodegenConfig {
    /// Defaults to the camel-cased metric name.
    pub(crate) function_name: Option<String>,
    /// Whether to export the function
    pub(crate) export: bool,
    /// Directory holding the `expression` and `types` modules.
    pub(crate) import_root: String,
}

impl Default for TypeScriptCodegenConfig {
    fn default() -> Self {
        Self {
            function_name: None,
            export: true,
            import_root: ".".to_string(),
        }
    }
}

impl TypeScriptCodegenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }

    /// Set whether to export the function.
    pub fn export(mut self, value: bool) -> Self {
        self.export = value;
        self
    }

    pub fn import_root(mut self, path: impl Into<String>) -> Self {
        self.import_root = path.into();
        self
    }
}

pub fn emit_typescript(selector: &SelectorExpression, config: &TypeScriptCodegenConfig) -> String {
    let function = SelectorFunction::from_selector(selector, ts_identifier);
    let name = match &config.function_name {
        Some(name) => name.clone(),
        None if function.metric.is_empty() => "selector".to_string(),
        None => ts_identifier(&function.metric),
    };
    let root = config.import_root.trim_end_matches('/');

    let mut out = String::new();
    out.push_str(&format!(
        "import {{ Expression }} from {};\n",
        string_literal(&format!("{}/expression", root))
    ));
    out.push_str(&format!(
        "import {{ MatchingOperator }} from {};\n\n",
        string_literal(&format!("{}/types", root))
    ));

    let params: Vec<String> = function
        .params
        .iter()
        .map(|p| format!("{}?: string", p.ident))
        .collect();
    let export = if config.export { "export " } else { "" };
    out.push_str(&format!(
        "{}function {}({}): string {{\n",
        export,
        name,
        params.join(", ")
    ));

    let values: Vec<String> = function
        .params
        .iter()
        .map(|p| format!("{}: {}", string_literal(&p.label), p.ident))
        .collect();

    out.push_str("  return new Expression({\n");
    out.push_str(&format!("    metric: {},\n", string_literal(&function.metric)));
    if values.is_empty() {
        out.push_str("    values: {},\n");
    } else {
        out.push_str(&format!("    values: {{ {} }},\n", values.join(", ")));
    }
    out.push_str(&format!(
        "    defaultOperator: {},\n",
        operator(selector.default_operator())
    ));
    if function.defaults.is_empty() {
        out.push_str("    defaultSelectors: [],\n");
    } else {
        out.push_str("    defaultSelectors: [\n");
        for default in &function.defaults {
            out.push_str(&format!(
                "      {{ label: {}, operator: {}, value: {} }},\n",
                string_literal(&default.label),
                operator(default.operator),
                string_literal(&default.value)
            ));
        }
        out.push_str("    ],\n");
    }
    out.push_str("  }).toString();\n");
    out.push('}');

    out
}

fn operator(op: MatchOp) -> &'static str {
    match op {
        MatchOp::Equal => "MatchingOperator.equal",
        MatchOp::NotEqual => "MatchingOperator.notEqual",
        MatchOp::RegexMatch => "MatchingOperator.regexMatch",
        MatchOp::NotRegexMatch => "MatchingOperator.notRegexMatch",
    }
}

/// Double-quoted TypeScript string literal.
fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
