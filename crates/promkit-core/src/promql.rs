//! Text templates for PromQL operators and functions.
//!
//! Every template takes already-rendered expression text and returns new text.
//! No validation is performed: `count()` with an empty expression is a valid
//! template result.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Parameters shared by all aggregation operators.
///
/// When both `by` and `without` are set, `by` wins. An empty label list still
/// renders its clause: `sum by () (x)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationParams {
    pub expr: String,
    pub by: Option<Vec<String>>,
    pub without: Option<Vec<String>>,
}

impl AggregationParams {
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            by: None,
            without: None,
        }
    }

    pub fn by<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.by = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn without<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.without = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// ` by (a, b) `, ` without (a) `, or nothing.
    pub fn grouping_clause(&self) -> String {
        match (&self.by, &self.without) {
            (Some(by), _) => format!(" by ({}) ", by.join(", ")),
            (None, Some(without)) => format!(" without ({}) ", without.join(", ")),
            (None, None) => String::new(),
        }
    }
}

/// Aggregation operators that take only a vector expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Sum,
    Min,
    Max,
    Avg,
    Group,
    Count,
    Stddev,
    Stdvar,
}

impl Aggregation {
    pub const ALL: [Aggregation; 8] = [
        Aggregation::Sum,
        Aggregation::Min,
        Aggregation::Max,
        Aggregation::Avg,
        Aggregation::Group,
        Aggregation::Count,
        Aggregation::Stddev,
        Aggregation::Stdvar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Avg => "avg",
            Aggregation::Group => "group",
            Aggregation::Count => "count",
            Aggregation::Stddev => "stddev",
            Aggregation::Stdvar => "stdvar",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// `op<clause>(expr)`
    pub fn render(self, params: &AggregationParams) -> String {
        format!("{}{}({})", self.name(), params.grouping_clause(), params.expr)
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Aggregation operators that take a leading scalar or string parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterizedAggregation {
    CountValues,
    Bottomk,
    Topk,
    Quantile,
    Limitk,
    LimitRatio,
}

impl ParameterizedAggregation {
    pub const ALL: [ParameterizedAggregation; 6] = [
        ParameterizedAggregation::CountValues,
        ParameterizedAggregation::Bottomk,
        ParameterizedAggregation::Topk,
        ParameterizedAggregation::Quantile,
        ParameterizedAggregation::Limitk,
        ParameterizedAggregation::LimitRatio,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParameterizedAggregation::CountValues => "count_values",
            ParameterizedAggregation::Bottomk => "bottomk",
            ParameterizedAggregation::Topk => "topk",
            ParameterizedAggregation::Quantile => "quantile",
            ParameterizedAggregation::Limitk => "limitk",
            ParameterizedAggregation::LimitRatio => "limit_ratio",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// `op<clause>(parameter, expr)`
    pub fn render(self, parameter: impl fmt::Display, params: &AggregationParams) -> String {
        format!(
            "{}{}({}, {})",
            self.name(),
            params.grouping_clause(),
            parameter,
            params.expr
        )
    }
}

impl fmt::Display for ParameterizedAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `<x>_over_time` range functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverTime {
    Avg,
    Count,
    Last,
    Max,
    Min,
    Present,
    Stddev,
    Stdvar,
    Sum,
    Quantile,
}

impl OverTime {
    pub fn prefix(self) -> &'static str {
        match self {
            OverTime::Avg => "avg",
            OverTime::Count => "count",
            OverTime::Last => "last",
            OverTime::Max => "max",
            OverTime::Min => "min",
            OverTime::Present => "present",
            OverTime::Stddev => "stddev",
            OverTime::Stdvar => "stdvar",
            OverTime::Sum => "sum",
            OverTime::Quantile => "quantile",
        }
    }

    /// `<x>_over_time((expr)[range:interval])`, range defaults to `$__range`.
    pub fn render(self, expr: &str, range: Option<&str>, interval: Option<&str>) -> String {
        format!(
            "{}_over_time(({})[{}:{}])",
            self.prefix(),
            expr,
            range.unwrap_or("$__range"),
            interval.unwrap_or("")
        )
    }
}

/// Default range for `rate` and `increase`.
pub const RATE_INTERVAL: &str = "$__rate_interval";

/// `rate(expr[interval])`
pub fn rate(expr: &str, interval: Option<&str>) -> String {
    format!("rate({}[{}])", expr, interval.unwrap_or(RATE_INTERVAL))
}

/// `increase(expr[interval])`
pub fn increase(expr: &str, interval: Option<&str>) -> String {
    format!("increase({}[{}])", expr, interval.unwrap_or(RATE_INTERVAL))
}

/// `offset 42d`, or nothing when the amount is missing or zero. Unit defaults to `d`.
pub fn offset(amount: Option<u64>, unit: Option<&str>) -> String {
    match amount {
        Some(n) if n != 0 => format!("offset {}{}", n, unit.unwrap_or("d")),
        _ => String::new(),
    }
}

/// Parameters for `label_replace`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelReplace {
    pub expr: String,
    pub new_label: String,
    pub existing_label: String,
    pub replacement: Option<String>,
    pub regex: Option<String>,
}

/// `label_replace(expr, "new", "$1", "existing", "(.*)")`
pub fn label_replace(params: &LabelReplace) -> String {
    format!(
        "label_replace({}, \"{}\", \"{}\", \"{}\", \"{}\")",
        params.expr,
        params.new_label,
        params.replacement.as_deref().unwrap_or("$1"),
        params.existing_label,
        params.regex.as_deref().unwrap_or("(.*)")
    )
}

/// Parameters for `label_join`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelJoin {
    pub expr: String,
    pub new_label: Option<String>,
    pub labels: Vec<String>,
    pub separator: Option<String>,
}

/// `label_join(expr, "new", ", ", "a", "b")`; the destination is omitted when unset.
pub fn label_join(params: &LabelJoin) -> String {
    let mut out = format!("label_join({}", params.expr);
    if let Some(new_label) = &params.new_label {
        out.push_str(&format!(", \"{}\"", new_label));
    }
    out.push_str(&format!(
        ", \"{}\"",
        params.separator.as_deref().unwrap_or(", ")
    ));
    for label in &params.labels {
        out.push_str(&format!(", \"{}\"", label));
    }
    out.push(')');
    out
}

/// Set operators between two vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
    Unless,
}

impl LogicalOp {
    pub fn keyword(self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
            LogicalOp::Unless => "unless",
        }
    }

    pub fn render(self, left: &str, right: &str) -> String {
        format!("{} {} {}", left, self.keyword(), right)
    }
}

/// Arithmetic binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl ArithmeticOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
            ArithmeticOp::Mod => "%",
            ArithmeticOp::Pow => "^",
        }
    }

    /// `left <op> [on|ignoring (..)] [group_left|group_right [(..)]] right`
    ///
    /// `on` wins over `ignoring`, `group_left` wins over `group_right`.
    pub fn render(self, params: &ArithmeticBinaryOpParams) -> String {
        let mut out = format!("{} {}", params.left, self.symbol());

        if let Some(on) = &params.on {
            out.push_str(&format!(" on ({})", on.join(", ")));
        } else if let Some(ignoring) = &params.ignoring {
            out.push_str(&format!(" ignoring ({})", ignoring.join(", ")));
        }

        let group = match (&params.group_left, &params.group_right) {
            (Some(labels), _) => Some(("group_left", labels)),
            (None, Some(labels)) => Some(("group_right", labels)),
            (None, None) => None,
        };
        if let Some((keyword, labels)) = group {
            out.push(' ');
            out.push_str(keyword);
            if !labels.is_empty() {
                out.push_str(&format!(" ({})", labels.join(", ")));
            }
        }

        out.push(' ');
        out.push_str(&params.right);
        out
    }
}

/// Operands and vector matching for an arithmetic binary operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArithmeticBinaryOpParams {
    pub left: String,
    pub right: String,
    pub on: Option<Vec<String>>,
    pub ignoring: Option<Vec<String>>,
    pub group_left: Option<Vec<String>>,
    pub group_right: Option<Vec<String>>,
}

impl ArithmeticBinaryOpParams {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            ..Self::default()
        }
    }
}
