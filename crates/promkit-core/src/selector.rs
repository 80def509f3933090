//! Label selector expressions: `metric{label<op>"value", ...}`.
//!
//! A `SelectorExpression` keeps at most one matcher per label. Setting a label
//! that already has a matcher replaces its operator and value in place, so the
//! rendered order is the order in which labels were first seen.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label matching operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchOp {
    #[default]
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "=~")]
    RegexMatch,
    #[serde(rename = "!~")]
    NotRegexMatch,
}

impl MatchOp {
    pub const ALL: [MatchOp; 4] = [
        MatchOp::Equal,
        MatchOp::NotEqual,
        MatchOp::RegexMatch,
        MatchOp::NotRegexMatch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MatchOp::Equal => "=",
            MatchOp::NotEqual => "!=",
            MatchOp::RegexMatch => "=~",
            MatchOp::NotRegexMatch => "!~",
        }
    }

    /// Variant name, as written in generated Rust code.
    pub fn variant_name(self) -> &'static str {
        match self {
            MatchOp::Equal => "Equal",
            MatchOp::NotEqual => "NotEqual",
            MatchOp::RegexMatch => "RegexMatch",
            MatchOp::NotRegexMatch => "NotRegexMatch",
        }
    }
}

impl fmt::Display for MatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown match operator `{0}`")]
pub struct UnknownMatchOp(pub String);

impl FromStr for MatchOp {
    type Err = UnknownMatchOp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MatchOp::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownMatchOp(s.to_string()))
    }
}

/// A single `label<op>"value"` matcher. Identity is the label name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelSelector {
    pub label: String,
    pub operator: MatchOp,
    pub value: String,
}

impl LabelSelector {
    pub fn new(label: impl Into<String>, operator: MatchOp, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            operator,
            value: value.into(),
        }
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}\"{}\"", self.label, self.operator, self.value)
    }
}

/// Metric name plus an ordered, label-unique set of matchers.
///
/// Values are emitted verbatim between double quotes; callers own escaping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorExpression {
    metric: String,
    selectors: IndexMap<String, LabelSelector>,
    values: Vec<(String, String)>,
    default_operator: MatchOp,
}

impl SelectorExpression {
    /// Builds an expression from caller values and default selectors.
    ///
    /// Default selectors are applied first, in order. Then every value that is
    /// present becomes a selector with `default_operator`, overriding a default
    /// for the same label without moving it.
    pub fn new(
        metric: impl Into<String>,
        values: &[(&str, Option<&str>)],
        default_operator: MatchOp,
        default_selectors: &[LabelSelector],
    ) -> Self {
        let values = values
            .iter()
            .filter_map(|(label, value)| value.map(|v| (label.to_string(), v.to_string())))
            .collect();
        Self::from_parts(metric.into(), values, default_operator, default_selectors)
    }

    fn from_parts(
        metric: String,
        values: Vec<(String, String)>,
        default_operator: MatchOp,
        default_selectors: &[LabelSelector],
    ) -> Self {
        let mut expr = Self {
            metric,
            selectors: IndexMap::new(),
            values: Vec::new(),
            default_operator,
        };

        for selector in default_selectors {
            expr.set_selector(selector.clone());
        }
        for (label, value) in &values {
            expr.set_selector(LabelSelector::new(label.as_str(), default_operator, value.as_str()));
        }

        expr.values = values;
        expr
    }

    /// Inserts or replaces the selector for `selector.label`.
    ///
    /// A replaced selector keeps its original position.
    pub fn set_selector(&mut self, selector: LabelSelector) -> &mut Self {
        self.selectors.insert(selector.label.clone(), selector);
        self
    }

    /// Independent copy whose current selectors become its default selectors,
    /// with the original values applied on top.
    pub fn fork(&self) -> Self {
        let defaults: Vec<LabelSelector> = self.selectors.values().cloned().collect();
        Self::from_parts(
            self.metric.clone(),
            self.values.clone(),
            self.default_operator,
            &defaults,
        )
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn default_operator(&self) -> MatchOp {
        self.default_operator
    }

    pub fn selectors(&self) -> impl Iterator<Item = &LabelSelector> {
        self.selectors.values()
    }

    pub fn get(&self, label: &str) -> Option<&LabelSelector> {
        self.selectors.get(label)
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

impl fmt::Display for SelectorExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.metric)?;
        for (i, selector) in self.selectors.values().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", selector)?;
        }
        f.write_str("}")
    }
}
