//! Query builder primitives for PromQL.
//!
//! Two layers:
//! - **Selectors** (`SelectorExpression`): a metric name plus an ordered set of label matchers
//! - **Templates** (`promql`): text templates for aggregations, functions and operators
//!
//! Both layers produce plain query text. Nothing here parses PromQL.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod promql;
pub mod selector;
pub mod utils;

#[cfg(test)]
mod selector_tests;
#[cfg(test)]
mod utils_tests;

pub use promql::{Aggregation, AggregationParams, ParameterizedAggregation};
pub use selector::{LabelSelector, MatchOp, SelectorExpression, UnknownMatchOp};
