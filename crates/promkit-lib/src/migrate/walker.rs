//! Lowers the typed AST into items.
//!
//! Wrappers that only decorate an inner expression (parentheses, unary sign,
//! range and subquery brackets, `@`) are transparent: the inner expression is
//! walked with the same parent. Anything the builder cannot express is
//! reported and skipped without stopping the walk.

use promkit_core::{Aggregation, LabelSelector, MatchOp, SelectorExpression};
use rowan::TextRange;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::ast::{self, Expr, Matcher};
use crate::parser::cst::{SyntaxKind, SyntaxNode, SyntaxToken};
use crate::parser::lexer::double_quoted_body;

use super::item::{ItemArena, ItemId, Payload, PendingAggregation};

pub struct Walker<'a> {
    items: &'a mut ItemArena,
    diagnostics: &'a mut Diagnostics,
}

/// Expressions still to visit, each with the item it belongs under.
type WorkStack = Vec<(Expr, Option<ItemId>)>;

impl<'a> Walker<'a> {
    pub fn new(items: &'a mut ItemArena, diagnostics: &'a mut Diagnostics) -> Self {
        Self { items, diagnostics }
    }

    pub fn walk_root(&mut self, root: &ast::Root) {
        if let Some(expr) = root.expr() {
            self.walk_expr(&expr, None);
        }
    }

    /// Walks `expr` and everything under it in source order.
    ///
    /// Uses an explicit stack, so nesting depth is bounded by the parser's
    /// recursion fuel rather than by the thread's stack.
    pub fn walk_expr(&mut self, expr: &Expr, parent: Option<ItemId>) {
        let mut stack: WorkStack = vec![(expr.clone(), parent)];
        while let Some((expr, parent)) = stack.pop() {
            self.step(&expr, parent, &mut stack);
        }
    }

    /// Missing inner expressions were already reported by the parser and are
    /// not pushed.
    fn step(&mut self, expr: &Expr, parent: Option<ItemId>, stack: &mut WorkStack) {
        tracing::trace!(kind = ?expr.kind(), range = ?expr.as_cst().text_range(), "walk");

        match expr {
            Expr::Paren(paren) => stack.extend(paren.expr().map(|e| (e, parent))),
            Expr::Unary(unary) => {
                if let Some(op) = unary.operator().filter(|op| op.kind() == SyntaxKind::Sub) {
                    self.modifier_dropped(op.text_range(), "unary `-`");
                }
                stack.extend(unary.expr().map(|e| (e, parent)));
            }
            Expr::Matrix(matrix) => {
                self.suffix_dropped(matrix.as_cst(), "range");
                stack.extend(matrix.expr().map(|e| (e, parent)));
            }
            Expr::Subquery(subquery) => {
                self.suffix_dropped(subquery.as_cst(), "subquery range");
                stack.extend(subquery.expr().map(|e| (e, parent)));
            }
            Expr::StepInvariant(at) => {
                self.suffix_dropped(at.as_cst(), "modifier");
                stack.extend(at.expr().map(|e| (e, parent)));
            }
            Expr::Vector(vector) => self.walk_vector(vector, parent),
            Expr::Aggregate(aggregate) => {
                let Some(id) = self.walk_aggregate(aggregate, parent) else {
                    return;
                };
                if let Some(body) = aggregate.body() {
                    let args: Vec<Expr> = body.args().collect();
                    stack.extend(args.into_iter().rev().map(|arg| (arg, Some(id))));
                }
            }
            Expr::Binary(binary) => {
                let op = binary
                    .operator()
                    .map(|t| t.text().to_ascii_lowercase())
                    .unwrap_or_default();
                let detail = format!("binary operator `{}`", op);
                self.unsupported(binary.as_cst().text_range(), &detail);
            }
            Expr::FunctionCall(call) => {
                let name = call.name().map(|t| t.text().to_string()).unwrap_or_default();
                let detail = format!("function `{}`", name);
                self.unsupported(call.as_cst().text_range(), &detail);
            }
            Expr::Offset(offset) => {
                let range = suffix_range(offset.as_cst());
                self.unsupported(range, "`offset` modifier");
            }
            Expr::Number(number) => {
                self.unsupported(number.as_cst().text_range(), "number literal");
            }
            Expr::String(string) => {
                self.unsupported(string.as_cst().text_range(), "string literal");
            }
        }
    }

    fn walk_vector(&mut self, vector: &ast::VectorSelector, parent: Option<ItemId>) {
        let mut metric = vector.metric().map(|t| t.text().to_string());
        let mut selectors = Vec::new();
        let matchers: Vec<Matcher> = vector
            .matchers()
            .map(|m| m.matchers().collect())
            .unwrap_or_default();

        for matcher in &matchers {
            match matcher {
                Matcher::MetricName(name) => {
                    let Some(text) = name.name() else {
                        continue;
                    };
                    if metric.is_some() {
                        self.diagnostics
                            .report(
                                DiagnosticKind::ConflictingMetricName,
                                name.as_cst().text_range(),
                            )
                            .message(text)
                            .emit();
                        continue;
                    }
                    metric = Some(text);
                }
                Matcher::Unquoted(m) => {
                    if let Some(selector) = label_selector(m.label(), m.operator(), m.value()) {
                        selectors.push(selector);
                    }
                }
                Matcher::Quoted(m) => {
                    if let Some(selector) = label_selector(m.label(), m.operator(), m.value()) {
                        selectors.push(selector);
                    }
                }
            }
        }

        let metric = metric.unwrap_or_default();
        let mut expr = SelectorExpression::new(metric, &[], MatchOp::Equal, &[]);
        for selector in selectors {
            expr.set_selector(selector);
        }

        let range = vector.as_cst().text_range();
        let id = self.items.alloc(range, parent, Payload::Leaf(expr));
        tracing::debug!(item = %id, parent = ?parent, ?range, "leaf");
    }

    /// Allocates the aggregation item. Its arguments are left to the caller.
    fn walk_aggregate(
        &mut self,
        aggregate: &ast::AggregateExpr,
        parent: Option<ItemId>,
    ) -> Option<ItemId> {
        let op = aggregate.op()?;
        let range = op.as_cst().text_range();
        let kind = op.kind()?;

        let Some(aggregation) = aggregation_for(kind) else {
            let name = op
                .token()
                .map(|t| t.text().to_ascii_lowercase())
                .unwrap_or_default();
            let detail = format!("`{}` aggregation", name);
            self.unsupported(range, &detail);
            return None;
        };

        let mut pending = PendingAggregation::new(aggregation);
        for modifier in aggregate.modifiers() {
            let labels: Vec<String> = modifier
                .labels()
                .map(|l| l.names().collect())
                .unwrap_or_default();
            if modifier.is_by() {
                pending.by = Some(labels);
            } else if modifier.is_without() {
                pending.without = Some(labels);
            }
        }

        let id = self
            .items
            .alloc(range, parent, Payload::Aggregation(pending));
        tracing::debug!(item = %id, parent = ?parent, op = %aggregation, "aggregation");
        Some(id)
    }

    fn unsupported(&mut self, range: TextRange, detail: &str) {
        tracing::debug!(?range, detail, "unsupported");
        self.diagnostics
            .report(DiagnosticKind::UnsupportedConstruct, range)
            .message(detail)
            .emit();
    }

    /// Reports the postfix part of `node`, quoting it: range `[5m]`.
    fn suffix_dropped(&mut self, node: &SyntaxNode, what: &str) {
        let range = suffix_range(node);
        let text = node.text().slice(range - node.text_range().start());
        let detail = format!("{} `{}`", what, text);
        self.modifier_dropped(range, &detail);
    }

    fn modifier_dropped(&mut self, range: TextRange, detail: &str) {
        tracing::debug!(?range, detail, "modifier dropped");
        self.diagnostics
            .report(DiagnosticKind::ModifierDropped, range)
            .message(detail)
            .emit();
    }
}

fn aggregation_for(kind: SyntaxKind) -> Option<Aggregation> {
    let op = match kind {
        SyntaxKind::Sum => Aggregation::Sum,
        SyntaxKind::Avg => Aggregation::Avg,
        SyntaxKind::Count => Aggregation::Count,
        SyntaxKind::Min => Aggregation::Min,
        SyntaxKind::Max => Aggregation::Max,
        SyntaxKind::Group => Aggregation::Group,
        SyntaxKind::Stddev => Aggregation::Stddev,
        SyntaxKind::Stdvar => Aggregation::Stdvar,
        _ => return None,
    };
    Some(op)
}

/// Incomplete matchers were already reported by the parser.
fn label_selector(
    label: Option<String>,
    operator: Option<MatchOp>,
    value: Option<SyntaxToken>,
) -> Option<LabelSelector> {
    let value = double_quoted_body(value?.text()).into_owned();
    Some(LabelSelector::new(label?, operator?, value))
}

/// Range from the node's own first token to its end.
///
/// For postfix wrappers (`x[5m]`, `x offset 5m`, `x @ 100`) this is the modifier,
/// for prefix wrappers (`-x`) the whole node.
fn suffix_range(node: &SyntaxNode) -> TextRange {
    let end = node.text_range().end();
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| !t.kind().is_trivia())
        .map_or(node.text_range(), |t| TextRange::new(t.text_range().start(), end))
}
