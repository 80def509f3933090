use std::fmt::Write;

use rowan::NodeOrToken;

use crate::parser::ast::{self, Expr, Matcher};
use crate::parser::{SyntaxNode, SyntaxToken};

use super::Query;

pub struct QueryPrinter<'q, 'src> {
    query: &'q Query<'src>,
    raw: bool,
    trivia: bool,
    spans: bool,
}

impl<'q, 'src> QueryPrinter<'q, 'src> {
    pub fn new(query: &'q Query<'src>) -> Self {
        Self {
            query,
            raw: false,
            trivia: false,
            spans: false,
        }
    }

    pub fn raw(mut self, value: bool) -> Self {
        self.raw = value;
        self
    }

    pub fn with_trivia(mut self, value: bool) -> Self {
        self.trivia = value;
        self
    }

    pub fn with_spans(mut self, value: bool) -> Self {
        self.spans = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        if self.raw {
            self.format_cst(self.query.as_cst(), 0, w)
        } else {
            self.format_root(self.query.root(), w)
        }
    }

    fn format_cst(&self, node: &SyntaxNode, indent: usize, w: &mut impl Write) -> std::fmt::Result {
        let prefix = "  ".repeat(indent);
        let span = self.span_str(node.text_range());

        writeln!(w, "{}{:?}{}", prefix, node.kind(), span)?;

        for child in node.children_with_tokens() {
            match child {
                NodeOrToken::Node(n) => self.format_cst(&n, indent + 1, w)?,
                NodeOrToken::Token(t) => {
                    if self.trivia || !t.kind().is_trivia() {
                        let child_prefix = "  ".repeat(indent + 1);
                        let child_span = self.span_str(t.text_range());
                        writeln!(
                            w,
                            "{}{:?}{} {:?}",
                            child_prefix,
                            t.kind(),
                            child_span,
                            t.text()
                        )?;
                    }
                }
            }
        }
        Ok(())
    }

    fn format_root(&self, root: &ast::Root, w: &mut impl Write) -> std::fmt::Result {
        let span = self.span_str(root.as_cst().text_range());
        writeln!(w, "Root{}", span)?;

        if let Some(expr) = root.expr() {
            self.format_expr(&expr, 1, w)?;
        }
        Ok(())
    }

    fn format_expr(&self, expr: &Expr, indent: usize, w: &mut impl Write) -> std::fmt::Result {
        let prefix = "  ".repeat(indent);
        let span = self.span_str(expr.as_cst().text_range());

        match expr {
            Expr::Aggregate(agg) => {
                let op = agg.op().and_then(|op| op.token());
                write!(w, "{}Aggregate{} {}", prefix, span, token_str(op.as_ref()))?;
                for modifier in agg.modifiers() {
                    let keyword = if modifier.is_by() { "by" } else { "without" };
                    let labels: Vec<String> = modifier
                        .labels()
                        .map(|l| l.names().collect())
                        .unwrap_or_default();
                    write!(w, " {} ({})", keyword, labels.join(", "))?;
                }
                writeln!(w)?;
                if let Some(body) = agg.body() {
                    for arg in body.args() {
                        self.format_expr(&arg, indent + 1, w)?;
                    }
                }
            }
            Expr::Binary(bin) => {
                let op = bin.operator();
                let modifier = if bin.has_bool_modifier() { " bool" } else { "" };
                writeln!(
                    w,
                    "{}Binary{} {}{}",
                    prefix,
                    span,
                    token_str(op.as_ref()),
                    modifier
                )?;
                for side in [bin.lhs(), bin.rhs()].into_iter().flatten() {
                    self.format_expr(&side, indent + 1, w)?;
                }
            }
            Expr::FunctionCall(call) => {
                let name = call.name();
                writeln!(w, "{}Call{} {}", prefix, span, token_str(name.as_ref()))?;
                if let Some(body) = call.body() {
                    for arg in body.args() {
                        self.format_expr(&arg, indent + 1, w)?;
                    }
                }
            }
            Expr::Matrix(matrix) => {
                let range = matrix.range();
                writeln!(w, "{}Matrix{} [{}]", prefix, span, token_str(range.as_ref()))?;
                self.format_inner(matrix.expr(), indent, w)?;
            }
            Expr::Subquery(sub) => {
                let range = sub.range();
                let step = sub.step();
                writeln!(
                    w,
                    "{}Subquery{} [{}:{}]",
                    prefix,
                    span,
                    token_str(range.as_ref()),
                    token_str(step.as_ref())
                )?;
                self.format_inner(sub.expr(), indent, w)?;
            }
            Expr::Offset(offset) => {
                let duration = offset.duration();
                writeln!(w, "{}Offset{} {}", prefix, span, token_str(duration.as_ref()))?;
                self.format_inner(offset.expr(), indent, w)?;
            }
            Expr::StepInvariant(at) => {
                writeln!(w, "{}At{}", prefix, span)?;
                self.format_inner(at.expr(), indent, w)?;
            }
            Expr::Paren(paren) => {
                writeln!(w, "{}Paren{}", prefix, span)?;
                self.format_inner(paren.expr(), indent, w)?;
            }
            Expr::Unary(unary) => {
                let op = unary.operator();
                writeln!(w, "{}Unary{} {}", prefix, span, token_str(op.as_ref()))?;
                self.format_inner(unary.expr(), indent, w)?;
            }
            Expr::Number(num) => {
                let value = num.value();
                writeln!(w, "{}Number{} {}", prefix, span, token_str(value.as_ref()))?;
            }
            Expr::String(s) => {
                let value = s.value();
                writeln!(w, "{}String{} {}", prefix, span, token_str(value.as_ref()))?;
            }
            Expr::Vector(vector) => {
                match vector.metric() {
                    Some(metric) => writeln!(w, "{}Vector{} {}", prefix, span, metric.text())?,
                    None => writeln!(w, "{}Vector{}", prefix, span)?,
                }
                if let Some(matchers) = vector.matchers() {
                    for matcher in matchers.matchers() {
                        self.format_matcher(&matcher, indent + 1, w)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn format_inner(
        &self,
        inner: Option<Expr>,
        indent: usize,
        w: &mut impl Write,
    ) -> std::fmt::Result {
        match inner {
            Some(expr) => self.format_expr(&expr, indent + 1, w),
            None => Ok(()),
        }
    }

    fn format_matcher(
        &self,
        matcher: &Matcher,
        indent: usize,
        w: &mut impl Write,
    ) -> std::fmt::Result {
        let prefix = "  ".repeat(indent);
        let span = self.span_str(matcher.as_cst().text_range());

        let (label, op, value) = match matcher {
            Matcher::MetricName(name) => {
                let token = name.token();
                return writeln!(w, "{}MetricName{} {}", prefix, span, token_str(token.as_ref()));
            }
            Matcher::Unquoted(m) => (m.label(), m.operator(), m.value()),
            Matcher::Quoted(m) => (m.label(), m.operator(), m.value()),
        };

        writeln!(
            w,
            "{}Matcher{} {} {} {}",
            prefix,
            span,
            label.as_deref().unwrap_or("?"),
            op.map_or("?", |op| op.as_str()),
            token_str(value.as_ref())
        )
    }

    fn span_str(&self, range: rowan::TextRange) -> String {
        if !self.spans {
            return String::new();
        }
        format!(
            " [{}..{}]",
            u32::from(range.start()),
            u32::from(range.end())
        )
    }
}

fn token_str(token: Option<&SyntaxToken>) -> &str {
    token.map_or("?", |t| t.text())
}
