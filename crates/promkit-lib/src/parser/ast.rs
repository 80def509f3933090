//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast is infallible for correct `SyntaxKind` - validation happens elsewhere.

use promkit_core::MatchOp;

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};
use super::lexer::unquote;

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(AggregateExpr, AggregateExpr);
ast_node!(AggregateOp, AggregateOp);
ast_node!(AggregateModifier, AggregateModifier);
ast_node!(GroupingLabels, GroupingLabels);
ast_node!(LabelName, LabelName);
ast_node!(QuotedLabelName, QuotedLabelName);
ast_node!(FunctionCall, FunctionCall);
ast_node!(FunctionCallBody, FunctionCallBody);
ast_node!(VectorSelector, VectorSelector);
ast_node!(LabelMatchers, LabelMatchers);
ast_node!(UnquotedLabelMatcher, UnquotedLabelMatcher);
ast_node!(QuotedLabelMatcher, QuotedLabelMatcher);
ast_node!(MatchOperator, MatchOp);
ast_node!(MatrixSelector, MatrixSelector);
ast_node!(SubqueryExpr, SubqueryExpr);
ast_node!(OffsetExpr, OffsetExpr);
ast_node!(StepInvariantExpr, StepInvariantExpr);
ast_node!(ParenExpr, ParenExpr);
ast_node!(UnaryExpr, UnaryExpr);
ast_node!(BinaryExpr, BinaryExpr);
ast_node!(MatchingModifierClause, MatchingModifierClause);
ast_node!(NumberLiteral, NumberLiteral);
ast_node!(StringExpr, StringExpr);

/// Expression: any node that produces a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Aggregate(AggregateExpr),
    Binary(BinaryExpr),
    FunctionCall(FunctionCall),
    Matrix(MatrixSelector),
    Number(NumberLiteral),
    Offset(OffsetExpr),
    Paren(ParenExpr),
    StepInvariant(StepInvariantExpr),
    String(StringExpr),
    Subquery(SubqueryExpr),
    Unary(UnaryExpr),
    Vector(VectorSelector),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::AggregateExpr => AggregateExpr::cast(node).map(Expr::Aggregate),
            SyntaxKind::BinaryExpr => BinaryExpr::cast(node).map(Expr::Binary),
            SyntaxKind::FunctionCall => FunctionCall::cast(node).map(Expr::FunctionCall),
            SyntaxKind::MatrixSelector => MatrixSelector::cast(node).map(Expr::Matrix),
            SyntaxKind::NumberLiteral => NumberLiteral::cast(node).map(Expr::Number),
            SyntaxKind::OffsetExpr => OffsetExpr::cast(node).map(Expr::Offset),
            SyntaxKind::ParenExpr => ParenExpr::cast(node).map(Expr::Paren),
            SyntaxKind::StepInvariantExpr => {
                StepInvariantExpr::cast(node).map(Expr::StepInvariant)
            }
            SyntaxKind::StringExpr => StringExpr::cast(node).map(Expr::String),
            SyntaxKind::SubqueryExpr => SubqueryExpr::cast(node).map(Expr::Subquery),
            SyntaxKind::UnaryExpr => UnaryExpr::cast(node).map(Expr::Unary),
            SyntaxKind::VectorSelector => VectorSelector::cast(node).map(Expr::Vector),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Expr::Aggregate(n) => n.as_cst(),
            Expr::Binary(n) => n.as_cst(),
            Expr::FunctionCall(n) => n.as_cst(),
            Expr::Matrix(n) => n.as_cst(),
            Expr::Number(n) => n.as_cst(),
            Expr::Offset(n) => n.as_cst(),
            Expr::Paren(n) => n.as_cst(),
            Expr::StepInvariant(n) => n.as_cst(),
            Expr::String(n) => n.as_cst(),
            Expr::Subquery(n) => n.as_cst(),
            Expr::Unary(n) => n.as_cst(),
            Expr::Vector(n) => n.as_cst(),
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.as_cst().kind()
    }
}

fn first_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| !t.kind().is_trivia())
}

fn token_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == kind)
}

fn inner_expr(node: &SyntaxNode) -> Option<Expr> {
    node.children().find_map(Expr::cast)
}

impl Root {
    pub fn expr(&self) -> Option<Expr> {
        inner_expr(&self.0)
    }
}

impl AggregateExpr {
    pub fn op(&self) -> Option<AggregateOp> {
        self.0.children().find_map(AggregateOp::cast)
    }

    /// Grouping modifiers in source order. Both `sum by (a) (x)` and `sum (x) by (a)` are valid.
    pub fn modifiers(&self) -> impl Iterator<Item = AggregateModifier> + '_ {
        self.0.children().filter_map(AggregateModifier::cast)
    }

    pub fn body(&self) -> Option<FunctionCallBody> {
        self.0.children().find_map(FunctionCallBody::cast)
    }
}

impl AggregateOp {
    pub fn token(&self) -> Option<SyntaxToken> {
        first_token(&self.0)
    }

    pub fn kind(&self) -> Option<SyntaxKind> {
        self.token().map(|t| t.kind())
    }
}

impl AggregateModifier {
    pub fn keyword(&self) -> Option<SyntaxToken> {
        first_token(&self.0)
            .filter(|t| matches!(t.kind(), SyntaxKind::KwBy | SyntaxKind::KwWithout))
    }

    pub fn is_by(&self) -> bool {
        self.keyword().is_some_and(|t| t.kind() == SyntaxKind::KwBy)
    }

    pub fn is_without(&self) -> bool {
        self.keyword()
            .is_some_and(|t| t.kind() == SyntaxKind::KwWithout)
    }

    pub fn labels(&self) -> Option<GroupingLabels> {
        self.0.children().find_map(GroupingLabels::cast)
    }
}

impl GroupingLabels {
    /// Label names with quotes stripped, in source order.
    pub fn names(&self) -> impl Iterator<Item = String> + '_ {
        self.0.children().filter_map(|node| match node.kind() {
            SyntaxKind::LabelName => LabelName::cast(node).and_then(|n| n.name()),
            SyntaxKind::QuotedLabelName => QuotedLabelName::cast(node).and_then(|n| n.name()),
            _ => None,
        })
    }
}

impl LabelName {
    pub fn name(&self) -> Option<String> {
        first_token(&self.0).map(|t| t.text().to_string())
    }
}

impl QuotedLabelName {
    pub fn token(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.0, SyntaxKind::StringLiteral)
    }

    /// Name without the surrounding quotes.
    pub fn name(&self) -> Option<String> {
        self.token().map(|t| unquote(t.text()).to_string())
    }
}

impl FunctionCall {
    pub fn name(&self) -> Option<SyntaxToken> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::FunctionIdentifier)
            .and_then(|n| token_of_kind(&n, SyntaxKind::Identifier))
    }

    pub fn body(&self) -> Option<FunctionCallBody> {
        self.0.children().find_map(FunctionCallBody::cast)
    }
}

impl FunctionCallBody {
    pub fn args(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }
}

impl VectorSelector {
    pub fn metric(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.0, SyntaxKind::Identifier)
    }

    pub fn matchers(&self) -> Option<LabelMatchers> {
        self.0.children().find_map(LabelMatchers::cast)
    }
}

/// One entry inside `{...}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Matcher {
    Unquoted(UnquotedLabelMatcher),
    Quoted(QuotedLabelMatcher),
    /// `{"metric_name"}`: a bare quoted name selects the metric.
    MetricName(QuotedLabelName),
}

impl Matcher {
    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Matcher::Unquoted(n) => n.as_cst(),
            Matcher::Quoted(n) => n.as_cst(),
            Matcher::MetricName(n) => n.as_cst(),
        }
    }
}

impl LabelMatchers {
    /// Matchers in source order.
    pub fn matchers(&self) -> impl Iterator<Item = Matcher> + '_ {
        self.0.children().filter_map(|node| match node.kind() {
            SyntaxKind::UnquotedLabelMatcher => {
                UnquotedLabelMatcher::cast(node).map(Matcher::Unquoted)
            }
            SyntaxKind::QuotedLabelMatcher => QuotedLabelMatcher::cast(node).map(Matcher::Quoted),
            SyntaxKind::QuotedLabelName => QuotedLabelName::cast(node).map(Matcher::MetricName),
            _ => None,
        })
    }
}

impl UnquotedLabelMatcher {
    pub fn label(&self) -> Option<String> {
        self.0
            .children()
            .find_map(LabelName::cast)
            .and_then(|n| n.name())
    }

    pub fn operator(&self) -> Option<MatchOp> {
        self.0
            .children()
            .find_map(MatchOperator::cast)
            .and_then(|n| n.op())
    }

    pub fn value(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.0, SyntaxKind::StringLiteral)
    }
}

impl QuotedLabelMatcher {
    pub fn label(&self) -> Option<String> {
        self.0
            .children()
            .find_map(QuotedLabelName::cast)
            .and_then(|n| n.name())
    }

    pub fn operator(&self) -> Option<MatchOp> {
        self.0
            .children()
            .find_map(MatchOperator::cast)
            .and_then(|n| n.op())
    }

    pub fn value(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.0, SyntaxKind::StringLiteral)
    }
}

impl MatchOperator {
    pub fn op(&self) -> Option<MatchOp> {
        let op = match first_token(&self.0)?.kind() {
            SyntaxKind::EqlSingle => MatchOp::Equal,
            SyntaxKind::Neq => MatchOp::NotEqual,
            SyntaxKind::EqlRegex => MatchOp::RegexMatch,
            SyntaxKind::NeqRegex => MatchOp::NotRegexMatch,
            _ => return None,
        };
        Some(op)
    }
}

impl MatrixSelector {
    pub fn expr(&self) -> Option<Expr> {
        inner_expr(&self.0)
    }

    pub fn range(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::Duration | SyntaxKind::Number))
    }
}

impl SubqueryExpr {
    pub fn expr(&self) -> Option<Expr> {
        inner_expr(&self.0)
    }

    fn durations(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| matches!(t.kind(), SyntaxKind::Duration | SyntaxKind::Number))
    }

    pub fn range(&self) -> Option<SyntaxToken> {
        self.durations().next()
    }

    pub fn step(&self) -> Option<SyntaxToken> {
        self.durations().nth(1)
    }
}

impl OffsetExpr {
    pub fn expr(&self) -> Option<Expr> {
        inner_expr(&self.0)
    }

    pub fn duration(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::Duration | SyntaxKind::Number))
    }
}

impl StepInvariantExpr {
    pub fn expr(&self) -> Option<Expr> {
        inner_expr(&self.0)
    }
}

impl ParenExpr {
    pub fn expr(&self) -> Option<Expr> {
        inner_expr(&self.0)
    }
}

impl UnaryExpr {
    pub fn operator(&self) -> Option<SyntaxToken> {
        first_token(&self.0)
    }

    pub fn expr(&self) -> Option<Expr> {
        inner_expr(&self.0)
    }
}

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).next()
    }

    pub fn rhs(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| super::cst::token_sets::BINARY_OPS.contains(t.kind()))
    }

    pub fn has_bool_modifier(&self) -> bool {
        self.0
            .children()
            .any(|n| n.kind() == SyntaxKind::BoolModifier)
    }
}

impl NumberLiteral {
    pub fn value(&self) -> Option<SyntaxToken> {
        first_token(&self.0)
    }
}

impl StringExpr {
    pub fn value(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.0, SyntaxKind::StringLiteral)
    }
}
