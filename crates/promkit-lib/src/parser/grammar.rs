//! Grammar productions for PromQL.
//!
//! Binary expressions use precedence climbing. Postfix modifiers (`[range]`,
//! `[range:step]`, `offset`, `@`) wrap the operand retroactively via checkpoints.

use rowan::Checkpoint;

use super::core::Parser;
use super::cst::token_sets::{
    AGGREGATE_OPS, BINARY_OPS, EXPR_FIRST, EXPR_RECOVERY, LABEL_NAME, MATCH_OPS,
};
use super::cst::{SyntaxKind, TokenSet};
use crate::diagnostics::DiagnosticKind;

/// Unary `+`/`-` bind tighter than `*` but looser than `^`: `-a^b` is `-(a^b)`.
const UNARY_OPERAND_BP: u8 = 11;

const GROUPING: TokenSet = TokenSet::new(&[SyntaxKind::KwBy, SyntaxKind::KwWithout]);
const VECTOR_MATCHING: TokenSet = TokenSet::new(&[SyntaxKind::KwOn, SyntaxKind::KwIgnoring]);
const GROUP_SIDE: TokenSet =
    TokenSet::new(&[SyntaxKind::KwGroupLeft, SyntaxKind::KwGroupRight]);
const DURATION: TokenSet = TokenSet::new(&[SyntaxKind::Duration, SyntaxKind::Number]);
const LIST_LABEL: TokenSet = LABEL_NAME.union(TokenSet::single(SyntaxKind::StringLiteral));

/// Left and right binding power of an infix operator.
fn infix_binding_power(kind: SyntaxKind) -> Option<(u8, u8)> {
    use SyntaxKind::*;

    if !BINARY_OPS.contains(kind) {
        return None;
    }
    let bp = match kind {
        KwOr => (1, 2),
        KwAnd | KwUnless => (3, 4),
        Eql | Neq | Gtr | Gte | Lss | Lte => (5, 6),
        Add | Sub => (7, 8),
        Mul | Div | Mod | KwAtan2 => (9, 10),
        // right associative
        Pow => (12, 11),
        _ => return None,
    };
    Some(bp)
}

fn closer_text(closer: SyntaxKind) -> &'static str {
    match closer {
        SyntaxKind::ParenClose => "`)`",
        SyntaxKind::BraceClose => "`}`",
        _ => "`]`",
    }
}

impl<'src> Parser<'src> {
    pub fn parse_root(&mut self) {
        self.start_node(SyntaxKind::Root);

        self.buffer_trivia();
        if !self.should_stop() {
            self.parse_expr();
        }

        self.buffer_trivia();
        if !self.should_stop() {
            self.start_node(SyntaxKind::Error);
            self.error_msg(
                DiagnosticKind::UnexpectedToken,
                "a query is a single expression",
            );
            while !self.should_stop() {
                self.bump();
                self.buffer_trivia();
            }
            self.finish_node();
        }

        self.flush_trivia();
        self.finish_node();
    }

    pub(super) fn parse_expr(&mut self) {
        self.parse_expr_bp(0);
    }

    fn parse_expr_bp(&mut self, min_bp: u8) {
        if !self.enter_recursion() {
            return;
        }

        let checkpoint = self.checkpoint();
        self.parse_operand();

        loop {
            let Some((left_bp, right_bp)) = infix_binding_power(self.current()) else {
                break;
            };
            if left_bp < min_bp || self.should_stop() {
                break;
            }

            self.start_node_at(checkpoint, SyntaxKind::BinaryExpr);
            self.bump();
            if self.currently_is(SyntaxKind::KwBool) {
                self.bump_as(SyntaxKind::BoolModifier);
            }
            if self.currently_is_one_of(VECTOR_MATCHING) {
                self.parse_matching_modifier();
            }
            self.parse_expr_bp(right_bp);
            self.finish_node();
        }

        self.exit_recursion();
    }

    fn parse_operand(&mut self) {
        if self.currently_is(SyntaxKind::Add) || self.currently_is(SyntaxKind::Sub) {
            self.start_node(SyntaxKind::UnaryExpr);
            self.bump();
            self.parse_expr_bp(UNARY_OPERAND_BP);
            self.finish_node();
            return;
        }

        let checkpoint = self.checkpoint();
        if !self.parse_primary() {
            return;
        }

        loop {
            match self.current() {
                SyntaxKind::BracketOpen => self.parse_range_suffix(checkpoint),
                SyntaxKind::KwOffset => self.parse_offset_suffix(checkpoint),
                SyntaxKind::At => self.parse_at_suffix(checkpoint),
                _ => break,
            }
            if self.should_stop() {
                break;
            }
        }
    }

    /// Returns `false` when nothing resembling an expression was found.
    fn parse_primary(&mut self) -> bool {
        let kind = self.current();
        match kind {
            SyntaxKind::ParenOpen => self.parse_paren_expr(),
            SyntaxKind::BraceOpen => self.parse_vector_selector(),
            SyntaxKind::Number => self.bump_as(SyntaxKind::NumberLiteral),
            SyntaxKind::StringLiteral => self.bump_as(SyntaxKind::StringExpr),
            SyntaxKind::Identifier => {
                if self.next_is(SyntaxKind::ParenOpen) {
                    self.parse_function_call();
                } else if is_special_number(self.current_text())
                    && !self.next_is(SyntaxKind::BraceOpen)
                {
                    self.bump_as(SyntaxKind::NumberLiteral);
                } else {
                    self.parse_vector_selector();
                }
            }
            _ if AGGREGATE_OPS.contains(kind) => self.parse_aggregate_expr(),
            _ => {
                if self.currently_is_one_of(EXPR_RECOVERY) || self.should_stop() {
                    self.error(DiagnosticKind::ExpectedExpression);
                } else {
                    self.error_and_bump(DiagnosticKind::ExpectedExpression);
                }
                return false;
            }
        }
        true
    }

    fn parse_paren_expr(&mut self) {
        self.assert_current(SyntaxKind::ParenOpen);
        self.start_node(SyntaxKind::ParenExpr);
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump();
        self.parse_expr();
        self.skip_to_closer(SyntaxKind::ParenClose);
        self.close_delimiter(SyntaxKind::ParenClose);
        self.finish_node();
    }

    /// Consumes leftovers after the last element of a delimited group.
    fn skip_to_closer(&mut self, closer: SyntaxKind) {
        if self.currently_is_one_of(EXPR_RECOVERY) || self.should_stop() {
            return;
        }
        let message = format!("expected {}", closer_text(closer));
        self.error_recover(DiagnosticKind::UnexpectedToken, &message, EXPR_RECOVERY);
    }

    /// `metric`, `metric{...}` or `{...}`
    fn parse_vector_selector(&mut self) {
        self.start_node(SyntaxKind::VectorSelector);
        self.eat(SyntaxKind::Identifier);
        if self.currently_is(SyntaxKind::BraceOpen) {
            self.parse_label_matchers();
        }
        self.finish_node();
    }

    fn parse_label_matchers(&mut self) {
        self.assert_current(SyntaxKind::BraceOpen);
        self.start_node(SyntaxKind::LabelMatchers);
        self.push_delimiter(SyntaxKind::BraceOpen);
        self.bump();
        self.parse_list_items(
            SyntaxKind::BraceClose,
            LIST_LABEL,
            DiagnosticKind::ExpectedLabelName,
            Self::parse_label_matcher,
        );
        self.close_delimiter(SyntaxKind::BraceClose);
        self.finish_node();
    }

    /// `label<op>"value"`, `"label"<op>"value"`, or a bare `"metric"`.
    fn parse_label_matcher(&mut self) {
        if self.currently_is(SyntaxKind::StringLiteral) {
            if !self.next_is_one_of(MATCH_OPS) {
                self.bump_as(SyntaxKind::QuotedLabelName);
                return;
            }
            self.start_node(SyntaxKind::QuotedLabelMatcher);
            self.bump_as(SyntaxKind::QuotedLabelName);
        } else {
            self.start_node(SyntaxKind::UnquotedLabelMatcher);
            self.bump_as(SyntaxKind::LabelName);
        }

        if self.currently_is_one_of(MATCH_OPS) {
            self.bump_as(SyntaxKind::MatchOp);
            if !self.eat(SyntaxKind::StringLiteral) {
                self.error(DiagnosticKind::ExpectedString);
            }
        } else {
            self.error(DiagnosticKind::ExpectedMatchOp);
        }
        self.finish_node();
    }

    /// Comma separated items up to (not including) `closer`. Trailing comma allowed.
    fn parse_list_items(
        &mut self,
        closer: SyntaxKind,
        first: TokenSet,
        missing: DiagnosticKind,
        parse_item: fn(&mut Self),
    ) {
        loop {
            let kind = self.current();
            if kind == closer || self.should_stop() {
                break;
            }

            if first.contains(kind) {
                parse_item(self);
            } else if kind == SyntaxKind::Comma {
                self.error(missing);
            } else if EXPR_RECOVERY.contains(kind) {
                break;
            } else {
                let message = format!("found `{}`", self.current_text());
                self.error_recover(missing, &message, EXPR_RECOVERY);
            }

            if self.eat(SyntaxKind::Comma) {
                continue;
            }
            if self.currently_is_one_of(EXPR_RECOVERY) || self.should_stop() {
                continue;
            }
            let message = format!("expected `,` or {}", closer_text(closer));
            self.error_recover(DiagnosticKind::UnexpectedToken, &message, EXPR_RECOVERY);
            self.eat(SyntaxKind::Comma);
        }
    }

    fn parse_aggregate_expr(&mut self) {
        self.start_node(SyntaxKind::AggregateExpr);
        self.bump_as(SyntaxKind::AggregateOp);

        if self.currently_is_one_of(GROUPING) {
            self.parse_aggregate_modifier();
        }

        if self.currently_is(SyntaxKind::ParenOpen) {
            self.parse_function_call_body();
        } else {
            self.error_msg(
                DiagnosticKind::UnexpectedToken,
                "expected `(` after aggregation operator",
            );
        }

        if self.currently_is_one_of(GROUPING) {
            self.parse_aggregate_modifier();
        }

        self.finish_node();
    }

    /// `by (...)` or `without (...)`
    fn parse_aggregate_modifier(&mut self) {
        self.start_node(SyntaxKind::AggregateModifier);
        self.bump();
        self.parse_grouping_labels_required();
        self.finish_node();
    }

    fn parse_grouping_labels_required(&mut self) {
        if self.currently_is(SyntaxKind::ParenOpen) {
            self.parse_grouping_labels();
        } else {
            self.error_msg(
                DiagnosticKind::UnexpectedToken,
                "expected `(` with a list of labels",
            );
        }
    }

    fn parse_grouping_labels(&mut self) {
        self.assert_current(SyntaxKind::ParenOpen);
        self.start_node(SyntaxKind::GroupingLabels);
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump();
        self.parse_list_items(
            SyntaxKind::ParenClose,
            LIST_LABEL,
            DiagnosticKind::ExpectedLabelName,
            Self::parse_grouping_label,
        );
        self.close_delimiter(SyntaxKind::ParenClose);
        self.finish_node();
    }

    fn parse_grouping_label(&mut self) {
        if self.currently_is(SyntaxKind::StringLiteral) {
            self.bump_as(SyntaxKind::QuotedLabelName);
        } else {
            self.bump_as(SyntaxKind::LabelName);
        }
    }

    fn parse_function_call(&mut self) {
        self.start_node(SyntaxKind::FunctionCall);
        self.bump_as(SyntaxKind::FunctionIdentifier);
        self.parse_function_call_body();
        self.finish_node();
    }

    fn parse_function_call_body(&mut self) {
        self.assert_current(SyntaxKind::ParenOpen);
        self.start_node(SyntaxKind::FunctionCallBody);
        self.push_delimiter(SyntaxKind::ParenOpen);
        self.bump();
        self.parse_list_items(
            SyntaxKind::ParenClose,
            EXPR_FIRST,
            DiagnosticKind::ExpectedExpression,
            Self::parse_expr,
        );
        self.close_delimiter(SyntaxKind::ParenClose);
        self.finish_node();
    }

    /// `[5m]` or `[1h:5m]`
    fn parse_range_suffix(&mut self, checkpoint: Checkpoint) {
        let kind = if self.bracket_has_colon() {
            SyntaxKind::SubqueryExpr
        } else {
            SyntaxKind::MatrixSelector
        };

        self.start_node_at(checkpoint, kind);
        self.push_delimiter(SyntaxKind::BracketOpen);
        self.bump();
        self.parse_duration();
        if kind == SyntaxKind::SubqueryExpr {
            self.expect(SyntaxKind::Colon, "`:`");
            if self.currently_is_one_of(DURATION) {
                self.bump();
            }
        }
        self.skip_to_closer(SyntaxKind::BracketClose);
        self.close_delimiter(SyntaxKind::BracketClose);
        self.finish_node();
    }

    fn parse_offset_suffix(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::OffsetExpr);
        self.bump();
        self.eat(SyntaxKind::Sub);
        self.parse_duration();
        self.finish_node();
    }

    /// `@ 1609746000`, `@ start()`, `@ end()`
    fn parse_at_suffix(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::StepInvariantExpr);
        self.bump();

        let kind = self.current();
        let is_fn = kind == SyntaxKind::Identifier
            && is_at_modifier_fn(self.current_text())
            && self.next_is(SyntaxKind::ParenOpen);

        match kind {
            SyntaxKind::Number => self.bump(),
            SyntaxKind::Add | SyntaxKind::Sub => {
                self.bump();
                if !self.eat(SyntaxKind::Number) {
                    self.error_msg(DiagnosticKind::UnexpectedToken, "expected a timestamp");
                }
            }
            SyntaxKind::Identifier if is_fn => {
                self.bump();
                self.push_delimiter(SyntaxKind::ParenOpen);
                self.bump();
                self.close_delimiter(SyntaxKind::ParenClose);
            }
            _ => self.error_msg(
                DiagnosticKind::UnexpectedToken,
                "expected a timestamp, `start()` or `end()` after `@`",
            ),
        }

        self.finish_node();
    }

    fn parse_duration(&mut self) {
        if self.currently_is_one_of(DURATION) {
            self.bump();
        } else {
            self.error(DiagnosticKind::ExpectedDuration);
        }
    }

    /// `on (...)` / `ignoring (...)`, optionally followed by `group_left`/`group_right`.
    fn parse_matching_modifier(&mut self) {
        self.start_node(SyntaxKind::MatchingModifierClause);
        self.bump();
        self.parse_grouping_labels_required();
        if self.currently_is_one_of(GROUP_SIDE) {
            self.bump();
            if self.currently_is(SyntaxKind::ParenOpen) {
                self.parse_grouping_labels();
            }
        }
        self.finish_node();
    }
}

fn is_special_number(text: &str) -> bool {
    text.eq_ignore_ascii_case("inf") || text.eq_ignore_ascii_case("nan")
}

fn is_at_modifier_fn(text: &str) -> bool {
    text.eq_ignore_ascii_case("start") || text.eq_ignore_ascii_case("end")
}
