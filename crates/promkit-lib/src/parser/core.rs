//! Token cursor and tree builder driven by the grammar.
//!
//! Whitespace and comments never reach the grammar. They wait in a side
//! buffer and are flushed into whichever node opens next, or into the root.

use std::cell::Cell;

use rowan::{Checkpoint, GreenNodeBuilder, TextRange, TextSize};

use super::ast::Root;
use super::cst::{SyntaxKind, SyntaxNode, TokenSet};
use super::lexer::{Token, token_text};
use crate::Error;
use crate::diagnostics::{DiagnosticBuilder, DiagnosticKind, Diagnostics};

/// Lookaheads allowed without consuming a token or changing depth.
pub(super) const LOOKAHEAD_LIMIT: u32 = 256;

#[derive(Debug)]
pub struct ParseResult {
    pub root: Root,
    pub diagnostics: Diagnostics,
    pub exec_fuel_consumed: u32,
}

/// Limits on parse work. `None` means unlimited.
#[derive(Debug, Clone, Copy, Default)]
struct Budget {
    steps: Option<u32>,
    steps_left: Option<u32>,
    max_depth: Option<u32>,
}

impl Budget {
    /// Charges one token. False once the step limit is spent.
    fn spend_step(&mut self) -> bool {
        match &mut self.steps_left {
            Some(0) => false,
            Some(left) => {
                *left -= 1;
                true
            }
            None => true,
        }
    }

    fn steps_used(&self) -> u32 {
        match (self.steps, self.steps_left) {
            (Some(steps), Some(left)) => steps.saturating_sub(left),
            _ => 0,
        }
    }

    fn allows_depth(&self, depth: u32) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenDelimiter {
    kind: SyntaxKind,
    span: TextRange,
}

pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    pending_trivia: Vec<Token>,
    builder: GreenNodeBuilder<'static>,
    diagnostics: Diagnostics,
    depth: u32,
    /// Start of the last reported error; a second error there is dropped.
    last_error_at: Option<TextSize>,
    open_delimiters: Vec<OpenDelimiter>,
    pub(super) lookahead_budget: Cell<u32>,
    budget: Budget,
    aborted: Option<Error>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            pending_trivia: Vec::new(),
            builder: GreenNodeBuilder::new(),
            diagnostics: Diagnostics::new(),
            depth: 0,
            last_error_at: None,
            open_delimiters: Vec::new(),
            lookahead_budget: Cell::new(LOOKAHEAD_LIMIT),
            budget: Budget::default(),
            aborted: None,
        }
    }

    /// Caps the number of tokens consumed.
    pub fn with_exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.budget.steps = limit;
        self.budget.steps_left = limit;
        self
    }

    /// Caps expression nesting.
    pub fn with_recursion_fuel(mut self, limit: Option<u32>) -> Self {
        self.budget.max_depth = limit;
        self
    }

    pub fn parse(mut self) -> Result<ParseResult, Error> {
        self.parse_root();
        self.flush_trivia();
        if let Some(err) = self.aborted.take() {
            return Err(err);
        }

        let green = self.builder.finish();
        let root = Root::cast(SyntaxNode::new_root(green)).expect("parser always produces Root");
        Ok(ParseResult {
            root,
            diagnostics: self.diagnostics,
            exec_fuel_consumed: self.budget.steps_used(),
        })
    }

    /// Keeps the first error; the parse unwinds from here.
    fn abort(&mut self, err: Error) {
        if self.aborted.is_none() {
            self.aborted = Some(err);
        }
    }

    // --- Cursor ---

    pub(super) fn current(&mut self) -> SyntaxKind {
        self.buffer_trivia();
        self.ensure_progress();
        self.tokens
            .get(self.pos)
            .map_or(SyntaxKind::Error, |t| t.kind)
    }

    pub(super) fn current_span(&mut self) -> TextRange {
        self.buffer_trivia();
        self.tokens
            .get(self.pos)
            .map_or_else(|| TextRange::empty(self.eof_offset()), |t| t.span)
    }

    /// Source text of the current token, empty at EOF.
    pub(super) fn current_text(&mut self) -> &'src str {
        self.buffer_trivia();
        self.tokens
            .get(self.pos)
            .map_or("", |token| token_text(self.source, token))
    }

    fn eof_offset(&self) -> TextSize {
        TextSize::from(self.source.len() as u32)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// End of input, or a limit was hit and the parse is unwinding.
    pub(super) fn should_stop(&self) -> bool {
        self.at_end() || self.aborted.is_some()
    }

    pub(super) fn currently_is(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(super) fn currently_is_one_of(&mut self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    /// Kind of the `n`th non-trivia token from the cursor.
    fn nth_significant(&mut self, n: usize) -> SyntaxKind {
        self.buffer_trivia();
        self.tokens[self.pos..]
            .iter()
            .map(|t| t.kind)
            .filter(|kind| !kind.is_trivia())
            .nth(n)
            .unwrap_or(SyntaxKind::Error)
    }

    pub(super) fn next_is(&mut self, kind: SyntaxKind) -> bool {
        self.nth_significant(1) == kind
    }

    pub(super) fn next_is_one_of(&mut self, set: TokenSet) -> bool {
        set.contains(self.nth_significant(1))
    }

    /// Whether a `:` appears before the bracket opened at the current token is closed.
    pub(super) fn bracket_has_colon(&mut self) -> bool {
        self.buffer_trivia();
        self.tokens[self.pos..]
            .iter()
            .skip(1)
            .map(|t| t.kind)
            .take_while(|kind| {
                !matches!(
                    kind,
                    SyntaxKind::BracketClose | SyntaxKind::BracketOpen | SyntaxKind::ParenClose
                )
            })
            .any(|kind| kind == SyntaxKind::Colon)
    }

    // --- Tree building ---

    pub(super) fn buffer_trivia(&mut self) {
        while let Some(&token) = self.tokens.get(self.pos).filter(|t| t.kind.is_trivia()) {
            self.pending_trivia.push(token);
            self.pos += 1;
        }
    }

    pub(super) fn flush_trivia(&mut self) {
        for token in std::mem::take(&mut self.pending_trivia) {
            self.push_token(token);
        }
    }

    fn push_token(&mut self, token: Token) {
        self.builder
            .token(token.kind.into(), token_text(self.source, &token));
    }

    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(kind.into());
    }

    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// Trivia before the checkpoint stays outside any node wrapped at it.
    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.buffer_trivia();
        self.flush_trivia();
        self.builder.checkpoint()
    }

    pub(super) fn bump(&mut self) {
        assert!(!self.at_end(), "bump called at EOF");
        self.lookahead_budget.set(LOOKAHEAD_LIMIT);
        if !self.budget.spend_step() {
            self.abort(Error::ExecFuelExhausted);
        }

        self.flush_trivia();
        let token = self.tokens[self.pos];
        self.push_token(token);
        self.pos += 1;
    }

    pub(super) fn eat(&mut self, kind: SyntaxKind) -> bool {
        let found = self.currently_is(kind);
        if found {
            self.bump();
        }
        found
    }

    /// Wraps the current token in a node of `kind`.
    pub(super) fn bump_as(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    /// On mismatch: emit diagnostic but don't consume.
    pub(super) fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error_msg(DiagnosticKind::UnexpectedToken, format!("expected {}", what));
        false
    }

    // --- Errors ---

    fn first_error_at(&mut self, pos: TextSize) -> bool {
        self.last_error_at.replace(pos) != Some(pos)
    }

    /// Diagnostic at the current token. Inside a delimiter it suppresses
    /// follow-up errors up to the end of input.
    fn report_here(&mut self, kind: DiagnosticKind) -> Option<DiagnosticBuilder<'_>> {
        let range = self.current_span();
        if !self.first_error_at(range.start()) {
            return None;
        }
        let eof = self.eof_offset();
        let suppression = self
            .open_delimiters
            .last()
            .map_or(range, |open| TextRange::new(open.span.start(), eof));
        Some(
            self.diagnostics
                .report(kind, range)
                .suppression_range(suppression),
        )
    }

    pub(super) fn error(&mut self, kind: DiagnosticKind) {
        if let Some(diagnostic) = self.report_here(kind) {
            diagnostic.emit();
        }
    }

    pub(super) fn error_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        if let Some(diagnostic) = self.report_here(kind) {
            diagnostic.message(message).emit();
        }
    }

    pub(super) fn error_and_bump(&mut self, kind: DiagnosticKind) {
        self.error(kind);
        if !self.at_end() {
            self.bump_as(SyntaxKind::Error);
        }
    }

    /// Reports at the current token, then consumes everything up to
    /// `recovery` or EOF into one `Error` node.
    pub(super) fn error_recover(
        &mut self,
        kind: DiagnosticKind,
        message: &str,
        recovery: TokenSet,
    ) {
        let skipping = !self.currently_is_one_of(recovery) && !self.should_stop();
        if skipping {
            self.start_node(SyntaxKind::Error);
        }
        self.error_msg(kind, message);
        if !skipping {
            return;
        }

        while !self.currently_is_one_of(recovery) && !self.should_stop() {
            self.bump();
        }
        self.finish_node();
    }

    // --- Nesting ---

    pub(super) fn enter_recursion(&mut self) -> bool {
        if !self.budget.allows_depth(self.depth) {
            self.abort(Error::RecursionLimitExceeded);
            return false;
        }
        self.depth += 1;
        self.lookahead_budget.set(LOOKAHEAD_LIMIT);
        true
    }

    pub(super) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.lookahead_budget.set(LOOKAHEAD_LIMIT);
    }

    pub(super) fn push_delimiter(&mut self, kind: SyntaxKind) {
        let span = self.current_span();
        self.open_delimiters.push(OpenDelimiter { kind, span });
    }

    /// Expects the closer for the innermost open delimiter and pops it.
    ///
    /// A missing closer is reported over the whole unclosed region, with a
    /// pointer to the opener.
    pub(super) fn close_delimiter(&mut self, closer: SyntaxKind) {
        let open = self.open_delimiters.pop();
        if self.eat(closer) {
            return;
        }
        let Some(open) = open else {
            self.error(DiagnosticKind::UnexpectedToken);
            return;
        };

        let (kind, text) = match open.kind {
            SyntaxKind::ParenOpen => (DiagnosticKind::UnclosedParen, "`(`"),
            SyntaxKind::BraceOpen => (DiagnosticKind::UnclosedBrace, "`{`"),
            _ => (DiagnosticKind::UnclosedBracket, "`[`"),
        };
        let current = self.current_span();
        if !self.first_error_at(current.start()) {
            return;
        }
        self.diagnostics
            .report(kind, TextRange::new(open.span.start(), current.end()))
            .related_to(format!("{} opened here", text), open.span)
            .emit();
    }
}
