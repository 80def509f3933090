//! Syntax kinds for PromQL.
//!
//! `SyntaxKind` serves dual roles: token kinds (from lexer) and node kinds (from parser).
//! Logos derives token recognition; node kinds lack token/regex attributes.
//! `PromQl` implements Rowan's `Language` trait for tree construction.

use logos::Logos;
use rowan::Language;

/// All token and node kinds. Tokens first, then nodes, then `__LAST` sentinel.
/// `#[repr(u16)]` enables safe transmute in `kind_from_raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token("@")]
    At,

    /// `=` in label matchers
    #[token("=")]
    EqlSingle,

    /// `!=` in label matchers and as a comparison operator
    #[token("!=")]
    Neq,

    #[token("=~")]
    EqlRegex,

    #[token("!~")]
    NeqRegex,

    #[token("==")]
    Eql,

    #[token(">")]
    Gtr,

    #[token(">=")]
    Gte,

    #[token("<")]
    Lss,

    #[token("<=")]
    Lte,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    Mul,

    #[token("/")]
    Div,

    #[token("%")]
    Mod,

    #[token("^")]
    Pow,

    #[token("and", ignore(case))]
    KwAnd,

    #[token("or", ignore(case))]
    KwOr,

    #[token("unless", ignore(case))]
    KwUnless,

    #[token("atan2", ignore(case))]
    KwAtan2,

    #[token("by", ignore(case))]
    KwBy,

    #[token("without", ignore(case))]
    KwWithout,

    #[token("on", ignore(case))]
    KwOn,

    #[token("ignoring", ignore(case))]
    KwIgnoring,

    #[token("group_left", ignore(case))]
    KwGroupLeft,

    #[token("group_right", ignore(case))]
    KwGroupRight,

    #[token("offset", ignore(case))]
    KwOffset,

    #[token("bool", ignore(case))]
    KwBool,

    // Aggregation operators
    #[token("sum", ignore(case))]
    Sum,

    #[token("avg", ignore(case))]
    Avg,

    #[token("count", ignore(case))]
    Count,

    #[token("min", ignore(case))]
    Min,

    #[token("max", ignore(case))]
    Max,

    #[token("group", ignore(case))]
    Group,

    #[token("stddev", ignore(case))]
    Stddev,

    #[token("stdvar", ignore(case))]
    Stdvar,

    #[token("topk", ignore(case))]
    Topk,

    #[token("bottomk", ignore(case))]
    Bottomk,

    #[token("count_values", ignore(case))]
    CountValues,

    #[token("quantile", ignore(case))]
    Quantile,

    #[token("limitk", ignore(case))]
    LimitK,

    #[token("limit_ratio", ignore(case))]
    LimitRatio,

    /// Decimal, float with exponent, or hex. `Inf`/`NaN` lex as identifiers.
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    Number,

    /// `5m`, `1h30m`, `100ms`
    #[regex(r"([0-9]+(ms|s|m|h|d|w|y))+")]
    Duration,

    /// Double, single or backtick quoted. Quotes stay part of the token text.
    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    #[regex(r"'(?:[^'\\]|\\.)*'")]
    #[regex(r"`[^`]*`")]
    StringLiteral,

    /// Metric, label or function name. Colons are allowed after the first character
    /// (recording rules). Defined after keywords so they take precedence.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_:]*")]
    Identifier,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[token("\n")]
    #[token("\r\n")]
    Newline,

    #[regex(r"#[^\n]*", allow_greedy = true)]
    LineComment,

    /// Coalesced unrecognized characters
    Garbage,
    Error,

    // --- Node kinds (non-terminals) ---
    Root,
    AggregateExpr,
    AggregateOp,
    AggregateModifier,
    GroupingLabels,
    LabelName,
    QuotedLabelName,
    FunctionCall,
    FunctionIdentifier,
    FunctionCallBody,
    VectorSelector,
    LabelMatchers,
    UnquotedLabelMatcher,
    QuotedLabelMatcher,
    MatchOp,
    MatrixSelector,
    SubqueryExpr,
    OffsetExpr,
    StepInvariantExpr,
    ParenExpr,
    UnaryExpr,
    BinaryExpr,
    BoolModifier,
    MatchingModifierClause,
    NumberLiteral,
    StringExpr,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | LineComment)
    }

    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Error | Garbage)
    }

    /// Words that the lexer claims as keywords but that PromQL still accepts as label names.
    #[inline]
    pub fn is_keyword(self) -> bool {
        token_sets::KEYWORDS.contains(self)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PromQl {}

impl Language for PromQl {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for Rowan types parameterized by our language.
pub type SyntaxNode = rowan::SyntaxNode<PromQl>;
pub type SyntaxToken = rowan::SyntaxToken<PromQl>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// 128-bit bitset of `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    /// Creates an empty token set.
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Panics at compile time if any kind's discriminant >= 128.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u128;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 128, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn single(kind: SyntaxKind) -> Self {
        let kind = kind as u16;
        assert!(kind < 128, "SyntaxKind value exceeds TokenSet capacity");
        TokenSet(1 << kind)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 128 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for i in 0..128u16 {
            if self.0 & (1 << i) != 0 && i < __LAST as u16 {
                let kind: SyntaxKind = unsafe { std::mem::transmute(i) };
                list.entry(&kind);
            }
        }
        list.finish()
    }
}

/// Pre-defined token sets for the parser.
pub mod token_sets {
    use super::*;

    pub const AGGREGATE_OPS: TokenSet = TokenSet::new(&[
        Sum,
        Avg,
        Count,
        Min,
        Max,
        Group,
        Stddev,
        Stdvar,
        Topk,
        Bottomk,
        CountValues,
        Quantile,
        LimitK,
        LimitRatio,
    ]);

    pub const KEYWORDS: TokenSet = TokenSet::new(&[
        KwAnd,
        KwOr,
        KwUnless,
        KwAtan2,
        KwBy,
        KwWithout,
        KwOn,
        KwIgnoring,
        KwGroupLeft,
        KwGroupRight,
        KwOffset,
        KwBool,
    ])
    .union(AGGREGATE_OPS);

    /// Tokens accepted where a label name is expected.
    pub const LABEL_NAME: TokenSet = KEYWORDS.union(TokenSet::single(Identifier));

    pub const MATCH_OPS: TokenSet = TokenSet::new(&[EqlSingle, Neq, EqlRegex, NeqRegex]);

    pub const COMPARISON_OPS: TokenSet = TokenSet::new(&[Eql, Neq, Gtr, Gte, Lss, Lte]);

    pub const BINARY_OPS: TokenSet = TokenSet::new(&[
        Add, Sub, Mul, Div, Mod, Pow, KwAtan2, KwAnd, KwOr, KwUnless,
    ])
    .union(COMPARISON_OPS);

    /// FIRST set of expr.
    pub const EXPR_FIRST: TokenSet = TokenSet::new(&[
        ParenOpen,
        BraceOpen,
        Add,
        Sub,
        Number,
        StringLiteral,
        Identifier,
    ])
    .union(AGGREGATE_OPS);

    pub const TRIVIA: TokenSet = TokenSet::new(&[Whitespace, Newline, LineComment]);

    /// Tokens that close an enclosing production; never consumed as garbage.
    pub const EXPR_RECOVERY: TokenSet =
        TokenSet::new(&[ParenClose, BracketClose, BraceClose, Comma]);
}
