use std::fmt::Write;

use indoc::indoc;

use super::cst::SyntaxKind;
use super::lexer::{double_quoted_body, lex, token_text, unquote};

fn tokens(src: &str) -> String {
    let mut out = String::new();
    for token in lex(src) {
        writeln!(out, "{:?} {:?}", token.kind, token_text(src, &token))
            .expect("String write never fails");
    }
    out
}

fn kinds(src: &str) -> Vec<SyntaxKind> {
    lex(src)
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| !k.is_trivia())
        .collect()
}

#[test]
fn selector_with_matchers() {
    insta::assert_snapshot!(tokens(r#"up{job="api",env!~'dev'}"#), @r#"
    Identifier "up"
    BraceOpen "{"
    Identifier "job"
    EqlSingle "="
    StringLiteral "\"api\""
    Comma ","
    Identifier "env"
    NeqRegex "!~"
    StringLiteral "'dev'"
    BraceClose "}"
    "#);
}

#[test]
fn aggregation_with_range() {
    insta::assert_snapshot!(tokens("sum by (job) (rate(http_requests_total[5m]))"), @r#"
    Sum "sum"
    Whitespace " "
    KwBy "by"
    Whitespace " "
    ParenOpen "("
    Identifier "job"
    ParenClose ")"
    Whitespace " "
    ParenOpen "("
    Identifier "rate"
    ParenOpen "("
    Identifier "http_requests_total"
    BracketOpen "["
    Duration "5m"
    BracketClose "]"
    ParenClose ")"
    ParenClose ")"
    "#);
}

#[test]
fn keywords_ignore_case() {
    assert_eq!(
        kinds("SUM Count_Values BY without OFFSET bool"),
        [
            SyntaxKind::Sum,
            SyntaxKind::CountValues,
            SyntaxKind::KwBy,
            SyntaxKind::KwWithout,
            SyntaxKind::KwOffset,
            SyntaxKind::KwBool,
        ]
    );
}

#[test]
fn keyword_prefix_is_identifier() {
    assert_eq!(
        kinds("summary bygone counter offsets"),
        [SyntaxKind::Identifier; 4]
    );
}

#[test]
fn recording_rule_name() {
    insta::assert_snapshot!(tokens("job:http_requests:rate5m"), @r#"Identifier "job:http_requests:rate5m""#);
}

#[test]
fn numbers_and_durations() {
    assert_eq!(
        kinds("42 1.5e3 .5 0x1F 5m 1h30m 100ms"),
        [
            SyntaxKind::Number,
            SyntaxKind::Number,
            SyntaxKind::Number,
            SyntaxKind::Number,
            SyntaxKind::Duration,
            SyntaxKind::Duration,
            SyntaxKind::Duration,
        ]
    );
}

#[test]
fn operators() {
    assert_eq!(
        kinds("= != =~ !~ == > >= < <= + - * / % ^"),
        [
            SyntaxKind::EqlSingle,
            SyntaxKind::Neq,
            SyntaxKind::EqlRegex,
            SyntaxKind::NeqRegex,
            SyntaxKind::Eql,
            SyntaxKind::Gtr,
            SyntaxKind::Gte,
            SyntaxKind::Lss,
            SyntaxKind::Lte,
            SyntaxKind::Add,
            SyntaxKind::Sub,
            SyntaxKind::Mul,
            SyntaxKind::Div,
            SyntaxKind::Mod,
            SyntaxKind::Pow,
        ]
    );
}

#[test]
fn string_with_escaped_quote() {
    insta::assert_snapshot!(tokens(r#""a\"b""#), @r#"StringLiteral "\"a\\\"b\"""#);
}

#[test]
fn comments_and_newlines() {
    let input = indoc! {"
        # header
        up # trailing
    "};

    insta::assert_snapshot!(tokens(input), @r##"
    LineComment "# header"
    Newline "\n"
    Identifier "up"
    Whitespace " "
    LineComment "# trailing"
    Newline "\n"
    "##);
}

#[test]
fn garbage_is_coalesced() {
    insta::assert_snapshot!(tokens("up $$ down"), @r#"
    Identifier "up"
    Whitespace " "
    Garbage "$$"
    Whitespace " "
    Identifier "down"
    "#);
}

#[test]
fn trailing_garbage() {
    insta::assert_snapshot!(tokens("up$"), @r#"
    Identifier "up"
    Garbage "$"
    "#);
}

#[test]
fn empty_input() {
    assert!(lex("").is_empty());
}

#[test]
fn unquote_strips_matching_quotes() {
    assert_eq!(unquote(r#""api""#), "api");
    assert_eq!(unquote("'api'"), "api");
    assert_eq!(unquote("`a\\b`"), "a\\b");
    assert_eq!(unquote(r#""a\"b""#), r#"a\"b"#);
}

#[test]
fn unquote_leaves_unquoted_text() {
    assert_eq!(unquote("api"), "api");
    assert_eq!(unquote(r#""api'"#), r#""api'"#);
    assert_eq!(unquote(r#"""#), r#"""#);
    assert_eq!(unquote(""), "");
}

#[test]
fn double_quoted_body_keeps_double_quoted_text() {
    assert_eq!(double_quoted_body(r#""a\"b""#), r#"a\"b"#);
    assert_eq!(double_quoted_body("api"), "api");
}

#[test]
fn double_quoted_body_from_single_quotes() {
    assert_eq!(double_quoted_body(r#"'say "hi"'"#), r#"say \"hi\""#);
    assert_eq!(double_quoted_body(r"'it\'s'"), "it's");
    assert_eq!(double_quoted_body(r"'a\nb'"), r"a\nb");
}

#[test]
fn double_quoted_body_from_backticks() {
    assert_eq!(double_quoted_body(r"`\d+`"), r"\\d+");
    assert_eq!(double_quoted_body(r#"`say "hi"`"#), r#"say \"hi\""#);
    assert_eq!(double_quoted_body("`a\nb`"), "a\\nb");
}
