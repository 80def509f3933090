use crate::parser::cst::{PromQl, SyntaxKind::*, TokenSet, token_sets};
use rowan::Language;

#[test]
fn test_token_set_contains() {
    let set = TokenSet::new(&[ParenOpen, ParenClose, Comma]);
    assert!(set.contains(ParenOpen));
    assert!(set.contains(ParenClose));
    assert!(set.contains(Comma));
    assert!(!set.contains(BraceOpen));
    assert!(!set.contains(Colon));
}

#[test]
fn test_token_set_union() {
    let a = TokenSet::new(&[ParenOpen, ParenClose]);
    let b = TokenSet::new(&[Add, Sub]);
    let c = a.union(b);
    assert!(c.contains(ParenOpen));
    assert!(c.contains(ParenClose));
    assert!(c.contains(Add));
    assert!(c.contains(Sub));
    assert!(!c.contains(Colon));
}

#[test]
fn test_token_set_single() {
    let set = TokenSet::single(Colon);
    assert!(set.contains(Colon));
    assert!(!set.contains(ParenOpen));
}

#[test]
fn test_node_kinds_are_never_contained() {
    let set = TokenSet::new(&[Identifier]);
    assert!(!set.contains(Root));
    assert!(!set.contains(VectorSelector));
}

#[test]
fn test_is_trivia() {
    assert!(Whitespace.is_trivia());
    assert!(Newline.is_trivia());
    assert!(LineComment.is_trivia());
    assert!(!ParenOpen.is_trivia());
    assert!(!Error.is_trivia());
}

#[test]
fn test_syntax_kind_count_under_128() {
    assert!(
        (__LAST as u16) < 128,
        "SyntaxKind has {} variants, exceeds TokenSet capacity of 128",
        __LAST as u16
    );
}

#[test]
fn test_is_error() {
    assert!(Error.is_error());
    assert!(Garbage.is_error());
    assert!(!ParenOpen.is_error());
    assert!(!Identifier.is_error());
    assert!(!Whitespace.is_error());
}

#[test]
fn test_keywords() {
    assert!(KwBy.is_keyword());
    assert!(KwOffset.is_keyword());
    assert!(Sum.is_keyword());
    assert!(LimitRatio.is_keyword());
    assert!(!Identifier.is_keyword());
    assert!(!StringLiteral.is_keyword());
}

#[test]
fn test_label_name_accepts_keywords() {
    assert!(token_sets::LABEL_NAME.contains(Identifier));
    assert!(token_sets::LABEL_NAME.contains(KwOn));
    assert!(token_sets::LABEL_NAME.contains(Group));
    assert!(!token_sets::LABEL_NAME.contains(StringLiteral));
}

#[test]
fn test_binary_ops() {
    for kind in [Add, Sub, Mul, Div, Mod, Pow, KwAtan2, KwAnd, KwOr, KwUnless] {
        assert!(token_sets::BINARY_OPS.contains(kind), "{:?}", kind);
    }
    for kind in [Eql, Neq, Gtr, Gte, Lss, Lte] {
        assert!(token_sets::BINARY_OPS.contains(kind), "{:?}", kind);
    }
    assert!(!token_sets::BINARY_OPS.contains(EqlSingle));
    assert!(!token_sets::BINARY_OPS.contains(EqlRegex));
}

#[test]
fn test_token_set_debug() {
    let set = TokenSet::new(&[ParenOpen, Comma, Add]);
    let debug_str = format!("{:?}", set);
    assert!(debug_str.contains("ParenOpen"));
    assert!(debug_str.contains("Comma"));
    assert!(debug_str.contains("Add"));
}

#[test]
fn test_token_set_empty_debug() {
    let set = TokenSet::EMPTY;
    let debug_str = format!("{:?}", set);
    assert_eq!(debug_str, "{}");
}

#[test]
fn test_promql_roundtrip() {
    for kind in [ParenOpen, ParenClose, Sum, Identifier, Error, Whitespace, Root] {
        let raw = PromQl::kind_to_raw(kind);
        let back = PromQl::kind_from_raw(raw);
        assert_eq!(kind, back);
    }
}
