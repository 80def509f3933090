use crate::selector::{LabelSelector, MatchOp, SelectorExpression};

#[test]
fn empty_metric_and_selectors() {
    let expr = SelectorExpression::new("", &[], MatchOp::Equal, &[]);
    assert_eq!(expr.to_string(), "{}");
    assert!(expr.is_empty());
}

#[test]
fn metric_without_selectors() {
    let expr = SelectorExpression::new("up", &[], MatchOp::Equal, &[]);
    assert_eq!(expr.to_string(), "up{}");
}

#[test]
fn default_selectors_then_values() {
    let expr = SelectorExpression::new(
        "test_metric",
        &[("cluster", Some("test/cluster"))],
        MatchOp::Equal,
        &[LabelSelector::new("container", MatchOp::NotEqual, "")],
    );
    assert_eq!(
        expr.to_string(),
        r#"test_metric{container!="", cluster="test/cluster"}"#
    );
}

#[test]
fn value_overrides_default_in_place() {
    let expr = SelectorExpression::new(
        "test_metric",
        &[
            ("cluster", Some("test/cluster")),
            ("container", Some("test-container")),
        ],
        MatchOp::Equal,
        &[LabelSelector::new("container", MatchOp::NotEqual, "")],
    );
    assert_eq!(
        expr.to_string(),
        r#"test_metric{container="test-container", cluster="test/cluster"}"#
    );
}

#[test]
fn missing_values_are_skipped() {
    let expr = SelectorExpression::new(
        "foo",
        &[("bar", None), ("baz", Some("qux"))],
        MatchOp::Equal,
        &[],
    );
    assert_eq!(expr.to_string(), r#"foo{baz="qux"}"#);
    assert!(expr.get("bar").is_none());
}

#[test]
fn default_operator_applies_to_values() {
    let expr = SelectorExpression::new("foo", &[("bar", Some("b.*"))], MatchOp::RegexMatch, &[]);
    assert_eq!(expr.to_string(), r#"foo{bar=~"b.*"}"#);
    assert_eq!(expr.default_operator(), MatchOp::RegexMatch);
}

#[test]
fn set_selector_keeps_first_position() {
    let mut expr = SelectorExpression::new("foo", &[], MatchOp::Equal, &[]);
    expr.set_selector(LabelSelector::new("a", MatchOp::Equal, "1"))
        .set_selector(LabelSelector::new("b", MatchOp::Equal, "2"))
        .set_selector(LabelSelector::new("a", MatchOp::NotRegexMatch, "3"));

    assert_eq!(expr.len(), 2);
    assert_eq!(expr.to_string(), r#"foo{a!~"3", b="2"}"#);
}

#[test]
fn values_are_not_escaped() {
    let mut expr = SelectorExpression::new("foo", &[], MatchOp::Equal, &[]);
    expr.set_selector(LabelSelector::new("path", MatchOp::RegexMatch, r#"a\"b"#));
    assert_eq!(expr.to_string(), r#"foo{path=~"a\"b"}"#);
}

#[test]
fn fork_is_independent() {
    let mut original = SelectorExpression::new(
        "foo",
        &[("job", Some("api"))],
        MatchOp::Equal,
        &[LabelSelector::new("env", MatchOp::NotEqual, "")],
    );
    original.set_selector(LabelSelector::new("pod", MatchOp::RegexMatch, "web-.*"));

    let mut copy = original.fork();
    assert_eq!(copy.to_string(), original.to_string());

    copy.set_selector(LabelSelector::new("env", MatchOp::Equal, "prod"));
    assert_eq!(
        copy.to_string(),
        r#"foo{env="prod", job="api", pod=~"web-.*"}"#
    );
    assert_eq!(
        original.to_string(),
        r#"foo{env!="", job="api", pod=~"web-.*"}"#
    );
}

#[test]
fn match_op_parse_and_display() {
    for op in MatchOp::ALL {
        assert_eq!(op.as_str().parse::<MatchOp>(), Ok(op));
        assert_eq!(op.to_string(), op.as_str());
    }
    let err = "==".parse::<MatchOp>().unwrap_err();
    assert_eq!(err.to_string(), "unknown match operator `==`");
}

#[test]
fn label_selector_serializes_operator_text() {
    let selector = LabelSelector::new("job", MatchOp::NotRegexMatch, "api|web");
    let json = serde_json::to_string(&selector).unwrap();
    insta::assert_snapshot!(json, @r#"{"label":"job","operator":"!~","value":"api|web"}"#);
}
