use crate::Query;
use indoc::indoc;

#[test]
fn printer_with_spans() {
    let input = r#"sum by (job) (up{env="prod"})"#;
    let q = Query::expect_valid(input);

    let res = q.printer().with_spans(true).dump();

    insta::assert_snapshot!(res, @r#"
    Root [0..29]
      Aggregate [0..29] sum by (job)
        Vector [14..28] up
          Matcher [17..27] env = "prod"
    "#);
}

#[test]
fn printer_cst_with_spans() {
    let q = Query::expect_valid("foo[5m]");

    let res = q.printer().raw(true).with_spans(true).dump();

    insta::assert_snapshot!(res, @r#"
    Root [0..7]
      MatrixSelector [0..7]
        VectorSelector [0..3]
          Identifier [0..3] "foo"
        BracketOpen [3..4] "["
        Duration [4..6] "5m"
        BracketClose [6..7] "]"
    "#);
}

#[test]
fn printer_cst_with_trivia() {
    let input = "count by (a) (b)";
    let q = Query::expect_valid(input);

    let res = q.printer().raw(true).with_trivia(true).dump();

    insta::assert_snapshot!(res, @r#"
    Root
      AggregateExpr
        AggregateOp
          Count "count"
        Whitespace " "
        AggregateModifier
          KwBy "by"
          Whitespace " "
          GroupingLabels
            ParenOpen "("
            LabelName
              Identifier "a"
            ParenClose ")"
        Whitespace " "
        FunctionCallBody
          ParenOpen "("
          VectorSelector
            Identifier "b"
          ParenClose ")"
    "#);
}

#[test]
fn printer_incomplete_matcher() {
    let q = Query::try_from("foo{a}").unwrap();

    insta::assert_snapshot!(q.printer().dump(), @r"
    Root
      Vector foo
        Matcher a ? ?
    ");
}

#[test]
fn printer_format_into_writer() {
    let input = indoc! {"
        -foo
    "};
    let q = Query::expect_valid(input);

    let mut out = String::new();
    q.printer().format(&mut out).unwrap();

    insta::assert_snapshot!(out, @r"
    Root
      Unary -
        Vector foo
    ");
}
