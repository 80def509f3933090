use super::*;
use crate::Error;

#[test]
fn valid_query() {
    let q = Query::try_from(r#"count(up{job="api"}) by (cluster)"#).unwrap();
    assert!(q.is_valid());
    assert!(q.diagnostics().is_empty());
}

#[test]
fn parse_error() {
    let q = Query::try_from("(unclosed").unwrap();
    assert!(!q.is_valid());
    insta::assert_snapshot!(q.dump_diagnostics(), @r"
    error: missing closing `)`
      |
    1 | (unclosed
      | -^^^^^^^^
      | |
      | `(` opened here
    ");
}

#[test]
fn try_from_string() {
    let source = String::from("up");
    let q = Query::try_from(&source).unwrap();
    assert_eq!(q.source(), "up");
    assert!(q.is_valid());
}

#[test]
fn new_does_not_parse() {
    let q = Query::new("up");
    assert!(q.root().expr().is_none());
    assert_eq!(q.exec_fuel_consumed(), 0);
}

#[test]
fn exec_fuel_consumed_counts_tokens() {
    let q = Query::try_from("count(foo)").unwrap();
    assert_eq!(q.exec_fuel_consumed(), 4);
}

#[test]
fn unlimited_exec_fuel() {
    let q = Query::new("count(foo)").with_exec_fuel(None).exec().unwrap();
    assert!(q.is_valid());
    assert_eq!(q.exec_fuel_consumed(), 0);
}

#[test]
fn exec_fuel_exhausted() {
    let result = Query::new("count(foo)").with_exec_fuel(Some(2)).exec();
    assert!(matches!(result, Err(Error::ExecFuelExhausted)));
}

#[test]
fn exec_fuel_exactly_enough() {
    let q = Query::new("count(foo)").with_exec_fuel(Some(4)).exec().unwrap();
    assert!(q.is_valid());
    assert_eq!(q.exec_fuel_consumed(), 4);
}

#[test]
fn recursion_fuel_exactly_enough() {
    let q = Query::new("((((foo))))")
        .with_recursion_fuel(Some(5))
        .exec()
        .unwrap();
    assert!(q.is_valid());
}

#[test]
fn recursion_limit_exceeded() {
    let result = Query::new("((((foo))))")
        .with_recursion_fuel(Some(2))
        .exec();
    assert!(matches!(result, Err(Error::RecursionLimitExceeded)));
}

#[test]
fn deep_nesting_within_default_limit() {
    let source = format!("{}foo{}", "(".repeat(100), ")".repeat(100));
    let q = Query::try_from(&source).unwrap();
    assert!(q.is_valid());
    assert_eq!(q.migrate().to_query(), "foo{}");
}

#[test]
fn error_display() {
    insta::assert_snapshot!(Error::ExecFuelExhausted, @"execution limit exceeded");
    insta::assert_snapshot!(Error::RecursionLimitExceeded, @"recursion limit exceeded");
}

#[test]
fn migrate_query_ok() {
    let res = crate::migrate_query(r#"count(kube_node_info{cluster!=""}) by (cluster, node)"#);
    assert_eq!(
        res.unwrap(),
        r#"count by (cluster, node) (kube_node_info{cluster!=""})"#
    );
}

#[test]
fn migrate_query_rejects_syntax_errors() {
    let err = crate::migrate_query("foo{a=}").unwrap_err();

    let Error::QueryParseError(diagnostics) = &err else {
        panic!("expected a parse error, got {:?}", err);
    };
    assert_eq!(diagnostics.len(), 1);
    insta::assert_snapshot!(err, @"query parsing failed with 1 errors");
}

#[test]
fn migrate_query_keeps_unsupported_as_empty() {
    assert_eq!(crate::migrate_query("rate(foo[5m])").unwrap(), "");
}
