use crate::Query;

use super::{CodegenTarget, TypeScriptCodegenConfig};

fn codegen_with(src: &str, config: TypeScriptCodegenConfig) -> String {
    let migration = Query::expect_valid(src).migrate();
    let (code, diagnostics) = migration.to_code(&CodegenTarget::TypeScript(config));
    assert!(diagnostics.is_empty(), "unexpected diagnostics:\n{}", diagnostics);
    code
}

fn codegen(src: &str) -> String {
    codegen_with(src, TypeScriptCodegenConfig::default())
}

#[test]
fn single_label() {
    let code = codegen(r#"foo{"bar"="baz"}"#);

    insta::assert_snapshot!(code, @r#"
    import { Expression } from "./expression";
    import { MatchingOperator } from "./types";

    export function foo(bar?: string): string {
      return new Expression({
        metric: "foo",
        values: { "bar": bar },
        defaultOperator: MatchingOperator.equal,
        defaultSelectors: [
          { label: "bar", operator: MatchingOperator.equal, value: "" },
        ],
      }).toString();
    }
    "#);
}

#[test]
fn bare_metric() {
    let code = codegen("kube_node_info");

    insta::assert_snapshot!(code, @r#"
    import { Expression } from "./expression";
    import { MatchingOperator } from "./types";

    export function kubeNodeInfo(): string {
      return new Expression({
        metric: "kube_node_info",
        values: {},
        defaultOperator: MatchingOperator.equal,
        defaultSelectors: [],
      }).toString();
    }
    "#);
}

#[test]
fn every_operator() {
    let code = codegen(r#"foo{a="1", b!="2", c=~"3", d!~"4"}"#);

    assert!(code.contains(r#"{ label: "a", operator: MatchingOperator.equal, value: "" },"#));
    assert!(code.contains(r#"{ label: "b", operator: MatchingOperator.notEqual, value: "" },"#));
    assert!(code.contains(r#"{ label: "c", operator: MatchingOperator.regexMatch, value: "" },"#));
    assert!(code.contains(r#"{ label: "d", operator: MatchingOperator.notRegexMatch, value: "" },"#));
}

#[test]
fn labels_are_camel_cased() {
    let code = codegen(r#"foo{node_pool="default", "k8s.io/zone"="a"}"#);

    assert!(code.contains("export function foo(nodePool?: string, k8sIoZone?: string): string {"));
    assert!(code.contains(r#"values: { "node_pool": nodePool, "k8s.io/zone": k8sIoZone },"#));
}

#[test]
fn reserved_word_label() {
    let code = codegen(r#"foo{class="x"}"#);

    assert!(code.contains("export function foo(class_?: string): string {"));
    assert!(code.contains(r#"values: { "class": class_ },"#));
}

#[test]
fn colliding_identifiers_are_numbered() {
    let code = codegen(r#"foo{node_pool="1", "node.pool"="2"}"#);

    assert!(code.contains("(nodePool?: string, nodePool_2?: string)"));
}

#[test]
fn custom_config() {
    let config = TypeScriptCodegenConfig::new()
        .function_name("apiUp")
        .export(false)
        .import_root("../promql/");

    let code = codegen_with(r#"up{job="api"}"#, config);

    insta::assert_snapshot!(code, @r#"
    import { Expression } from "../promql/expression";
    import { MatchingOperator } from "../promql/types";

    function apiUp(job?: string): string {
      return new Expression({
        metric: "up",
        values: { "job": job },
        defaultOperator: MatchingOperator.equal,
        defaultSelectors: [
          { label: "job", operator: MatchingOperator.equal, value: "" },
        ],
      }).toString();
    }
    "#);
}

#[test]
fn escapes_are_kept_as_written() {
    let code = codegen(r#"{"say \"hi\"", job="api"}"#);

    assert!(code.contains(r#"metric: "say \\\"hi\\\"","#));
}

#[test]
fn aggregation_is_not_generated() {
    let migration = Query::expect_valid("sum by (job) (up)").migrate();
    let target = CodegenTarget::TypeScript(TypeScriptCodegenConfig::default());

    let (code, diagnostics) = migration.to_code(&target);

    assert_eq!(code, "");
    insta::assert_snapshot!(diagnostics, @"error at 0..3: code generation for `sum` is not supported by migration");
}
