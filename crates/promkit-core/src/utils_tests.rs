use crate::utils::{
    OffsetUnits, build_offset_string, rust_identifier, to_camel_case, to_snake_case,
    ts_identifier,
};

#[test]
fn offset_string_empty() {
    assert_eq!(build_offset_string(&OffsetUnits::default()), "0m");
}

#[test]
fn offset_string_skips_zero_units() {
    let units = OffsetUnits {
        d: Some(1),
        h: Some(0),
        m: Some(30),
        ..OffsetUnits::default()
    };
    assert_eq!(build_offset_string(&units), "1d30m");
}

#[test]
fn offset_string_all_zero() {
    let units = OffsetUnits {
        h: Some(0),
        ..OffsetUnits::default()
    };
    assert_eq!(build_offset_string(&units), "");
}

#[test]
fn snake_case_from_metric_names() {
    assert_eq!(to_snake_case("kube_node_info"), "kube_node_info");
    assert_eq!(to_snake_case("node:cpu:rate5m"), "node_cpu_rate5m");
    assert_eq!(to_snake_case("__name__"), "name");
    assert_eq!(to_snake_case("foo.bar-baz"), "foo_bar_baz");
}

#[test]
fn snake_case_from_camel() {
    assert_eq!(to_snake_case("fooBar"), "foo_bar");
    assert_eq!(to_snake_case("HTTPStatus"), "httpstatus");
    assert_eq!(to_snake_case("Foo"), "foo");
}

#[test]
fn camel_case() {
    assert_eq!(to_camel_case("kube_node_info"), "kubeNodeInfo");
    assert_eq!(to_camel_case("node:cpu:rate5m"), "nodeCpuRate5m");
    assert_eq!(to_camel_case("job"), "job");
    assert_eq!(to_camel_case("_private"), "private");
}

#[test]
fn rust_identifiers() {
    assert_eq!(rust_identifier("cluster"), "cluster");
    assert_eq!(rust_identifier("type"), "r#type");
    assert_eq!(rust_identifier("self"), "self_");
    assert_eq!(rust_identifier("5xx"), "_5xx");
    assert_eq!(rust_identifier(""), "label");
    assert_eq!(rust_identifier("é"), "label");
}

#[test]
fn ts_identifiers() {
    assert_eq!(ts_identifier("kube_pod_info"), "kubePodInfo");
    assert_eq!(ts_identifier("default"), "default_");
    assert_eq!(ts_identifier("1st"), "_1st");
    assert_eq!(ts_identifier("é"), "label");
}
