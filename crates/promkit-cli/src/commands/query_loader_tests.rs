use std::path::Path;

use promkit_lib::Query;

use super::query_loader::{LoadError, QuerySource, load_query_source};

#[test]
fn inline_text_wins() {
    let source = load_query_source(Some(Path::new("missing.promql")), Some("up")).unwrap();

    assert_eq!(source, QuerySource::inline("up"));
}

#[test]
fn query_is_required() {
    let err = load_query_source(None, None).unwrap_err();

    assert!(matches!(err, LoadError::Missing));
    assert_eq!(
        err.to_string(),
        "query is required: use positional argument or -q/--query"
    );
}

#[test]
fn missing_file() {
    let err = load_query_source(Some(Path::new("does/not/exist.promql")), None).unwrap_err();

    assert!(matches!(err, LoadError::File { .. }));
    assert!(
        err.to_string()
            .starts_with("failed to read 'does/not/exist.promql': ")
    );
}

#[test]
fn render_uses_path() {
    let source = QuerySource {
        text: "foo{a}".to_string(),
        path: Some("q.promql".to_string()),
    };
    let query = Query::try_from(&source.text).unwrap();

    let rendered = source.render(&query.diagnostics(), false);

    assert!(rendered.starts_with("error: "), "{}", rendered);
    assert!(rendered.contains("q.promql:1:6"), "{}", rendered);
}
