use promkit_core::{Aggregation, LabelSelector, MatchOp, SelectorExpression};
use rowan::{TextRange, TextSize};

use crate::diagnostics::Diagnostics;

use super::collapse::collapse;
use super::item::{ItemArena, Payload, PendingAggregation};
use super::render::render_query;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(TextSize::from(start), TextSize::from(end))
}

fn leaf(metric: &str) -> Payload {
    Payload::Leaf(SelectorExpression::new(metric, &[], MatchOp::Equal, &[]))
}

fn render(mut items: ItemArena) -> (String, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    collapse(&mut items, &mut diagnostics);
    let text = render_query(&items, &mut diagnostics);
    (text, diagnostics)
}

#[test]
fn empty_arena_renders_nothing() {
    let (text, diagnostics) = render(ItemArena::new());

    assert_eq!(text, "");
    assert!(diagnostics.is_empty());
}

#[test]
fn selector() {
    let mut items = ItemArena::new();
    items.alloc(
        range(0, 3),
        None,
        Payload::Leaf(SelectorExpression::new(
            "foo",
            &[("job", Some("api"))],
            MatchOp::NotEqual,
            &[LabelSelector::new("env", MatchOp::RegexMatch, "prod|stage")],
        )),
    );

    let (text, diagnostics) = render(items);

    assert_eq!(text, r#"foo{env=~"prod|stage", job!="api"}"#);
    assert!(diagnostics.is_empty());
}

#[test]
fn by_wins_over_without() {
    let mut items = ItemArena::new();
    let mut pending = PendingAggregation::new(Aggregation::Sum);
    pending.by = Some(vec!["a".to_string()]);
    pending.without = Some(vec!["b".to_string()]);
    let root = items.alloc(range(0, 3), None, Payload::Aggregation(pending));
    items.alloc(range(4, 7), Some(root), leaf("foo"));

    let (text, _) = render(items);

    assert_eq!(text, "sum by (a) (foo{})");
}

#[test]
fn aggregation_without_child() {
    let mut items = ItemArena::new();
    items.alloc(
        range(0, 5),
        None,
        Payload::Aggregation(PendingAggregation::new(Aggregation::Count)),
    );

    let (text, diagnostics) = render(items);

    assert_eq!(text, "count()");
    assert!(diagnostics.is_empty());
}

#[test]
fn only_first_root_is_rendered() {
    let mut items = ItemArena::new();
    items.alloc(range(0, 3), None, leaf("foo"));
    items.alloc(range(6, 9), None, leaf("bar"));

    let (text, diagnostics) = render(items);

    assert_eq!(text, "foo{}");
    insta::assert_snapshot!(diagnostics, @"error at 6..9: inconsistent query structure: query has 2 top-level expressions, only the first is rendered");
}

#[test]
fn selector_with_children() {
    let mut items = ItemArena::new();
    let root = items.alloc(range(0, 3), None, leaf("foo"));
    items.alloc(range(4, 7), Some(root), leaf("bar"));

    let (text, diagnostics) = render(items);

    assert_eq!(text, "");
    insta::assert_snapshot!(diagnostics, @"error at 0..3: inconsistent query structure: a selector cannot have nested expressions");
}

#[test]
fn broken_subtree_leaves_parent_intact() {
    let mut items = ItemArena::new();
    let root = items.alloc(
        range(0, 3),
        None,
        Payload::Aggregation(PendingAggregation::new(Aggregation::Max)),
    );
    let inner = items.alloc(
        range(4, 9),
        Some(root),
        Payload::Aggregation(PendingAggregation::new(Aggregation::Count)),
    );
    items.alloc(range(10, 11), Some(inner), leaf("a"));
    items.alloc(range(13, 14), Some(inner), leaf("b"));

    let (text, diagnostics) = render(items);

    assert_eq!(text, "max()");
    insta::assert_snapshot!(diagnostics, @"error at 4..9: inconsistent query structure: `count` aggregates 2 expressions, expected one");
}

#[test]
fn long_aggregation_chain() {
    let depth = 10_000;
    let mut items = ItemArena::new();
    let mut parent = None;
    for i in 0..depth {
        let id = items.alloc(
            range(i, i + 1),
            parent,
            Payload::Aggregation(PendingAggregation::new(Aggregation::Sum)),
        );
        parent = Some(id);
    }
    items.alloc(range(depth, depth + 3), parent, leaf("foo"));

    let (text, diagnostics) = render(items);

    assert!(diagnostics.is_empty());
    assert_eq!(text, format!("{}foo{{}}{}", "sum(".repeat(10_000), ")".repeat(10_000)));
}
