use promkit_core::{Aggregation, LabelSelector, MatchOp};
use rowan::TextSize;

use crate::Query;
use crate::diagnostics::Diagnostics;

use super::item::{ItemArena, ItemId, Payload};
use super::walker::Walker;

fn walk(src: &str) -> (ItemArena, Diagnostics) {
    let query = Query::expect_valid(src);
    let mut items = ItemArena::new();
    let mut diagnostics = Diagnostics::new();
    Walker::new(&mut items, &mut diagnostics).walk_root(query.root());
    (items, diagnostics)
}

#[test]
fn leaf_without_parent() {
    let (items, diagnostics) = walk(r#"foo{a="1", "b"!~"2"}"#);

    assert!(diagnostics.is_empty());
    assert_eq!(items.len(), 1);

    let (id, item) = items.iter().next().unwrap();
    assert_eq!(id, ItemId::new(0));
    assert_eq!(item.parent, None);
    assert_eq!(item.offset(), TextSize::from(0));
    assert!(item.children.is_empty());

    let Payload::Leaf(selector) = &item.payload else {
        panic!("expected a leaf, got {:?}", item.payload);
    };
    assert_eq!(selector.metric(), "foo");
    assert_eq!(selector.default_operator(), MatchOp::Equal);
    let selectors: Vec<_> = selector.selectors().cloned().collect();
    assert_eq!(
        selectors,
        [
            LabelSelector::new("a", MatchOp::Equal, "1"),
            LabelSelector::new("b", MatchOp::NotRegexMatch, "2"),
        ]
    );
}

#[test]
fn aggregation_is_parent_of_its_body() {
    let (items, diagnostics) = walk("count by (node) (foo)");

    assert!(diagnostics.is_empty());
    assert_eq!(items.len(), 2);

    let agg = items.get(ItemId::new(0)).unwrap();
    assert_eq!(agg.parent, None);
    assert_eq!(agg.offset(), TextSize::from(0));
    let Payload::Aggregation(pending) = &agg.payload else {
        panic!("expected an aggregation, got {:?}", agg.payload);
    };
    assert_eq!(pending.op, Aggregation::Count);
    assert_eq!(pending.by, Some(vec!["node".to_string()]));
    assert_eq!(pending.without, None);

    let leaf = items.get(ItemId::new(1)).unwrap();
    assert_eq!(leaf.parent, Some(ItemId::new(0)));
    assert_eq!(leaf.offset(), TextSize::from(17));
    assert!(leaf.is_leaf());
}

#[test]
fn children_are_not_attached_by_the_walker() {
    let (items, _) = walk("count(foo)");

    assert!(items.iter().all(|(_, item)| item.children.is_empty()));
}

#[test]
fn wrappers_pass_the_same_parent() {
    let (items, _) = walk("count(((foo[5m])))");

    assert_eq!(items.len(), 2);
    assert_eq!(items.get(ItemId::new(1)).unwrap().parent, Some(ItemId::new(0)));
}

#[test]
fn allocation_is_pre_order() {
    let (items, _) = walk("sum(count(max(foo)))");

    let parents: Vec<_> = items.iter().map(|(_, item)| item.parent).collect();
    assert_eq!(
        parents,
        [
            None,
            Some(ItemId::new(0)),
            Some(ItemId::new(1)),
            Some(ItemId::new(2)),
        ]
    );
}

#[test]
fn modifier_after_body() {
    let (items, _) = walk("sum(foo) without (a, b)");

    let Payload::Aggregation(pending) = &items.get(ItemId::new(0)).unwrap().payload else {
        panic!("expected an aggregation");
    };
    assert_eq!(pending.by, None);
    assert_eq!(
        pending.without,
        Some(vec!["a".to_string(), "b".to_string()])
    );
}

#[test]
fn unsupported_subtree_is_not_walked() {
    let (items, diagnostics) = walk("topk(5, count(foo))");

    assert!(items.is_empty());
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn siblings_continue_after_unsupported() {
    let (items, diagnostics) = walk("count(rate(foo[5m]), bar)");

    assert_eq!(items.len(), 2);
    assert_eq!(diagnostics.len(), 1);
    let leaf = items.get(ItemId::new(1)).unwrap();
    let Payload::Leaf(selector) = &leaf.payload else {
        panic!("expected a leaf");
    };
    assert_eq!(selector.metric(), "bar");
}
