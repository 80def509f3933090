//! Intermediate item tree.
//!
//! Items live in an arena and refer to each other by [`ItemId`]. The walker
//! records only the parent link; `children` stays empty until the collapse
//! pass attaches every item to its parent.

use promkit_core::{Aggregation, AggregationParams, SelectorExpression};
use rowan::{TextRange, TextSize};

/// Index into an [`ItemArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u32);

impl ItemId {
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An aggregation whose expression is not known until its child is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAggregation {
    pub op: Aggregation,
    pub by: Option<Vec<String>>,
    pub without: Option<Vec<String>>,
}

impl PendingAggregation {
    pub fn new(op: Aggregation) -> Self {
        Self {
            op,
            by: None,
            without: None,
        }
    }

    /// Fills in the rendered child text.
    pub fn params(&self, expr: impl Into<String>) -> AggregationParams {
        AggregationParams {
            expr: expr.into(),
            by: self.by.clone(),
            without: self.without.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Leaf(SelectorExpression),
    Aggregation(PendingAggregation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Source range of the selector, or of the aggregation keyword.
    pub range: TextRange,
    pub parent: Option<ItemId>,
    pub children: Vec<ItemId>,
    pub payload: Payload,
}

impl Item {
    /// Source offset the item was created from.
    pub fn offset(&self) -> TextSize {
        self.range.start()
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.payload, Payload::Leaf(_))
    }
}

/// Items in allocation order (depth-first pre-order of the source tree).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemArena {
    items: Vec<Item>,
}

impl ItemArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, range: TextRange, parent: Option<ItemId>, payload: Payload) -> ItemId {
        let id = ItemId::new(self.items.len() as u32);
        self.items.push(Item {
            range,
            parent,
            children: Vec::new(),
            payload,
        });
        id
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.index())
    }

    pub(super) fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (ItemId::new(i as u32), item))
    }

    /// Parent-less items, in allocation order.
    pub fn roots(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.iter()
            .filter(|(_, item)| item.parent.is_none())
            .map(|(id, _)| id)
    }
}
