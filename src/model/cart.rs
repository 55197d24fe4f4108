use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Type-safe identifier for catalog items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ItemId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item_{}", self.0)
    }
}

/// One line of a shopping cart.
///
/// The quantity is signed so that malformed input from a transport reaches
/// validation instead of being silently wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingCartItem {
    pub item_id: ItemId,
    pub quantity: i32,
}

impl ShoppingCartItem {
    pub fn new(item_id: ItemId, quantity: i32) -> Self {
        Self { item_id, quantity }
    }
}

/// Ordered sequence of cart lines, built by the caller before placing an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingCart {
    pub items: Vec<ShoppingCartItem>,
}

impl ShoppingCart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line and returns the cart, for fluent construction.
    pub fn with_item(mut self, item_id: ItemId, quantity: i32) -> Self {
        self.add_item(item_id, quantity);
        self
    }

    pub fn add_item(&mut self, item_id: ItemId, quantity: i32) {
        self.items.push(ShoppingCartItem::new(item_id, quantity));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Collapses repeated items into one line each, summing their quantities.
    ///
    /// Lines keep the position of the first occurrence of their item.
    pub fn distinct_lines(&self) -> Vec<(ItemId, i32)> {
        let mut lines: Vec<(ItemId, i32)> = Vec::with_capacity(self.items.len());
        for item in &self.items {
            match lines.iter_mut().find(|(id, _)| *id == item.item_id) {
                Some((_, quantity)) => *quantity = quantity.saturating_add(item.quantity),
                None => lines.push((item.item_id, item.quantity)),
            }
        }
        lines
    }
}

impl FromIterator<ShoppingCartItem> for ShoppingCart {
    fn from_iter<I: IntoIterator<Item = ShoppingCartItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
