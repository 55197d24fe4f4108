use crate::model::{Customer, CustomerId, ItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for OrderId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// A line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: ItemId,
    pub quantity: i32,
}

/// Represents a placed customer order.
///
/// An `Order` is only built once the fulfillment provider has accepted the
/// placement. It carries no identifier of its own: the [`OrderStore`](crate::clients::OrderStore)
/// assigns one when the order is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub customer_id: CustomerId,
    pub lines: Vec<OrderLine>,
    pub shipping_address: String,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new Order instance.
    ///
    /// # Arguments
    /// * `customer` - The customer the order ships to
    /// * `lines` - Distinct items and quantities accepted by the fulfillment provider
    pub fn new(customer: &Customer, lines: impl IntoIterator<Item = (ItemId, i32)>) -> Self {
        Self {
            customer_id: customer.id,
            lines: lines
                .into_iter()
                .map(|(item_id, quantity)| OrderLine { item_id, quantity })
                .collect(),
            shipping_address: customer.shipping_address.to_string(),
            placed_at: Utc::now(),
        }
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|line| i64::from(line.quantity)).sum()
    }
}
