//! Error types for order placement.

use crate::clients::{CustomerError, FulfillmentError, StoreError};
use crate::model::ItemId;
use thiserror::Error;

/// Why a cart was refused before any collaborator was contacted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidOrderReason {
    #[error("cart is empty")]
    EmptyCart,

    #[error("quantity {quantity} for {item_id} must be at least 1")]
    NonPositiveQuantity { item_id: ItemId, quantity: i32 },
}

/// Errors that can occur while placing an order.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlaceOrderError {
    /// The cart failed validation. Nothing was contacted.
    #[error("Invalid order: {0}")]
    InvalidOrder(#[from] InvalidOrderReason),

    /// The customer directory could not resolve the customer. No session was opened.
    #[error("Customer lookup failed: {0}")]
    LookupFailure(#[source] CustomerError),

    /// The provider reported an item as unavailable. Nothing was placed.
    #[error("Item unavailable: {item_id} (requested {quantity})")]
    ItemUnavailable { item_id: ItemId, quantity: i32 },

    /// The provider declined the placement or failed during the session.
    #[error("Fulfillment failed: {0}")]
    FulfillmentFailure(#[source] FulfillmentError),

    /// The provider accepted the order but the store failed to record it.
    /// No compensation is attempted.
    #[error("Order placed with fulfillment provider but not recorded: {0}")]
    PersistenceFailure(#[source] StoreError),
}

impl PlaceOrderError {
    /// True when an order may exist at the fulfillment provider without a local record.
    pub fn external_order_placed(&self) -> bool {
        matches!(self, PlaceOrderError::PersistenceFailure(_))
    }
}
