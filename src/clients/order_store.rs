//! # Order Store
//!
//! Persists a finalized order and hands back its identifier.
use crate::model::{Order, OrderId};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by an order store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The store refused the record.
    #[error("Order rejected by store: {0}")]
    Rejected(String),

    /// An underlying database error occurred.
    #[error("Order database error: {0}")]
    DatabaseError(String),
}

impl From<String> for StoreError {
    fn from(msg: String) -> Self {
        StoreError::DatabaseError(msg)
    }
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist the order and return the identifier assigned to it.
    async fn save(&self, order: Order) -> Result<OrderId, StoreError>;
}
