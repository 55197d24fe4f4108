//! # Fulfillment Provider
//!
//! A stateful, session-based service that checks inventory and places physical orders.
//!
//! Every call after [`FulfillmentProvider::open_session`] is scoped by the returned
//! [`SessionId`], which stays valid until [`FulfillmentProvider::close_session`].
use crate::model::ItemId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use thiserror::Error;
use uuid::Uuid;

/// Opaque handle for an open fulfillment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session_{}", self.0)
    }
}

/// Errors reported by a fulfillment provider.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FulfillmentError {
    /// The service credentials were rejected.
    #[error("Invalid fulfillment credentials for user {0}")]
    InvalidCredentials(String),

    /// The session is unknown or already closed.
    #[error("Unknown fulfillment session: {0}")]
    UnknownSession(SessionId),

    /// The provider declined to place the order.
    #[error("Order declined by fulfillment provider")]
    Declined,

    /// The provider could not be reached or failed internally.
    #[error("Fulfillment provider unavailable: {0}")]
    Unavailable(String),
}

impl From<String> for FulfillmentError {
    fn from(msg: String) -> Self {
        FulfillmentError::Unavailable(msg)
    }
}

#[async_trait]
pub trait FulfillmentProvider: Send + Sync {
    /// Open a session with the provider's service account.
    async fn open_session(&self, user: &str, password: &str) -> Result<SessionId, FulfillmentError>;

    /// Whether `quantity` units of `item_id` can currently be supplied.
    async fn is_in_inventory(
        &self,
        session: SessionId,
        item_id: ItemId,
        quantity: i32,
    ) -> Result<bool, FulfillmentError>;

    /// Submit the order. `Ok(false)` means the provider declined it.
    async fn place_order(
        &self,
        session: SessionId,
        items: &HashMap<ItemId, i32>,
        mailing_address: &str,
    ) -> Result<bool, FulfillmentError>;

    async fn close_session(&self, session: SessionId) -> Result<(), FulfillmentError>;
}
