//! # Customer Directory
//!
//! Resolves a customer identifier to the customer's profile and shipping address.
use crate::model::{Customer, CustomerId};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a customer directory.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomerError {
    /// No customer is registered under the identifier.
    #[error("Customer not found: {0}")]
    NotFound(CustomerId),

    /// The directory could not be reached or failed internally.
    #[error("Customer directory unavailable: {0}")]
    Unavailable(String),
}

impl From<String> for CustomerError {
    fn from(msg: String) -> Self {
        CustomerError::Unavailable(msg)
    }
}

#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Fetch a customer by ID.
    async fn get_customer(&self, id: CustomerId) -> Result<Customer, CustomerError>;
}
