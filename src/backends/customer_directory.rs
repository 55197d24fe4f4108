use crate::clients::{CustomerDirectory, CustomerError};
use crate::model::{Customer, CustomerId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, info};

/// Customer directory backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryCustomerDirectory {
    customers: RwLock<HashMap<CustomerId, Customer>>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a customer.
    pub fn insert(&self, customer: Customer) -> Result<(), CustomerError> {
        let mut customers = self
            .customers
            .write()
            .map_err(|e| CustomerError::Unavailable(e.to_string()))?;
        let id = customer.id;
        customers.insert(id, customer);
        info!(customer_id = %id, size = customers.len(), "Customer registered");
        Ok(())
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryCustomerDirectory {
    async fn get_customer(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        let customers = self
            .customers
            .read()
            .map_err(|e| CustomerError::Unavailable(e.to_string()))?;
        let customer = customers.get(&id).cloned();
        debug!(customer_id = %id, found = customer.is_some(), "Get");
        customer.ok_or(CustomerError::NotFound(id))
    }
}
