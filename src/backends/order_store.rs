use crate::clients::{OrderStore, StoreError};
use crate::model::{Order, OrderId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::info;

/// Order store backed by a map. Assigns a fresh [`OrderId`] on every save.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let orders = self
            .orders
            .lock()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(orders.get(&id).cloned())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let orders = self
            .orders
            .lock()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(orders.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|len| len == 0)
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn save(&self, order: Order) -> Result<OrderId, StoreError> {
        if order.lines.is_empty() {
            return Err(StoreError::Rejected("order has no lines".into()));
        }

        let mut orders = self
            .orders
            .lock()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        let id = OrderId::new();
        orders.insert(id, order);
        info!(order_id = %id, size = orders.len(), "Saved");
        Ok(id)
    }
}
