use crate::backends::{FulfillmentActor, FulfillmentHandle, InMemoryCustomerDirectory, InMemoryOrderStore};
use crate::lifecycle::AppConfig;
use crate::order_service::OrderService;
use std::sync::Arc;
use tracing::{error, info};

/// Wires an [`OrderService`] to the in-memory backends.
///
/// `OrderSystem` is responsible for:
/// - **Lifecycle Management**: spawning the fulfillment actor and stopping it again
/// - **Dependency Wiring**: handing the service its store, directory, provider and credentials
///
/// The backends stay reachable through the public fields so callers can seed customers
/// and stock, then inspect saved orders and shipments.
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::new(&AppConfig::load()?);
/// system.customers.insert(customer)?;
/// system.fulfillment.restock(item_id, 10).await?;
///
/// let order_id = system.order_service.place_order(customer_id, &cart).await?;
///
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    pub order_service: OrderService,
    pub customers: Arc<InMemoryCustomerDirectory>,
    pub fulfillment: FulfillmentHandle,
    pub orders: Arc<InMemoryOrderStore>,

    /// Task handles of the running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    /// Spawns the fulfillment actor, accepting only the configured credentials,
    /// and builds the service on top of it. Must be called inside a Tokio runtime.
    pub fn new(config: &AppConfig) -> Self {
        let customers = Arc::new(InMemoryCustomerDirectory::new());
        let orders = Arc::new(InMemoryOrderStore::new());

        let (actor, fulfillment) =
            FulfillmentActor::new(config.runtime.channel_capacity, config.fulfillment.clone());
        let fulfillment_handle = tokio::spawn(actor.run());

        let order_service = OrderService::new(
            orders.clone(),
            customers.clone(),
            Arc::new(fulfillment.clone()),
            config.fulfillment.clone(),
        );

        Self {
            order_service,
            customers,
            fulfillment,
            orders,
            handles: vec![fulfillment_handle],
        }
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the service and the handle closes the actor's mailbox; the actor then
    /// leaves its loop. Clones of the service held elsewhere keep the actor alive, so
    /// drop them first.
    pub async fn shutdown(self) -> Result<(), tokio::task::JoinError> {
        info!("Shutting down system...");

        drop(self.order_service);
        drop(self.fulfillment);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(e);
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
