use super::error::PlaceOrderError;
use super::validation::validate_cart;
use crate::clients::{CustomerDirectory, FulfillmentError, FulfillmentProvider, OrderStore, SessionId};
use crate::lifecycle::FulfillmentCredentials;
use crate::model::{Customer, CustomerId, ItemId, Order, OrderId, ShoppingCart};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Places orders by driving the customer directory, the fulfillment provider and the
/// order store in a fixed sequence.
///
/// The service holds no per-call state. It is cheap to clone and can serve concurrent
/// placements from many tasks.
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
    customers: Arc<dyn CustomerDirectory>,
    fulfillment: Arc<dyn FulfillmentProvider>,
    credentials: FulfillmentCredentials,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        customers: Arc<dyn CustomerDirectory>,
        fulfillment: Arc<dyn FulfillmentProvider>,
        credentials: FulfillmentCredentials,
    ) -> Self {
        Self {
            orders,
            customers,
            fulfillment,
            credentials,
        }
    }

    /// Places an order for `customer_id` and returns the id assigned by the order store.
    ///
    /// # Errors
    /// - [`PlaceOrderError::InvalidOrder`] if the cart is empty or a line has a quantity below 1
    /// - [`PlaceOrderError::LookupFailure`] if the customer cannot be resolved
    /// - [`PlaceOrderError::ItemUnavailable`] if any item fails the inventory check
    /// - [`PlaceOrderError::FulfillmentFailure`] if the provider declines or errors
    /// - [`PlaceOrderError::PersistenceFailure`] if the order was placed but could not be saved
    #[instrument(skip(self, customer_id, cart), fields(%customer_id, lines = cart.len()))]
    pub async fn place_order(
        &self,
        customer_id: CustomerId,
        cart: &ShoppingCart,
    ) -> Result<OrderId, PlaceOrderError> {
        debug!(?cart, "place_order called");

        let lines = validate_cart(cart).map_err(|reason| {
            warn!(%reason, "Cart rejected");
            PlaceOrderError::InvalidOrder(reason)
        })?;

        let customer = self
            .customers
            .get_customer(customer_id)
            .await
            .map_err(|e| {
                warn!(error = %e, "Customer lookup failed");
                PlaceOrderError::LookupFailure(e)
            })?;
        debug!(?customer, "Customer resolved");

        let order = self.fulfil(&customer, &lines).await?;

        let order_id = self.orders.save(order).await.map_err(|e| {
            warn!(error = %e, "Order placed but not recorded");
            PlaceOrderError::PersistenceFailure(e)
        })?;

        info!(%order_id, "Order saved");
        Ok(order_id)
    }

    /// Runs the session lifecycle and returns the order to persist.
    ///
    /// Once the session is open it is closed before returning, whatever the outcome.
    async fn fulfil(
        &self,
        customer: &Customer,
        lines: &[(ItemId, i32)],
    ) -> Result<Order, PlaceOrderError> {
        let session = self
            .fulfillment
            .open_session(&self.credentials.username, &self.credentials.password)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to open fulfillment session");
                PlaceOrderError::FulfillmentFailure(e)
            })?;
        info!(%session, "Fulfillment session opened");

        let outcome = self.place_in_session(session, customer, lines).await;

        // A close failure is logged, never surfaced: the outcome above is what the caller needs.
        match self.fulfillment.close_session(session).await {
            Ok(()) => info!(%session, "Fulfillment session closed"),
            Err(e) => warn!(%session, error = %e, "Failed to close fulfillment session"),
        }

        outcome?;
        Ok(Order::new(customer, lines.iter().copied()))
    }

    async fn place_in_session(
        &self,
        session: SessionId,
        customer: &Customer,
        lines: &[(ItemId, i32)],
    ) -> Result<(), PlaceOrderError> {
        for &(item_id, quantity) in lines {
            let available = self
                .fulfillment
                .is_in_inventory(session, item_id, quantity)
                .await
                .map_err(|e| {
                    warn!(%item_id, error = %e, "Inventory check failed");
                    PlaceOrderError::FulfillmentFailure(e)
                })?;

            if !available {
                warn!(%item_id, quantity, "Item unavailable");
                return Err(PlaceOrderError::ItemUnavailable { item_id, quantity });
            }
            debug!(%item_id, quantity, "Item available");
        }

        let items: HashMap<ItemId, i32> = lines.iter().copied().collect();
        let mailing_address = customer.shipping_address.to_string();

        let placed = self
            .fulfillment
            .place_order(session, &items, &mailing_address)
            .await
            .map_err(|e| {
                warn!(error = %e, "Place order failed");
                PlaceOrderError::FulfillmentFailure(e)
            })?;

        if !placed {
            warn!("Fulfillment provider declined the order");
            return Err(PlaceOrderError::FulfillmentFailure(FulfillmentError::Declined));
        }

        info!(items = items.len(), "Order placed with fulfillment provider");
        Ok(())
    }
}
