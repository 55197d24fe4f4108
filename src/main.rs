//! # Order Placement Demo
//!
//! Starts an [`OrderSystem`] on the in-memory backends, registers a customer, stocks two
//! items and places one order that succeeds and one that runs out of stock.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

use order_placement::lifecycle::{setup_tracing, AppConfig, OrderSystem};
use order_placement::model::{Address, Customer, CustomerId, ItemId, ShoppingCart};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = AppConfig::load()?;
    info!(?config, "Starting order system");

    let system = OrderSystem::new(&config);

    let customer_id = CustomerId::new();
    system.customers.insert(Customer::new(
        customer_id,
        "Ada",
        "Lovelace",
        Address::new("12 St James's Square", "London", "LDN", "SW1Y 4JH"),
    ))?;

    let (widget, gadget) = (ItemId::new(), ItemId::new());
    system.fulfillment.restock(widget, 10).await?;
    system.fulfillment.restock(gadget, 1).await?;

    let cart = ShoppingCart::new().with_item(widget, 3).with_item(gadget, 1);
    let span = tracing::info_span!("order_processing");
    match system
        .order_service
        .place_order(customer_id, &cart)
        .instrument(span)
        .await
    {
        Ok(order_id) => info!(%order_id, "Order processed successfully"),
        Err(e) => error!(error = %e, "Order processing failed"),
    }

    // The gadget is sold out now.
    let span = tracing::info_span!("order_processing");
    match system
        .order_service
        .place_order(customer_id, &cart)
        .instrument(span)
        .await
    {
        Ok(order_id) => info!(%order_id, "Order processed successfully"),
        Err(e) => error!(error = %e, "Order processing failed"),
    }

    let widgets_left = system.fulfillment.stock_level(widget).await?;
    let orders = system.orders.len()?;
    info!(widgets_left, orders, "Final state");

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
