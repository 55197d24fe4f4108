//! # Order Placement
//!
//! [`OrderService`] is the single entry point that turns a customer and a shopping cart
//! into a persisted order.
//!
//! ## Sequence
//!
//! 1. **Validate** the cart ([`validate_cart`]). Nothing else is contacted until this passes.
//! 2. **Resolve** the customer through the [`CustomerDirectory`](crate::clients::CustomerDirectory).
//! 3. **Open** a fulfillment session with the configured service account.
//! 4. **Check** inventory for every distinct item, in cart order.
//! 5. **Place** the order with all items and the rendered shipping address.
//! 6. **Close** the session. This happens on every path once the session is open.
//! 7. **Save** the [`Order`](crate::model::Order) and return the store-assigned id.
//!
//! ## Errors
//!
//! Each step fails with its own [`PlaceOrderError`] variant, so callers can tell
//! "nothing happened" (`InvalidOrder`, `LookupFailure`) from "the provider accepted the
//! order but it was not recorded" (`PersistenceFailure`, see
//! [`PlaceOrderError::external_order_placed`]). Nothing is retried.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let service = OrderService::new(orders, customers, fulfillment, config.fulfillment);
//! let cart = ShoppingCart::new().with_item(item_id, 2);
//! let order_id = service.place_order(customer_id, &cart).await?;
//! ```

pub mod error;
pub mod service;
pub mod validation;

pub use error::*;
pub use service::*;
pub use validation::*;
