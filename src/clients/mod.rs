//! Capability traits for the services an order placement depends on.
//!
//! The orchestrator only ever sees these traits. Real backends, the in-memory
//! backends in [`crate::backends`] and the doubles in [`crate::mock`] all plug in here.

pub mod customer_directory;
pub mod fulfillment;
pub mod order_store;

pub use customer_directory::*;
pub use fulfillment::*;
pub use order_store::*;
