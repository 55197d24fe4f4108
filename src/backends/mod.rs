//! In-memory implementations of the collaborator traits.
//!
//! They make the system runnable end-to-end (see [`crate::lifecycle::OrderSystem`]) and
//! back the full-system integration tests. The fulfillment backend is an actor: one Tokio
//! task owns stock and sessions and serves requests from a channel, one at a time.

pub mod customer_directory;
pub mod fulfillment_actor;
pub mod order_store;

pub use customer_directory::*;
pub use fulfillment_actor::*;
pub use order_store::*;
