//! Plain data carried through an order placement: carts, customers and the persisted order.

pub mod cart;
pub mod customer;
pub mod order;

pub use cart::*;
pub use customer::*;
pub use order::*;
