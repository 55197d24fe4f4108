//! Startup, configuration and shutdown.

pub mod config;
pub mod order_system;
pub mod tracing;

pub use self::config::{AppConfig, FulfillmentCredentials, RuntimeConfig};
pub use order_system::OrderSystem;
pub use self::tracing::setup_tracing;
