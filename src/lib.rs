//! # Order Placement
//!
//! > **Turns a customer's shopping cart into a placed order.**
//!
//! The [`OrderService`](order_service::OrderService) coordinates three collaborators: a
//! customer directory, a session-based fulfillment provider and an order store. It checks
//! every cart line against inventory inside one fulfillment session, asks the provider to
//! ship, and records the order locally only once the provider has accepted it.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Collaborators behind traits
//! Each collaborator is an `async_trait` held as `Arc<dyn Trait>`. The service never knows
//! whether it talks to a remote system, the in-memory [`backends`] or a [`mock`].
//!
//! ### Scoped sessions
//! A fulfillment session is opened once per placement and closed on every path after a
//! successful open, including the early exit on an unavailable item.
//! A failed close is logged and never replaces the placement's own outcome.
//!
//! ### One error per failure kind
//! [`PlaceOrderError`](order_service::PlaceOrderError) has a variant for each way a
//! placement can fail and keeps the collaborator's error as its `source()`. The
//! [`external_order_placed`](order_service::PlaceOrderError::external_order_placed)
//! predicate flags the one case where the provider shipped but nothing was saved.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Actor-backed fulfillment
//! The in-memory fulfillment provider is an actor: one Tokio task owns stock and sessions and
//! answers requests over `mpsc`/`oneshot` channels. Multi-item reservations are all-or-nothing.
//!
//! ### 2. Configuration
//! Credentials and runtime settings are layered from `config/*.toml` and `ORDERS__*`
//! environment variables. See [`lifecycle::config`].
//!
//! ### 3. Observability
//! We use `tracing` everywhere with structured fields. See the [`lifecycle::tracing`] module.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`])
//! Carts, customers, addresses and orders, with typed ids.
//!
//! ### 2. The Interfaces ([`clients`])
//! The three collaborator traits and their error types.
//! - **Key items**: [`CustomerDirectory`](clients::CustomerDirectory),
//!   [`FulfillmentProvider`](clients::FulfillmentProvider), [`OrderStore`](clients::OrderStore).
//!
//! ### 3. The Orchestrator ([`order_service`])
//! Validation and the placement sequence.
//!
//! ### 4. The Implementations ([`backends`])
//! In-memory directory, store and the fulfillment actor.
//!
//! ### 5. The Wiring ([`lifecycle`])
//! [`OrderSystem`](lifecycle::OrderSystem) spawns the backends and hands them to the service.
//!
//! ### 6. Test Doubles ([`mock`])
//! Expectation-queue mocks for every collaborator.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```

pub mod backends;
pub mod clients;
pub mod lifecycle;
pub mod mock;
pub mod model;
pub mod order_service;
