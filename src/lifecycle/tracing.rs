//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by `RUST_LOG`.
//! Module paths are hidden (`with_target(false)`); the structured fields carry the context.
//!
//! ```bash
//! RUST_LOG=info cargo run
//!
//! # Every collaborator call, with ids and quantities
//! RUST_LOG=debug cargo run
//!
//! # Only the orchestration steps
//! RUST_LOG=order_placement::order_service=debug cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! - **Placement**: one `place_order` span per request, carrying `customer_id` and the line count
//! - **Sessions**: open and close, with the session id and the number still open
//! - **Refusals**: unavailable items, declined placements and failed session closes at `warn`
//! - **Backends**: the fulfillment actor's startup, shutdown and accepted shipments
//!
//! The fulfillment actor runs in its own task, outside the caller's spans, so its events
//! carry no span prefix. With `RUST_LOG=info` a successful placement in the demo reads:
//!
//! ```text
//! INFO Session opened session=session_… open=1
//! INFO order_processing:place_order: Fulfillment session opened session=session_…
//! INFO Order accepted session=session_… shipments=1
//! INFO order_processing:place_order: Order placed with fulfillment provider items=2
//! INFO Session closed session=session_… open=0
//! INFO order_processing:place_order: Fulfillment session closed session=session_…
//! INFO order_processing:place_order: Saved order_id=order_… size=1
//! INFO order_processing:place_order: Order saved order_id=order_…
//! INFO Order processed successfully order_id=order_…
//! ```

/// Installs the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
