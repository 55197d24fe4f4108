//! # Mock Collaborators & Testing Guide
//!
//! In-memory doubles for the three collaborator traits. Each mock holds a queue of
//! expectations, answers calls in order, records every call it receives, and can
//! [`verify`](MockFulfillmentProvider::verify) that nothing expected was left unused.
//!
//! ## When to use Mocks vs the in-memory backends
//!
//! | Feature | Mocks | [`crate::backends`] |
//! |---------|-------|---------------------|
//! | **Call order** | Asserted (expectations are a queue) | Not observed |
//! | **State** | None, scripted answers | Real stock, sessions, saved orders |
//! | **Error Injection** | Easy (`return_err`) | Limited to business outcomes |
//! | **Use Case** | Orchestration rules around each call | End-to-end flows, concurrency |
//!
//! ## Example
//!
//! ```rust
//! use order_placement::mock::{MockCustomerDirectory, MockFulfillmentProvider, MockOrderStore};
//! use order_placement::model::{CustomerId, ItemId, ShoppingCart};
//! use order_placement::order_service::{OrderService, PlaceOrderError};
//! use order_placement::lifecycle::FulfillmentCredentials;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let customers = Arc::new(MockCustomerDirectory::new());
//!     let fulfillment = Arc::new(MockFulfillmentProvider::new());
//!     let orders = Arc::new(MockOrderStore::new());
//!     let service = OrderService::new(
//!         orders.clone(),
//!         customers.clone(),
//!         fulfillment.clone(),
//!         FulfillmentCredentials::new("svc", "secret"),
//!     );
//!
//!     // A zero quantity never reaches a collaborator, so no expectations are set.
//!     let cart = ShoppingCart::new().with_item(ItemId::new(), 0);
//!     let result = service.place_order(CustomerId::new(), &cart).await;
//!
//!     assert!(matches!(result, Err(PlaceOrderError::InvalidOrder(_))));
//!     assert!(customers.calls().is_empty());
//!     assert!(fulfillment.calls().is_empty());
//!     assert!(orders.saved().is_empty());
//! }
//! ```
//!
//! A call with no matching expectation panics, which fails the test that made it.

use crate::clients::{
    CustomerDirectory, CustomerError, FulfillmentError, FulfillmentProvider, OrderStore,
    SessionId, StoreError,
};
use crate::model::{Customer, CustomerId, ItemId, Order, OrderId};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

type Queue<X> = Arc<Mutex<VecDeque<X>>>;

/// Builder returned by every `expect_*` method. Finish it with
/// [`return_ok`](Self::return_ok) or [`return_err`](Self::return_err).
pub struct ExpectationBuilder<T, E, X> {
    expectations: Queue<X>,
    wrap: Box<dyn FnOnce(Result<T, E>) -> X + Send>,
}

impl<T, E, X> ExpectationBuilder<T, E, X> {
    fn new(expectations: Queue<X>, wrap: impl FnOnce(Result<T, E>) -> X + Send + 'static) -> Self {
        Self {
            expectations,
            wrap: Box::new(wrap),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: E) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T, E>) {
        let expectation = (self.wrap)(response);
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

fn next_expectation<X>(expectations: &Queue<X>) -> Option<X> {
    expectations.lock().unwrap().pop_front()
}

fn assert_all_met<X>(name: &str, expectations: &Queue<X>) {
    let remaining = expectations.lock().unwrap().len();
    if remaining > 0 {
        panic!("{}: not all expectations were met. {} remaining", name, remaining);
    }
}

// =============================================================================
// CUSTOMER DIRECTORY
// =============================================================================

/// A queued answer for [`MockCustomerDirectory`].
pub struct CustomerExpectation {
    id: CustomerId,
    response: Result<Customer, CustomerError>,
}

#[derive(Default)]
pub struct MockCustomerDirectory {
    expectations: Queue<CustomerExpectation>,
    calls: Mutex<Vec<CustomerId>>,
}

impl MockCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a `get_customer` call for `id`.
    pub fn expect_get_customer(
        &self,
        id: CustomerId,
    ) -> ExpectationBuilder<Customer, CustomerError, CustomerExpectation> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| CustomerExpectation {
            id,
            response,
        })
    }

    /// Identifiers passed to `get_customer`, in call order.
    pub fn calls(&self) -> Vec<CustomerId> {
        self.calls.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        assert_all_met("MockCustomerDirectory", &self.expectations);
    }
}

#[async_trait]
impl CustomerDirectory for MockCustomerDirectory {
    async fn get_customer(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        self.calls.lock().unwrap().push(id);
        match next_expectation(&self.expectations) {
            Some(expectation) => {
                assert_eq!(expectation.id, id, "get_customer called with unexpected id");
                expectation.response
            }
            None => panic!("Unexpected get_customer({})", id),
        }
    }
}

// =============================================================================
// FULFILLMENT PROVIDER
// =============================================================================

/// A queued answer for [`MockFulfillmentProvider`].
pub struct FulfillmentExpectation(Expected);

enum Expected {
    OpenSession(Result<SessionId, FulfillmentError>),
    IsInInventory {
        item_id: ItemId,
        quantity: i32,
        response: Result<bool, FulfillmentError>,
    },
    PlaceOrder(Result<bool, FulfillmentError>),
    CloseSession(Result<(), FulfillmentError>),
}

/// A call received by [`MockFulfillmentProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FulfillmentCall {
    OpenSession {
        user: String,
        password: String,
    },
    IsInInventory {
        session: SessionId,
        item_id: ItemId,
        quantity: i32,
    },
    PlaceOrder {
        session: SessionId,
        items: HashMap<ItemId, i32>,
        mailing_address: String,
    },
    CloseSession {
        session: SessionId,
    },
}

/// Scripted fulfillment provider.
///
/// Expectations are consumed strictly in the order they were registered, so a test
/// that registers `open → check → place → close` also asserts that sequence.
#[derive(Default)]
pub struct MockFulfillmentProvider {
    expectations: Queue<FulfillmentExpectation>,
    calls: Mutex<Vec<FulfillmentCall>>,
}

impl MockFulfillmentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_open_session(
        &self,
    ) -> ExpectationBuilder<SessionId, FulfillmentError, FulfillmentExpectation> {
        ExpectationBuilder::new(self.expectations.clone(), |response| {
            FulfillmentExpectation(Expected::OpenSession(response))
        })
    }

    /// Expects an inventory check for exactly this item and quantity.
    pub fn expect_is_in_inventory(
        &self,
        item_id: ItemId,
        quantity: i32,
    ) -> ExpectationBuilder<bool, FulfillmentError, FulfillmentExpectation> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            FulfillmentExpectation(Expected::IsInInventory {
                item_id,
                quantity,
                response,
            })
        })
    }

    pub fn expect_place_order(
        &self,
    ) -> ExpectationBuilder<bool, FulfillmentError, FulfillmentExpectation> {
        ExpectationBuilder::new(self.expectations.clone(), |response| {
            FulfillmentExpectation(Expected::PlaceOrder(response))
        })
    }

    pub fn expect_close_session(
        &self,
    ) -> ExpectationBuilder<(), FulfillmentError, FulfillmentExpectation> {
        ExpectationBuilder::new(self.expectations.clone(), |response| {
            FulfillmentExpectation(Expected::CloseSession(response))
        })
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<FulfillmentCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        assert_all_met("MockFulfillmentProvider", &self.expectations);
    }

    fn record(&self, call: FulfillmentCall) -> Option<Expected> {
        self.calls.lock().unwrap().push(call);
        next_expectation(&self.expectations).map(|FulfillmentExpectation(expected)| expected)
    }
}

#[async_trait]
impl FulfillmentProvider for MockFulfillmentProvider {
    async fn open_session(&self, user: &str, password: &str) -> Result<SessionId, FulfillmentError> {
        let call = FulfillmentCall::OpenSession {
            user: user.to_string(),
            password: password.to_string(),
        };
        match self.record(call) {
            Some(Expected::OpenSession(response)) => response,
            _ => panic!("Unexpected open_session or expectation mismatch"),
        }
    }

    async fn is_in_inventory(
        &self,
        session: SessionId,
        item_id: ItemId,
        quantity: i32,
    ) -> Result<bool, FulfillmentError> {
        let call = FulfillmentCall::IsInInventory {
            session,
            item_id,
            quantity,
        };
        match self.record(call) {
            Some(Expected::IsInInventory {
                item_id: expected_item,
                quantity: expected_quantity,
                response,
            }) => {
                assert_eq!(
                    (expected_item, expected_quantity),
                    (item_id, quantity),
                    "is_in_inventory called with unexpected item or quantity"
                );
                response
            }
            _ => panic!("Unexpected is_in_inventory({}, {}) or expectation mismatch", item_id, quantity),
        }
    }

    async fn place_order(
        &self,
        session: SessionId,
        items: &HashMap<ItemId, i32>,
        mailing_address: &str,
    ) -> Result<bool, FulfillmentError> {
        let call = FulfillmentCall::PlaceOrder {
            session,
            items: items.clone(),
            mailing_address: mailing_address.to_string(),
        };
        match self.record(call) {
            Some(Expected::PlaceOrder(response)) => response,
            _ => panic!("Unexpected place_order or expectation mismatch"),
        }
    }

    async fn close_session(&self, session: SessionId) -> Result<(), FulfillmentError> {
        match self.record(FulfillmentCall::CloseSession { session }) {
            Some(Expected::CloseSession(response)) => response,
            _ => panic!("Unexpected close_session({}) or expectation mismatch", session),
        }
    }
}

// =============================================================================
// ORDER STORE
// =============================================================================

#[derive(Default)]
pub struct MockOrderStore {
    expectations: Queue<Result<OrderId, StoreError>>,
    saved: Mutex<Vec<Order>>,
}

impl MockOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects one `save` call.
    pub fn expect_save(
        &self,
    ) -> ExpectationBuilder<OrderId, StoreError, Result<OrderId, StoreError>> {
        ExpectationBuilder::new(self.expectations.clone(), |response| response)
    }

    /// Orders passed to `save`, in call order.
    pub fn saved(&self) -> Vec<Order> {
        self.saved.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        assert_all_met("MockOrderStore", &self.expectations);
    }
}

#[async_trait]
impl OrderStore for MockOrderStore {
    async fn save(&self, order: Order) -> Result<OrderId, StoreError> {
        self.saved.lock().unwrap().push(order);
        match next_expectation(&self.expectations) {
            Some(response) => response,
            None => panic!("Unexpected save"),
        }
    }
}
