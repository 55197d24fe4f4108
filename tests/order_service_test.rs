use order_placement::clients::{CustomerError, FulfillmentError, SessionId, StoreError};
use order_placement::lifecycle::FulfillmentCredentials;
use order_placement::mock::{FulfillmentCall, MockCustomerDirectory, MockFulfillmentProvider, MockOrderStore};
use order_placement::model::{Address, Customer, CustomerId, ItemId, OrderId, ShoppingCart};
use order_placement::order_service::{InvalidOrderReason, OrderService, PlaceOrderError};
use std::collections::HashMap;
use std::sync::Arc;

struct Fixture {
    service: OrderService,
    customers: Arc<MockCustomerDirectory>,
    fulfillment: Arc<MockFulfillmentProvider>,
    orders: Arc<MockOrderStore>,
}

impl Fixture {
    fn new() -> Self {
        let customers = Arc::new(MockCustomerDirectory::new());
        let fulfillment = Arc::new(MockFulfillmentProvider::new());
        let orders = Arc::new(MockOrderStore::new());
        let service = OrderService::new(
            orders.clone(),
            customers.clone(),
            fulfillment.clone(),
            FulfillmentCredentials::new("svc-orders", "hunter2"),
        );
        Self {
            service,
            customers,
            fulfillment,
            orders,
        }
    }

    fn verify(&self) {
        self.customers.verify();
        self.fulfillment.verify();
        self.orders.verify();
    }

    fn count<F: Fn(&FulfillmentCall) -> bool>(&self, predicate: F) -> usize {
        self.fulfillment.calls().iter().filter(|call| predicate(*call)).count()
    }

    fn saved_lines(&self) -> Vec<(ItemId, i32)> {
        self.orders
            .saved()
            .iter()
            .flat_map(|order| order.lines.iter().map(|line| (line.item_id, line.quantity)))
            .collect()
    }
}

fn customer(id: CustomerId) -> Customer {
    Customer::new(
        id,
        "Ada",
        "Lovelace",
        Address::new("12 St James's Square", "London", "LDN", "SW1Y 4JH"),
    )
}

/// Single item, every collaborator succeeds.
#[tokio::test]
async fn test_single_item_order_is_placed_and_saved() {
    let f = Fixture::new();
    let customer_id = CustomerId::new();
    let item = ItemId::new();
    let session = SessionId::new();
    let order_id = OrderId::new();

    f.customers.expect_get_customer(customer_id).return_ok(customer(customer_id));
    f.fulfillment.expect_open_session().return_ok(session);
    f.fulfillment.expect_is_in_inventory(item, 1).return_ok(true);
    f.fulfillment.expect_place_order().return_ok(true);
    f.fulfillment.expect_close_session().return_ok(());
    f.orders.expect_save().return_ok(order_id);

    let cart = ShoppingCart::new().with_item(item, 1);
    let result = f.service.place_order(customer_id, &cart).await;

    assert_eq!(result, Ok(order_id));
    let saved = f.orders.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].customer_id, customer_id);
    assert_eq!(saved[0].total_quantity(), 1);
    assert_eq!(
        saved[0].shipping_address,
        "12 St James's Square, London, LDN SW1Y 4JH"
    );
    f.verify();
}

/// A zero quantity is refused before any collaborator is called.
#[tokio::test]
async fn test_zero_quantity_is_rejected_without_calls() {
    let f = Fixture::new();
    let item = ItemId::new();

    let cart = ShoppingCart::new().with_item(item, 0);
    let result = f.service.place_order(CustomerId::new(), &cart).await;

    assert_eq!(
        result,
        Err(PlaceOrderError::InvalidOrder(
            InvalidOrderReason::NonPositiveQuantity { item_id: item, quantity: 0 }
        ))
    );
    assert!(f.customers.calls().is_empty());
    assert!(f.fulfillment.calls().is_empty());
    assert!(f.orders.saved().is_empty());
}

#[tokio::test]
async fn test_bad_line_anywhere_in_cart_is_rejected_without_calls() {
    let f = Fixture::new();

    let cart = ShoppingCart::new()
        .with_item(ItemId::new(), 2)
        .with_item(ItemId::new(), 5)
        .with_item(ItemId::new(), -3);
    let result = f.service.place_order(CustomerId::new(), &cart).await;

    assert!(matches!(
        result,
        Err(PlaceOrderError::InvalidOrder(InvalidOrderReason::NonPositiveQuantity { quantity: -3, .. }))
    ));
    assert!(f.customers.calls().is_empty());
    assert!(f.fulfillment.calls().is_empty());
}

#[tokio::test]
async fn test_empty_cart_is_rejected() {
    let f = Fixture::new();

    let result = f.service.place_order(CustomerId::new(), &ShoppingCart::new()).await;

    assert_eq!(result, Err(PlaceOrderError::InvalidOrder(InvalidOrderReason::EmptyCart)));
    assert!(f.customers.calls().is_empty());
}

/// Every line is checked, then all lines go out in one placement.
#[tokio::test]
async fn test_multi_item_order_checks_every_line_before_placing() {
    let f = Fixture::new();
    let customer_id = CustomerId::new();
    let (x, y) = (ItemId::new(), ItemId::new());
    let session = SessionId::new();
    let order_id = OrderId::new();

    f.customers.expect_get_customer(customer_id).return_ok(customer(customer_id));
    f.fulfillment.expect_open_session().return_ok(session);
    f.fulfillment.expect_is_in_inventory(x, 1).return_ok(true);
    f.fulfillment.expect_is_in_inventory(y, 4).return_ok(true);
    f.fulfillment.expect_place_order().return_ok(true);
    f.fulfillment.expect_close_session().return_ok(());
    f.orders.expect_save().return_ok(order_id);

    let cart = ShoppingCart::new().with_item(x, 1).with_item(y, 4);
    let result = f.service.place_order(customer_id, &cart).await;

    assert_eq!(result, Ok(order_id));
    let calls = f.fulfillment.calls();
    assert_eq!(calls.len(), 5);
    assert!(matches!(calls[0], FulfillmentCall::OpenSession { .. }));
    assert!(matches!(calls[1], FulfillmentCall::IsInInventory { item_id, quantity: 1, .. } if item_id == x));
    assert!(matches!(calls[2], FulfillmentCall::IsInInventory { item_id, quantity: 4, .. } if item_id == y));
    match &calls[3] {
        FulfillmentCall::PlaceOrder {
            session: placed_in,
            items,
            ..
        } => {
            assert_eq!(*placed_in, session);
            assert_eq!(items, &HashMap::from([(x, 1), (y, 4)]));
        }
        other => panic!("expected place_order, got {:?}", other),
    }
    assert_eq!(calls[4], FulfillmentCall::CloseSession { session });
    assert_eq!(f.orders.saved().len(), 1);
    f.verify();
}

#[tokio::test]
async fn test_duplicate_lines_are_coalesced() {
    let f = Fixture::new();
    let customer_id = CustomerId::new();
    let x = ItemId::new();

    f.customers.expect_get_customer(customer_id).return_ok(customer(customer_id));
    f.fulfillment.expect_open_session().return_ok(SessionId::new());
    f.fulfillment.expect_is_in_inventory(x, 5).return_ok(true);
    f.fulfillment.expect_place_order().return_ok(true);
    f.fulfillment.expect_close_session().return_ok(());
    f.orders.expect_save().return_ok(OrderId::new());

    let cart = ShoppingCart::new().with_item(x, 2).with_item(x, 3);
    f.service.place_order(customer_id, &cart).await.unwrap();

    assert_eq!(f.saved_lines(), vec![(x, 5)]);
    f.verify();
}

/// A failed lookup never opens a session.
#[tokio::test]
async fn test_lookup_failure_never_opens_session() {
    let f = Fixture::new();
    let customer_id = CustomerId::new();

    f.customers
        .expect_get_customer(customer_id)
        .return_err(CustomerError::NotFound(customer_id));

    let cart = ShoppingCart::new().with_item(ItemId::new(), 1);
    let result = f.service.place_order(customer_id, &cart).await;

    assert_eq!(
        result,
        Err(PlaceOrderError::LookupFailure(CustomerError::NotFound(customer_id)))
    );
    assert!(f.fulfillment.calls().is_empty());
    assert!(f.orders.saved().is_empty());
    f.verify();
}

#[tokio::test]
async fn test_unavailable_item_closes_session_without_placing() {
    let f = Fixture::new();
    let customer_id = CustomerId::new();
    let (x, y, z) = (ItemId::new(), ItemId::new(), ItemId::new());
    let session = SessionId::new();

    f.customers.expect_get_customer(customer_id).return_ok(customer(customer_id));
    f.fulfillment.expect_open_session().return_ok(session);
    f.fulfillment.expect_is_in_inventory(x, 1).return_ok(true);
    f.fulfillment.expect_is_in_inventory(y, 2).return_ok(false);
    f.fulfillment.expect_close_session().return_ok(());

    let cart = ShoppingCart::new().with_item(x, 1).with_item(y, 2).with_item(z, 3);
    let result = f.service.place_order(customer_id, &cart).await;

    assert_eq!(result, Err(PlaceOrderError::ItemUnavailable { item_id: y, quantity: 2 }));
    assert_eq!(f.count(|c| matches!(c, FulfillmentCall::PlaceOrder { .. })), 0);
    assert_eq!(f.count(|c| matches!(c, FulfillmentCall::IsInInventory { item_id, .. } if *item_id == z)), 0);
    assert_eq!(
        f.fulfillment.calls().last(),
        Some(&FulfillmentCall::CloseSession { session })
    );
    assert!(f.orders.saved().is_empty());
    f.verify();
}

#[tokio::test]
async fn test_persistence_failure_reports_external_order() {
    let f = Fixture::new();
    let customer_id = CustomerId::new();
    let item = ItemId::new();

    f.customers.expect_get_customer(customer_id).return_ok(customer(customer_id));
    f.fulfillment.expect_open_session().return_ok(SessionId::new());
    f.fulfillment.expect_is_in_inventory(item, 1).return_ok(true);
    f.fulfillment.expect_place_order().return_ok(true);
    f.fulfillment.expect_close_session().return_ok(());
    f.orders
        .expect_save()
        .return_err(StoreError::DatabaseError("connection reset".into()));

    let cart = ShoppingCart::new().with_item(item, 1);
    let err = f.service.place_order(customer_id, &cart).await.unwrap_err();

    assert_eq!(
        err,
        PlaceOrderError::PersistenceFailure(StoreError::DatabaseError("connection reset".into()))
    );
    assert!(err.external_order_placed());
    f.verify();
}

#[tokio::test]
async fn test_session_opened_and_closed_exactly_once() {
    let f = Fixture::new();
    let customer_id = CustomerId::new();
    let (x, y) = (ItemId::new(), ItemId::new());

    f.customers.expect_get_customer(customer_id).return_ok(customer(customer_id));
    f.fulfillment.expect_open_session().return_ok(SessionId::new());
    f.fulfillment.expect_is_in_inventory(x, 1).return_ok(true);
    f.fulfillment.expect_is_in_inventory(y, 1).return_ok(true);
    f.fulfillment.expect_place_order().return_ok(true);
    f.fulfillment.expect_close_session().return_ok(());
    f.orders.expect_save().return_ok(OrderId::new());

    let cart = ShoppingCart::new().with_item(x, 1).with_item(y, 1);
    f.service.place_order(customer_id, &cart).await.unwrap();

    assert_eq!(f.count(|c| matches!(c, FulfillmentCall::OpenSession { .. })), 1);
    assert_eq!(f.count(|c| matches!(c, FulfillmentCall::CloseSession { .. })), 1);
    assert_eq!(
        f.fulfillment.calls()[0],
        FulfillmentCall::OpenSession {
            user: "svc-orders".into(),
            password: "hunter2".into(),
        }
    );
}

#[tokio::test]
async fn test_place_order_error_closes_session_and_skips_store() {
    let f = Fixture::new();
    let customer_id = CustomerId::new();
    let item = ItemId::new();

    f.customers.expect_get_customer(customer_id).return_ok(customer(customer_id));
    f.fulfillment.expect_open_session().return_ok(SessionId::new());
    f.fulfillment.expect_is_in_inventory(item, 1).return_ok(true);
    f.fulfillment
        .expect_place_order()
        .return_err(FulfillmentError::Unavailable("timeout".into()));
    f.fulfillment.expect_close_session().return_ok(());

    let cart = ShoppingCart::new().with_item(item, 1);
    let result = f.service.place_order(customer_id, &cart).await;

    assert_eq!(
        result,
        Err(PlaceOrderError::FulfillmentFailure(FulfillmentError::Unavailable("timeout".into())))
    );
    assert!(f.orders.saved().is_empty());
    f.verify();
}
