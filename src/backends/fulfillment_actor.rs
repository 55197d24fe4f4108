//! # In-Memory Fulfillment Actor
//!
//! A session-based fulfillment backend built as an actor.
//!
//! [`FulfillmentActor`] is the *server* half: it owns stock levels, the set of open
//! sessions and the accepted shipments, and processes [`FulfillmentRequest`]s
//! sequentially in its own Tokio task. Because a single task owns that state there are
//! no locks, and a placement's reservation of several items is all-or-nothing.
//!
//! [`FulfillmentHandle`] is the *client* half: cheap to clone, it forwards each call over
//! an `mpsc` channel and awaits the reply on a `oneshot` channel. It implements
//! [`FulfillmentProvider`], so the order service cannot tell it from a remote provider.
//!
//! ```rust
//! use order_placement::backends::FulfillmentActor;
//! use order_placement::clients::FulfillmentProvider;
//! use order_placement::lifecycle::FulfillmentCredentials;
//! use order_placement::model::ItemId;
//!
//! #[tokio::main]
//! async fn main() {
//!     let credentials = FulfillmentCredentials::new("svc", "secret");
//!     let (actor, handle) = FulfillmentActor::new(8, credentials);
//!     let task = tokio::spawn(actor.run());
//!
//!     let item = ItemId::new();
//!     handle.restock(item, 5).await.unwrap();
//!
//!     let session = handle.open_session("svc", "secret").await.unwrap();
//!     assert!(handle.is_in_inventory(session, item, 5).await.unwrap());
//!     assert!(!handle.is_in_inventory(session, item, 6).await.unwrap());
//!     handle.close_session(session).await.unwrap();
//!
//!     drop(handle);
//!     task.await.unwrap();
//! }
//! ```

use crate::clients::{FulfillmentError, FulfillmentProvider, SessionId};
use crate::lifecycle::FulfillmentCredentials;
use crate::model::ItemId;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, FulfillmentError>>;

/// An order the actor accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shipment {
    pub session: SessionId,
    pub items: HashMap<ItemId, u32>,
    pub mailing_address: String,
}

/// Messages understood by [`FulfillmentActor`].
#[derive(Debug)]
pub enum FulfillmentRequest {
    OpenSession {
        user: String,
        password: String,
        respond_to: Response<SessionId>,
    },
    IsInInventory {
        session: SessionId,
        item_id: ItemId,
        quantity: i32,
        respond_to: Response<bool>,
    },
    PlaceOrder {
        session: SessionId,
        items: HashMap<ItemId, i32>,
        mailing_address: String,
        respond_to: Response<bool>,
    },
    CloseSession {
        session: SessionId,
        respond_to: Response<()>,
    },
    Restock {
        item_id: ItemId,
        quantity: u32,
        respond_to: Response<u32>,
    },
    StockLevel {
        item_id: ItemId,
        respond_to: Response<u32>,
    },
    OpenSessions {
        respond_to: Response<usize>,
    },
    Shipments {
        respond_to: Response<Vec<Shipment>>,
    },
}

pub struct FulfillmentActor {
    receiver: mpsc::Receiver<FulfillmentRequest>,
    credentials: FulfillmentCredentials,
    stock: HashMap<ItemId, u32>,
    sessions: HashSet<SessionId>,
    shipments: Vec<Shipment>,
}

impl FulfillmentActor {
    /// Creates the actor and its handle.
    ///
    /// `buffer_size` bounds the mailbox; callers wait for space when it is full.
    /// Only `credentials` will be accepted by `open_session`.
    pub fn new(buffer_size: usize, credentials: FulfillmentCredentials) -> (Self, FulfillmentHandle) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            credentials,
            stock: HashMap::new(),
            sessions: HashSet::new(),
            shipments: Vec::new(),
        };
        (actor, FulfillmentHandle { sender })
    }

    /// Runs the event loop until every handle has been dropped.
    pub async fn run(mut self) {
        info!("Fulfillment actor started");

        while let Some(msg) = self.receiver.recv().await {
            self.handle(msg);
        }

        if !self.sessions.is_empty() {
            warn!(open_sessions = self.sessions.len(), "Shutdown with open sessions");
        }
        info!(shipments = self.shipments.len(), "Fulfillment actor shutdown");
    }

    fn handle(&mut self, msg: FulfillmentRequest) {
        match msg {
            FulfillmentRequest::OpenSession {
                user,
                password,
                respond_to,
            } => {
                let _ = respond_to.send(self.open_session(&user, &password));
            }
            FulfillmentRequest::IsInInventory {
                session,
                item_id,
                quantity,
                respond_to,
            } => {
                let result = self
                    .require_session(session)
                    .map(|()| self.has_stock(item_id, quantity));
                debug!(%session, %item_id, quantity, ?result, "IsInInventory");
                let _ = respond_to.send(result);
            }
            FulfillmentRequest::PlaceOrder {
                session,
                items,
                mailing_address,
                respond_to,
            } => {
                let result = self
                    .require_session(session)
                    .map(|()| self.place_order(session, &items, mailing_address));
                let _ = respond_to.send(result);
            }
            FulfillmentRequest::CloseSession {
                session,
                respond_to,
            } => {
                let result = if self.sessions.remove(&session) {
                    info!(%session, open = self.sessions.len(), "Session closed");
                    Ok(())
                } else {
                    warn!(%session, "Close for unknown session");
                    Err(FulfillmentError::UnknownSession(session))
                };
                let _ = respond_to.send(result);
            }
            FulfillmentRequest::Restock {
                item_id,
                quantity,
                respond_to,
            } => {
                let level = self.stock.entry(item_id).or_insert(0);
                *level = level.saturating_add(quantity);
                info!(%item_id, level = *level, "Restocked");
                let _ = respond_to.send(Ok(*level));
            }
            FulfillmentRequest::StockLevel {
                item_id,
                respond_to,
            } => {
                let _ = respond_to.send(Ok(self.stock_level(item_id)));
            }
            FulfillmentRequest::OpenSessions { respond_to } => {
                let _ = respond_to.send(Ok(self.sessions.len()));
            }
            FulfillmentRequest::Shipments { respond_to } => {
                let _ = respond_to.send(Ok(self.shipments.clone()));
            }
        }
    }

    fn open_session(&mut self, user: &str, password: &str) -> Result<SessionId, FulfillmentError> {
        if user != self.credentials.username || password != self.credentials.password {
            warn!(user, "Rejected credentials");
            return Err(FulfillmentError::InvalidCredentials(user.to_string()));
        }
        let session = SessionId::new();
        self.sessions.insert(session);
        info!(%session, open = self.sessions.len(), "Session opened");
        Ok(session)
    }

    fn require_session(&self, session: SessionId) -> Result<(), FulfillmentError> {
        if self.sessions.contains(&session) {
            Ok(())
        } else {
            warn!(%session, "Unknown session");
            Err(FulfillmentError::UnknownSession(session))
        }
    }

    fn stock_level(&self, item_id: ItemId) -> u32 {
        self.stock.get(&item_id).copied().unwrap_or(0)
    }

    fn has_stock(&self, item_id: ItemId, quantity: i32) -> bool {
        match u32::try_from(quantity) {
            Ok(wanted) if wanted > 0 => self.stock_level(item_id) >= wanted,
            _ => false,
        }
    }

    /// Reserves every item or none of them.
    fn place_order(
        &mut self,
        session: SessionId,
        items: &HashMap<ItemId, i32>,
        mailing_address: String,
    ) -> bool {
        if items.is_empty() || mailing_address.trim().is_empty() {
            warn!(%session, "Declined: nothing to ship or no address");
            return false;
        }
        if let Some((item_id, quantity)) = items
            .iter()
            .find(|(item_id, quantity)| !self.has_stock(**item_id, **quantity))
        {
            warn!(%session, %item_id, quantity, "Declined: insufficient stock");
            return false;
        }

        let mut reserved = HashMap::with_capacity(items.len());
        for (item_id, quantity) in items {
            // has_stock above guarantees a positive quantity within the stock level
            let wanted = quantity.unsigned_abs();
            if let Some(level) = self.stock.get_mut(item_id) {
                *level -= wanted;
            }
            reserved.insert(*item_id, wanted);
        }

        self.shipments.push(Shipment {
            session,
            items: reserved,
            mailing_address,
        });
        info!(%session, shipments = self.shipments.len(), "Order accepted");
        true
    }
}

/// Client half of [`FulfillmentActor`].
#[derive(Clone)]
pub struct FulfillmentHandle {
    sender: mpsc::Sender<FulfillmentRequest>,
}

impl FulfillmentHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> FulfillmentRequest,
    ) -> Result<T, FulfillmentError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FulfillmentError::Unavailable("Actor closed".into()))?;
        response
            .await
            .map_err(|_| FulfillmentError::Unavailable("Actor dropped response channel".into()))?
    }

    /// Adds stock for an item and returns the new level.
    pub async fn restock(&self, item_id: ItemId, quantity: u32) -> Result<u32, FulfillmentError> {
        self.request(|respond_to| FulfillmentRequest::Restock {
            item_id,
            quantity,
            respond_to,
        })
        .await
    }

    pub async fn stock_level(&self, item_id: ItemId) -> Result<u32, FulfillmentError> {
        self.request(|respond_to| FulfillmentRequest::StockLevel {
            item_id,
            respond_to,
        })
        .await
    }

    /// Number of sessions currently open.
    pub async fn open_sessions(&self) -> Result<usize, FulfillmentError> {
        self.request(|respond_to| FulfillmentRequest::OpenSessions { respond_to })
            .await
    }

    /// Orders accepted so far, in acceptance order.
    pub async fn shipments(&self) -> Result<Vec<Shipment>, FulfillmentError> {
        self.request(|respond_to| FulfillmentRequest::Shipments { respond_to })
            .await
    }
}

#[async_trait]
impl FulfillmentProvider for FulfillmentHandle {
    async fn open_session(&self, user: &str, password: &str) -> Result<SessionId, FulfillmentError> {
        let (user, password) = (user.to_string(), password.to_string());
        self.request(|respond_to| FulfillmentRequest::OpenSession {
            user,
            password,
            respond_to,
        })
        .await
    }

    async fn is_in_inventory(
        &self,
        session: SessionId,
        item_id: ItemId,
        quantity: i32,
    ) -> Result<bool, FulfillmentError> {
        self.request(|respond_to| FulfillmentRequest::IsInInventory {
            session,
            item_id,
            quantity,
            respond_to,
        })
        .await
    }

    async fn place_order(
        &self,
        session: SessionId,
        items: &HashMap<ItemId, i32>,
        mailing_address: &str,
    ) -> Result<bool, FulfillmentError> {
        let (items, mailing_address) = (items.clone(), mailing_address.to_string());
        self.request(|respond_to| FulfillmentRequest::PlaceOrder {
            session,
            items,
            mailing_address,
            respond_to,
        })
        .await
    }

    async fn close_session(&self, session: SessionId) -> Result<(), FulfillmentError> {
        self.request(|respond_to| FulfillmentRequest::CloseSession {
            session,
            respond_to,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn() -> FulfillmentHandle {
        let (actor, handle) = FulfillmentActor::new(8, FulfillmentCredentials::new("svc", "secret"));
        tokio::spawn(actor.run());
        handle
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let handle = spawn();

        let result = handle.open_session("svc", "guess").await;

        assert_eq!(result, Err(FulfillmentError::InvalidCredentials("svc".into())));
        assert_eq!(handle.open_sessions().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_calls_require_an_open_session() {
        let handle = spawn();
        let session = handle.open_session("svc", "secret").await.unwrap();
        handle.close_session(session).await.unwrap();

        let result = handle.is_in_inventory(session, ItemId::new(), 1).await;
        assert_eq!(result, Err(FulfillmentError::UnknownSession(session)));

        let result = handle.close_session(session).await;
        assert_eq!(result, Err(FulfillmentError::UnknownSession(session)));
    }

    #[tokio::test]
    async fn test_place_order_reserves_all_items() {
        let handle = spawn();
        let (x, y) = (ItemId::new(), ItemId::new());
        handle.restock(x, 3).await.unwrap();
        handle.restock(y, 10).await.unwrap();
        let session = handle.open_session("svc", "secret").await.unwrap();

        let items = HashMap::from([(x, 1), (y, 4)]);
        let placed = handle.place_order(session, &items, "1 Main St").await.unwrap();

        assert!(placed);
        assert_eq!(handle.stock_level(x).await.unwrap(), 2);
        assert_eq!(handle.stock_level(y).await.unwrap(), 6);
        let shipments = handle.shipments().await.unwrap();
        assert_eq!(shipments.len(), 1);
        assert_eq!(shipments[0].items, HashMap::from([(x, 1), (y, 4)]));
    }

    #[tokio::test]
    async fn test_place_order_is_all_or_nothing() {
        let handle = spawn();
        let (x, y) = (ItemId::new(), ItemId::new());
        handle.restock(x, 3).await.unwrap();
        handle.restock(y, 1).await.unwrap();
        let session = handle.open_session("svc", "secret").await.unwrap();

        let items = HashMap::from([(x, 1), (y, 4)]);
        let placed = handle.place_order(session, &items, "1 Main St").await.unwrap();

        assert!(!placed);
        assert_eq!(handle.stock_level(x).await.unwrap(), 3);
        assert_eq!(handle.stock_level(y).await.unwrap(), 1);
        assert!(handle.shipments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_quantity_is_never_in_inventory() {
        let handle = spawn();
        let item = ItemId::new();
        handle.restock(item, 3).await.unwrap();
        let session = handle.open_session("svc", "secret").await.unwrap();

        assert!(!handle.is_in_inventory(session, item, 0).await.unwrap());
        assert!(!handle.is_in_inventory(session, item, -1).await.unwrap());
    }

    #[tokio::test]
    async fn test_handle_reports_closed_actor() {
        let (actor, handle) = FulfillmentActor::new(1, FulfillmentCredentials::new("svc", "secret"));
        drop(actor);

        let result = handle.open_sessions().await;
        assert!(matches!(result, Err(FulfillmentError::Unavailable(_))));
    }
}
