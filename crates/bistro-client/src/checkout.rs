//! # Checkout Workflow
//!
//! Creates the order, confirms payment and moves the app to order tracking.
//!
//! ## Checkout Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Sequence                                    │
//! │                                                                         │
//! │  checkout(token)                                                       │
//! │     │                                                                   │
//! │     ├─► Request                                                         │
//! │     ├─► read lock: cart.for_delivery(address, date) ──► copy           │
//! │     ├─► validate copy                                  ─┐               │
//! │     ├─► POST /api/orders         (copy.to_json())       ├─ error ──►   │
//! │     ├─► PUT <order @id>/pay      {"stripeToken": ...}  ─┘   Failure    │
//! │     │                                                       (no nav)   │
//! │     ├─► pending.save(order)                                            │
//! │     ├─► navigator.reset([AccountHome, AccountOrders, OrderTracking])   │
//! │     ├─► Success(order)           ← live cart is cleared by the reducer │
//! │     └─► pending.clear()                                                │
//! │                                                                         │
//! │  The live cart is only ever read here. The token is consumed by value, │
//! │  so one token pays for at most one order.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use bistro_core::validation::validate_checkout;
use bistro_core::{Cart, CheckoutEvent, CheckoutState, Order, PaymentToken, StackReset};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn, Span};

use crate::error::{ClientError, ClientResult};
use crate::events::{EventBus, EventReceiver};
use crate::navigation::Navigator;
use crate::pending::{PendingOrder, PendingOrderStore};
use crate::transport::Transport;

/// Collection endpoint of orders.
pub const ORDERS_PATH: &str = "/api/orders";

/// Checkout events as published by the client.
pub type ClientCheckoutEvent = CheckoutEvent<ClientError>;

pub struct CheckoutWorkflow {
    transport: Arc<dyn Transport>,
    navigator: Arc<dyn Navigator>,
    pending: Arc<dyn PendingOrderStore>,
    state: Arc<RwLock<CheckoutState>>,
    events: EventBus<ClientCheckoutEvent>,
}

impl CheckoutWorkflow {
    pub fn new(
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
        pending: Arc<dyn PendingOrderStore>,
        state: Arc<RwLock<CheckoutState>>,
    ) -> Self {
        CheckoutWorkflow {
            transport,
            navigator,
            pending,
            state,
            events: EventBus::default(),
        }
    }

    pub fn subscribe(&self) -> EventReceiver<ClientCheckoutEvent> {
        self.events.subscribe()
    }

    /// Checks out the live cart with the chosen address and date.
    ///
    /// On failure nothing is navigated and the live cart is left as it was.
    #[instrument(skip_all, fields(generation = tracing::field::Empty))]
    pub async fn checkout(&self, token: PaymentToken) -> ClientResult<Order> {
        let generation = self.events.begin();
        Span::current().record("generation", tracing::field::display(generation));
        self.events.publish(generation, CheckoutEvent::Request);

        let result = match self.submit(token).await {
            Ok(order) => self.complete(order).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(order) => {
                info!(order = %order.id, "Checkout complete");
                self.events
                    .publish(generation, CheckoutEvent::Success(order.clone()));
                if let Err(e) = self.pending.clear().await {
                    warn!(order = %order.id, error = %e, "Could not clear pending order");
                }
                Ok(order)
            }
            Err(err) => {
                warn!(error = %err, "Checkout failed");
                self.events
                    .publish(generation, CheckoutEvent::Failure(err.clone()));
                Err(err)
            }
        }
    }

    /// Creates and pays the order. Returns the paid order.
    async fn submit(&self, token: PaymentToken) -> ClientResult<Order> {
        let cart = self.snapshot().await;
        validate_checkout(&cart)?;

        let body = cart.to_json()?;
        debug!(
            restaurant = cart.restaurant.as_deref().unwrap_or_default(),
            lines = cart.item_count(),
            "Creating order"
        );
        let created = decode_order(self.transport.post(ORDERS_PATH, body).await?)?;
        info!(order = %created.id, "Order created");

        let payment = serde_json::to_value(token.into_request())?;
        let paid = self
            .transport
            .put(&created.payment_path(), payment)
            .await
            .map_err(|source| ClientError::Payment {
                order: created.id.clone(),
                source: Box::new(source),
            })?;

        // The payment endpoint echoes the updated order. An unusable echo
        // falls back to the created order.
        match decode_order(paid) {
            Ok(order) if order.id == created.id => Ok(order),
            Ok(order) => {
                warn!(created = %created.id, echoed = %order.id, "Payment echoed another order");
                Ok(created)
            }
            Err(e) => {
                warn!(order = %created.id, error = %e, "Unreadable payment response");
                Ok(created)
            }
        }
    }

    /// Records the paid order and resets navigation to its tracking screen.
    async fn complete(&self, order: Order) -> ClientResult<Order> {
        if let Err(e) = self.pending.save(&PendingOrder::new(order.clone())).await {
            error!(order = %order.id, error = %e, "Could not record pending order");
        }

        self.navigator
            .reset(StackReset::order_tracking(order.clone()))
            .map_err(|source| ClientError::Navigation {
                order: order.id.clone(),
                source,
            })?;

        Ok(order)
    }

    /// Copy of the live cart carrying the delivery details.
    async fn snapshot(&self) -> Cart {
        let state = self.state.read().await;
        state.cart.for_delivery(state.address.clone(), state.date)
    }
}

fn decode_order(value: Value) -> ClientResult<Order> {
    serde_json::from_value(value).map_err(|e| ClientError::InvalidResponse(format!("order: {}", e)))
}
