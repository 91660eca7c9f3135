//! # Session
//!
//! Composition root: owns the live state and every collaborator, runs the
//! reducer's effects and feeds workflow events back into the reducer.
//!
//! ## Dispatch Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  dispatch(action)                                                      │
//! │     │                                                                   │
//! │     ├─► state.write().apply(action) ──► effects                         │
//! │     │        (lock released before any network call)                    │
//! │     │                                                                   │
//! │     └─► for each effect:                                               │
//! │            SearchRestaurants ──► SearchWorkflow::search   ─┐            │
//! │            Checkout(token)   ──► CheckoutWorkflow::checkout├─ events ─┐ │
//! │                                                            │          │ │
//! │            alongside: recv event ──► map failure ──► apply ◄───────┘ │
//! │            once it returns: drain what is left                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::sync::Arc;

use bistro_core::{
    CheckoutAction, CheckoutEvent, CheckoutState, Effect, Order, Stamped, StackReset,
};
use tokio::sync::{oneshot, RwLock};
use tracing::{error, info, warn};

use crate::checkout::CheckoutWorkflow;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::events::EventReceiver;
use crate::navigation::Navigator;
use crate::pending::{FilePendingOrderStore, MemoryPendingOrderStore, PendingOrderStore};
use crate::search::SearchWorkflow;
use crate::transport::{HttpTransport, Transport};

pub struct Session {
    state: Arc<RwLock<CheckoutState>>,
    search: SearchWorkflow,
    checkout: CheckoutWorkflow,
    navigator: Arc<dyn Navigator>,
    pending: Arc<dyn PendingOrderStore>,
}

impl Session {
    pub fn new(
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
        pending: Arc<dyn PendingOrderStore>,
    ) -> Self {
        let state = Arc::new(RwLock::new(CheckoutState::new()));
        Session {
            search: SearchWorkflow::new(Arc::clone(&transport)),
            checkout: CheckoutWorkflow::new(
                transport,
                Arc::clone(&navigator),
                Arc::clone(&pending),
                Arc::clone(&state),
            ),
            state,
            navigator,
            pending,
        }
    }

    /// Builds a session talking HTTP to the configured API.
    pub fn from_config(config: &ClientConfig, navigator: Arc<dyn Navigator>) -> ClientResult<Self> {
        let transport = Arc::new(HttpTransport::new(&config.api)?);
        let pending: Arc<dyn PendingOrderStore> = match &config.checkout.pending_order_path {
            Some(path) => Arc::new(FilePendingOrderStore::new(path)),
            None => Arc::new(MemoryPendingOrderStore::new()),
        };
        Ok(Session::new(transport, navigator, pending))
    }

    /// Shared handle on the live state.
    pub fn state(&self) -> Arc<RwLock<CheckoutState>> {
        Arc::clone(&self.state)
    }

    /// Copy of the live state.
    pub async fn snapshot(&self) -> CheckoutState {
        self.state.read().await.clone()
    }

    pub fn search_events(&self) -> EventReceiver<crate::search::ClientSearchEvent> {
        self.search.subscribe()
    }

    pub fn checkout_events(&self) -> EventReceiver<crate::checkout::ClientCheckoutEvent> {
        self.checkout.subscribe()
    }

    /// Applies an action and runs the effects it produces.
    ///
    /// Returns the first effect error; the failure has already been
    /// recorded in the state by then.
    pub async fn dispatch(&self, action: CheckoutAction) -> ClientResult<()> {
        let effects = self.state.write().await.apply(action)?;
        for effect in effects {
            self.run(effect).await?;
        }
        Ok(())
    }

    async fn run(&self, effect: Effect) -> ClientResult<()> {
        match effect {
            Effect::SearchRestaurants {
                latitude,
                longitude,
                date,
            } => {
                let events = self.search.subscribe();
                let work = self.search.search(latitude, longitude, date);
                self.drive(events, work, |stamped| {
                    CheckoutAction::Search(stamped.map(|e| e.map_failure(|err| err.failure_info())))
                })
                .await
                .map(|_| ())
            }
            Effect::Checkout(token) => {
                let events = self.checkout.subscribe();
                let work = self.checkout.checkout(token);
                self.drive(events, work, |stamped| {
                    CheckoutAction::Checkout(stamped.map(|e| e.map_failure(|err| err.failure_info())))
                })
                .await
                .map(|_| ())
            }
        }
    }

    /// Awaits `work` while applying its events to the state as they arrive.
    ///
    /// Both sides are polled together so a workflow waiting on the state
    /// lock is never starved by the reducer waiting on the same lock.
    async fn drive<E, T, W, F>(&self, mut events: EventReceiver<E>, work: W, to_action: F) -> ClientResult<T>
    where
        E: Clone,
        W: Future<Output = ClientResult<T>>,
        F: Fn(Stamped<E>) -> CheckoutAction,
    {
        let (done_tx, mut done_rx) = oneshot::channel::<()>();

        let work = async move {
            let result = work.await;
            let _ = done_tx.send(());
            result
        };

        let pump = async {
            loop {
                tokio::select! {
                    biased;
                    Some(stamped) = events.recv() => self.reduce(to_action(stamped)).await,
                    _ = &mut done_rx => break,
                }
            }
            while let Some(stamped) = events.try_recv() {
                self.reduce(to_action(stamped)).await;
            }
        };

        let (result, ()) = tokio::join!(work, pump);
        result
    }

    async fn reduce(&self, action: CheckoutAction) {
        // Lifecycle events never violate cart rules and never yield effects.
        if let Err(e) = self.state.write().await.apply(action) {
            error!(error = %e, "Reducer rejected a workflow event");
        }
    }

    /// Finishes a checkout interrupted between payment and navigation.
    ///
    /// Returns the recovered order, or `None` when nothing was pending.
    pub async fn recover_pending(&self) -> ClientResult<Option<Order>> {
        let Some(pending) = self.pending.load().await? else {
            return Ok(None);
        };
        let order = pending.order;
        warn!(order = %order.id, confirmed_at = %pending.confirmed_at, "Recovering paid order");

        self.navigator
            .reset(StackReset::order_tracking(order.clone()))
            .map_err(|source| ClientError::Navigation {
                order: order.id.clone(),
                source,
            })?;

        {
            let mut state = self.state.write().await;
            let generation = state.checkout.generation;
            state.apply(CheckoutAction::Checkout(Stamped::new(
                generation,
                CheckoutEvent::Success(order.clone()),
            )))?;
        }

        self.pending.clear().await?;
        info!(order = %order.id, "Paid order recovered");
        Ok(Some(order))
    }
}
