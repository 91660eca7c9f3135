//! # Event Bus
//!
//! Broadcast of workflow lifecycle events with generation filtering.
//!
//! ## Delivery
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  workflow ──begin()──► Generation(n)      (AtomicU64, shared)          │
//! │     │                                                                   │
//! │     └──publish(n, event)──► broadcast::Sender<Stamped<E>>              │
//! │                                   │                                     │
//! │                   ┌───────────────┼───────────────┐                     │
//! │                   ▼               ▼               ▼                     │
//! │             EventReceiver   EventReceiver   EventReceiver               │
//! │             (UI)            (Session)       (tests)                     │
//! │                                                                         │
//! │  A receiver drops an event when a newer generation has been issued     │
//! │  since, so late results of a superseded search never reach the UI.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bistro_core::{Generation, Stamped};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{trace, warn};

/// Default channel capacity. Lifecycle events are few per invocation.
pub const DEFAULT_CAPACITY: usize = 64;

/// Publishes stamped events of one workflow.
pub struct EventBus<E> {
    sender: broadcast::Sender<Stamped<E>>,
    latest: Arc<AtomicU64>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        EventBus {
            sender: self.sender.clone(),
            latest: Arc::clone(&self.latest),
        }
    }
}

impl<E: Clone + Send + 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<E: Clone + Send + 'static> EventBus<E> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        EventBus {
            sender,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Issues the generation of a new invocation.
    pub fn begin(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Newest generation issued so far.
    pub fn latest(&self) -> Generation {
        Generation(self.latest.load(Ordering::SeqCst))
    }

    /// Publishes an event. Having no subscriber is not an error.
    pub fn publish(&self, generation: Generation, event: E) {
        match self.sender.send(Stamped::new(generation, event)) {
            Ok(receivers) => trace!(%generation, receivers, "Event published"),
            Err(_) => trace!(%generation, "Event published with no subscriber"),
        }
    }

    pub fn subscribe(&self) -> EventReceiver<E> {
        EventReceiver {
            inner: self.sender.subscribe(),
            latest: Arc::clone(&self.latest),
        }
    }
}

/// Receives current-generation events.
pub struct EventReceiver<E> {
    inner: broadcast::Receiver<Stamped<E>>,
    latest: Arc<AtomicU64>,
}

impl<E: Clone> EventReceiver<E> {
    /// Waits for the next event that is not stale.
    ///
    /// Returns `None` once every bus handle is dropped. Cancel safe.
    pub async fn recv(&mut self) -> Option<Stamped<E>> {
        loop {
            match self.inner.recv().await {
                Ok(stamped) if self.is_current(&stamped) => return Some(stamped),
                Ok(stamped) => trace!(generation = %stamped.generation, "Dropping stale event"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event receiver lagged"),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next buffered event that is not stale, without waiting.
    pub fn try_recv(&mut self) -> Option<Stamped<E>> {
        loop {
            match self.inner.try_recv() {
                Ok(stamped) if self.is_current(&stamped) => return Some(stamped),
                Ok(_) => continue,
                Err(TryRecvError::Lagged(skipped)) => warn!(skipped, "Event receiver lagged"),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    fn is_current(&self, stamped: &Stamped<E>) -> bool {
        stamped.generation.0 >= self.latest.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generations_increase() {
        let bus: EventBus<&str> = EventBus::default();
        assert_eq!(bus.latest(), Generation(0));

        let first = bus.begin();
        let second = bus.clone().begin();

        assert_eq!(first, Generation(1));
        assert_eq!(second, Generation(2));
        assert_eq!(bus.latest(), second);
    }

    #[test]
    fn test_stale_events_are_dropped() {
        let bus: EventBus<&str> = EventBus::default();
        let mut rx = bus.subscribe();

        let old = bus.begin();
        bus.publish(old, "old request");
        let new = bus.begin();
        bus.publish(new, "new request");
        bus.publish(old, "old success");

        let delivered = rx.try_recv().unwrap();
        assert_eq!(delivered, Stamped::new(new, "new request"));
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_recv_waits_for_publish() {
        let bus: EventBus<u32> = EventBus::default();
        let mut rx = bus.subscribe();

        let publisher = bus.clone();
        tokio::spawn(async move {
            let generation = publisher.begin();
            publisher.publish(generation, 7);
        });

        let stamped = rx.recv().await.unwrap();
        assert_eq!(stamped.event, 7);
    }

    #[test]
    fn test_publish_without_subscriber() {
        let bus: EventBus<u32> = EventBus::default();
        let generation = bus.begin();
        bus.publish(generation, 1);
    }
}
