//! # bistro-client: Async Ordering Workflows for Bistro
//!
//! This crate drives every network call of the ordering flow: restaurant
//! search with menu resolution, and checkout with payment and the
//! post-checkout navigation reset.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Session (composition root)                  │  │
//! │  │                                                                  │  │
//! │  │  Owns Arc<RwLock<CheckoutState>>, runs reducer effects,          │  │
//! │  │  feeds workflow events back into the reducer                     │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ SearchWorkflow │  │CheckoutWorkflow│  │  PendingOrderStore     │    │
//! │  │                │  │                │  │                        │    │
//! │  │ GET collection │  │ POST order     │  │ Paid order kept until  │    │
//! │  │ resolve menus  │  │ PUT pay        │  │ navigation happened    │    │
//! │  │ filter by date │  │ Navigator reset│  │ (memory or JSON file)  │    │
//! │  └───────┬────────┘  └───────┬────────┘  └────────────────────────┘    │
//! │          │                   │                                          │
//! │          ▼                   ▼                                          │
//! │  ┌─────────────────────────────────────┐  ┌────────────────────────┐   │
//! │  │  Transport (trait)                  │  │  EventBus<E>           │   │
//! │  │  HttpTransport: reqwest + JSON-LD   │  │  broadcast + Generation│   │
//! │  └─────────────────────────────────────┘  └────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Client configuration (API URL, timeout, pending order path)
//! - [`error`] - Client error types
//! - [`transport`] - `Transport` trait and the reqwest implementation
//! - [`navigation`] - `Navigator` trait
//! - [`events`] - Generation-stamped event bus
//! - [`menu`] - Concurrent menu resolution
//! - [`search`] - Restaurant search workflow
//! - [`checkout`] - Checkout workflow
//! - [`pending`] - Pending paid order store
//! - [`session`] - Composition root
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bistro_client::{ClientConfig, Session};
//! use bistro_core::{CheckoutAction, PaymentToken};
//!
//! let config = ClientConfig::load_or_default(None);
//! let session = Session::from_config(&config, navigator)?;
//!
//! // Finish a checkout the app was killed in the middle of
//! session.recover_pending().await?;
//!
//! session
//!     .dispatch(CheckoutAction::RequestSearch { latitude: 48.85, longitude: 2.35, date: None })
//!     .await?;
//! session
//!     .dispatch(CheckoutAction::RequestCheckout(PaymentToken::new(token_id)))
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod config;
pub mod error;
pub mod events;
pub mod menu;
pub mod navigation;
pub mod pending;
pub mod search;
pub mod session;
pub mod transport;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{CheckoutWorkflow, ClientCheckoutEvent};
pub use config::{ApiSettings, CheckoutSettings, ClientConfig};
pub use error::{ClientError, ClientResult};
pub use events::{EventBus, EventReceiver};
pub use menu::resolve_menus;
pub use navigation::{NavigationError, Navigator};
pub use pending::{FilePendingOrderStore, MemoryPendingOrderStore, PendingOrder, PendingOrderStore};
pub use search::{ClientSearchEvent, SearchWorkflow};
pub use session::Session;
pub use transport::{HttpTransport, Transport};
