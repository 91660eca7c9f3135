//! # bistro-core: Pure Ordering Logic for Bistro
//!
//! This crate is the **heart** of the Bistro ordering flow. It contains the
//! domain model, the cart, the availability filter and the checkout state
//! reducer as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bistro Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Mobile shell (React Native)                     │   │
//! │  │  Address picker ──► Restaurant list ──► Cart ──► Checkout      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ actions / events                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bistro-client                                │   │
//! │  │    SearchWorkflow, CheckoutWorkflow, Session, Transport         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bistro-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐ │   │
//! │  │   │   types   │  │   cart    │  │availability│  │   state   │ │   │
//! │  │   │Restaurant │  │   Cart    │  │filter_by_  │  │ reducer   │ │   │
//! │  │   │ MenuField │  │ CartItem  │  │   date     │  │ + effects │ │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO NAVIGATION • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire types (Restaurant, MenuField, Order, PaymentToken, ...)
//! - [`cart`] - The shopping cart and its canonical checkout body
//! - [`availability`] - Calendar-day availability filtering
//! - [`navigation`] - Named routes and the post-checkout stack reset
//! - [`event`] - Workflow lifecycle events and generation tokens
//! - [`state`] - Checkout state reducer (actions in, effects out)
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use bistro_core::cart::Cart;
//! use bistro_core::types::MenuItem;
//!
//! let mut cart = Cart::for_restaurant("/api/restaurants/1");
//! let line = cart
//!     .add_item(MenuItem::new("/api/menu_items/7", "Margherita", 900), vec![])
//!     .unwrap();
//! cart.increment_item(line).unwrap();
//!
//! assert_eq!(cart.total_quantity(), 2);
//! assert_eq!(cart.subtotal_cents(), 1800);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod availability;
pub mod cart;
pub mod error;
pub mod event;
pub mod navigation;
pub mod state;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartTotals, OrderRequest};
pub use error::{CoreError, CoreResult, ValidationError};
pub use event::{CheckoutEvent, FailureInfo, FailureKind, Generation, SearchEvent, Stamped};
pub use navigation::{Route, StackReset};
pub use state::{CheckoutAction, CheckoutState, Effect, Phase};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of distinct lines in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single cart line.
///
/// Keeps a mistyped quantity from turning into a catering order.
pub const MAX_ITEM_QUANTITY: u32 = 99;
