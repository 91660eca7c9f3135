//! # Checkout State
//!
//! The live ordering state and its reducer.
//!
//! ## Reducer Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Actions In, Effects Out                              │
//! │                                                                         │
//! │   UI ──► CheckoutAction ──► CheckoutState::apply() ──► Vec<Effect>     │
//! │                                    │                        │           │
//! │                                    │ mutates                │ run by    │
//! │                                    ▼                        ▼ Session   │
//! │                             cart, address,           SearchWorkflow     │
//! │                             restaurants, phases      CheckoutWorkflow   │
//! │                                    ▲                        │           │
//! │                                    └── Search / Checkout ◄──┘           │
//! │                                        (stamped events)                 │
//! │                                                                         │
//! │  The reducer never performs I/O. Stamped events older than the newest  │
//! │  generation seen for that workflow are ignored.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, CartTotals};
use crate::error::CoreResult;
use crate::event::{CheckoutEvent, FailureInfo, Generation, SearchEvent, Stamped};
use crate::types::{AddressResource, MenuItem, Order, PaymentToken, Restaurant};

// =============================================================================
// Workflow Status
// =============================================================================

/// Where a workflow is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Requesting,
    Succeeded,
    Failed,
}

/// Phase of one workflow plus the generation it belongs to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowStatus {
    pub phase: Phase,
    pub generation: Generation,
    pub error: Option<FailureInfo>,
}

impl WorkflowStatus {
    /// Accepts an event of `generation`, returning false when it is stale.
    fn observe(&mut self, generation: Generation) -> bool {
        if generation < self.generation {
            return false;
        }
        self.generation = generation;
        true
    }

    fn set(&mut self, phase: Phase, error: Option<FailureInfo>) {
        self.phase = phase;
        self.error = error;
    }

    pub fn is_in_flight(&self) -> bool {
        self.phase == Phase::Requesting
    }
}

// =============================================================================
// Actions and Effects
// =============================================================================

/// Everything that can change [`CheckoutState`].
#[derive(Debug)]
pub enum CheckoutAction {
    /// Starts a cart for a restaurant with the chosen address and date.
    Init {
        restaurant: String,
        address: Option<AddressResource>,
        date: Option<NaiveDateTime>,
    },
    /// Adds an item; the same item with the same options bumps its line.
    AddItem {
        item: MenuItem,
        options: Vec<String>,
    },
    RemoveItem(Uuid),
    IncrementItem(Uuid),
    /// Removes the line when its quantity reaches zero.
    DecrementItem(Uuid),
    SetAddressResource(AddressResource),
    SetDeliveryDate(NaiveDateTime),
    /// Empties the cart and forgets the last order.
    Clear,

    /// Asks for a restaurant search.
    RequestSearch {
        latitude: f64,
        longitude: f64,
        date: Option<NaiveDate>,
    },
    /// Asks for a checkout of the current cart.
    RequestCheckout(PaymentToken),

    /// A search lifecycle event.
    Search(Stamped<SearchEvent>),
    /// A checkout lifecycle event.
    Checkout(Stamped<CheckoutEvent>),
}

/// Side effects requested by the reducer.
#[derive(Debug)]
pub enum Effect {
    SearchRestaurants {
        latitude: f64,
        longitude: f64,
        date: Option<NaiveDate>,
    },
    Checkout(PaymentToken),
}

// =============================================================================
// Checkout State
// =============================================================================

/// Live ordering state shared by the UI and the workflows.
#[derive(Debug, Clone, Default)]
pub struct CheckoutState {
    pub cart: Cart,
    /// Delivery address chosen on the search screen.
    pub address: Option<AddressResource>,
    /// Delivery date chosen on the search screen.
    pub date: Option<NaiveDateTime>,
    /// Latest search results.
    pub restaurants: Vec<Restaurant>,
    pub search: WorkflowStatus,
    pub checkout: WorkflowStatus,
    /// Last order confirmed by a checkout.
    pub last_order: Option<Order>,
}

impl CheckoutState {
    pub fn new() -> Self {
        CheckoutState::default()
    }

    /// Applies an action and returns the effects to run.
    ///
    /// Cart rule violations leave the state unchanged and are returned as
    /// errors.
    pub fn apply(&mut self, action: CheckoutAction) -> CoreResult<Vec<Effect>> {
        match action {
            CheckoutAction::Init {
                restaurant,
                address,
                date,
            } => {
                self.cart = Cart::for_restaurant(restaurant);
                self.address = address;
                self.date = date;
            }
            CheckoutAction::AddItem { item, options } => {
                self.cart.add_item(item, options)?;
            }
            CheckoutAction::RemoveItem(line) => {
                self.cart.remove_item(line)?;
            }
            CheckoutAction::IncrementItem(line) => {
                self.cart.increment_item(line)?;
            }
            CheckoutAction::DecrementItem(line) => {
                self.cart.decrement_item(line)?;
            }
            CheckoutAction::SetAddressResource(address) => {
                self.address = Some(address);
            }
            CheckoutAction::SetDeliveryDate(date) => {
                self.date = Some(date);
            }
            CheckoutAction::Clear => {
                self.cart.clear();
                self.last_order = None;
            }
            CheckoutAction::RequestSearch {
                latitude,
                longitude,
                date,
            } => {
                return Ok(vec![Effect::SearchRestaurants {
                    latitude,
                    longitude,
                    date,
                }]);
            }
            CheckoutAction::RequestCheckout(token) => {
                return Ok(vec![Effect::Checkout(token)]);
            }
            CheckoutAction::Search(stamped) => self.on_search(stamped),
            CheckoutAction::Checkout(stamped) => self.on_checkout(stamped),
        }
        Ok(Vec::new())
    }

    fn on_search(&mut self, Stamped { generation, event }: Stamped<SearchEvent>) {
        if !self.search.observe(generation) {
            return;
        }
        match event {
            SearchEvent::Request => self.search.set(Phase::Requesting, None),
            SearchEvent::Success(restaurants) => {
                self.restaurants = restaurants;
                self.search.set(Phase::Succeeded, None);
            }
            SearchEvent::Failure(info) => self.search.set(Phase::Failed, Some(info)),
        }
    }

    fn on_checkout(&mut self, Stamped { generation, event }: Stamped<CheckoutEvent>) {
        if !self.checkout.observe(generation) {
            return;
        }
        match event {
            CheckoutEvent::Request => self.checkout.set(Phase::Requesting, None),
            CheckoutEvent::Success(order) => {
                // The order is confirmed and the app has left the cart screen.
                self.cart = Cart::new();
                self.last_order = Some(order);
                self.checkout.set(Phase::Succeeded, None);
            }
            CheckoutEvent::Failure(info) => self.checkout.set(Phase::Failed, Some(info)),
        }
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&self.cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::event::FailureKind;
    use serde_json::json;

    fn order() -> Order {
        serde_json::from_value(json!({ "@id": "/api/orders/42" })).unwrap()
    }

    fn initialized() -> CheckoutState {
        let mut state = CheckoutState::new();
        state
            .apply(CheckoutAction::Init {
                restaurant: "/api/restaurants/1".into(),
                address: Some(AddressResource::new(json!("/api/addresses/9"))),
                date: None,
            })
            .unwrap();
        state
            .apply(CheckoutAction::AddItem {
                item: MenuItem::new("/api/menu_items/7", "Margherita", 900),
                options: vec![],
            })
            .unwrap();
        state
    }

    #[test]
    fn test_cart_actions() {
        let mut state = initialized();
        let line = state.cart.items[0].id;

        state.apply(CheckoutAction::IncrementItem(line)).unwrap();
        assert_eq!(state.totals().total_quantity, 2);

        state.apply(CheckoutAction::DecrementItem(line)).unwrap();
        state.apply(CheckoutAction::DecrementItem(line)).unwrap();
        assert!(state.cart.is_empty());

        let err = state.apply(CheckoutAction::RemoveItem(line)).unwrap_err();
        assert_eq!(err, CoreError::LineNotFound(line));
    }

    #[test]
    fn test_add_before_init_is_rejected() {
        let mut state = CheckoutState::new();
        let result = state.apply(CheckoutAction::AddItem {
            item: MenuItem::new("/api/menu_items/7", "Margherita", 900),
            options: vec![],
        });
        assert!(matches!(result, Err(CoreError::CartNotInitialized)));
    }

    #[test]
    fn test_requests_produce_effects() {
        let mut state = CheckoutState::new();

        let effects = state
            .apply(CheckoutAction::RequestSearch {
                latitude: 48.85,
                longitude: 2.35,
                date: None,
            })
            .unwrap();
        assert!(matches!(effects.as_slice(), [Effect::SearchRestaurants { .. }]));

        let effects = state
            .apply(CheckoutAction::RequestCheckout(PaymentToken::new("tok_1")))
            .unwrap();
        assert!(matches!(effects.as_slice(), [Effect::Checkout(_)]));
    }

    #[test]
    fn test_checkout_success_clears_cart() {
        let mut state = initialized();

        state
            .apply(CheckoutAction::Checkout(Stamped::new(Generation(1), CheckoutEvent::Request)))
            .unwrap();
        assert!(state.checkout.is_in_flight());
        assert!(!state.cart.is_empty());

        state
            .apply(CheckoutAction::Checkout(Stamped::new(
                Generation(1),
                CheckoutEvent::Success(order()),
            )))
            .unwrap();
        assert_eq!(state.checkout.phase, Phase::Succeeded);
        assert!(state.cart.is_empty());
        assert_eq!(state.last_order, Some(order()));
    }

    #[test]
    fn test_checkout_failure_keeps_cart() {
        let mut state = initialized();
        let before = state.cart.clone();

        state
            .apply(CheckoutAction::Checkout(Stamped::new(
                Generation(1),
                CheckoutEvent::Failure(FailureInfo::new(FailureKind::Payment, "card declined")),
            )))
            .unwrap();

        assert_eq!(state.checkout.phase, Phase::Failed);
        assert_eq!(state.cart, before);
        assert_eq!(
            state.checkout.error.as_ref().map(|e| e.kind),
            Some(FailureKind::Payment)
        );
    }

    #[test]
    fn test_stale_search_events_are_ignored() {
        let mut state = CheckoutState::new();
        let restaurant: Restaurant = serde_json::from_value(json!({
            "@id": "/api/restaurants/1",
            "hasMenu": { "@id": "/api/menus/1" }
        }))
        .unwrap();

        for (generation, event) in [
            (1, SearchEvent::Request),
            (2, SearchEvent::Request),
            (2, SearchEvent::Success(vec![restaurant.clone()])),
            (1, SearchEvent::Success(vec![])),
        ] {
            state
                .apply(CheckoutAction::Search(Stamped::new(Generation(generation), event)))
                .unwrap();
        }

        assert_eq!(state.search.generation, Generation(2));
        assert_eq!(state.search.phase, Phase::Succeeded);
        assert_eq!(state.restaurants, vec![restaurant]);
    }
}
