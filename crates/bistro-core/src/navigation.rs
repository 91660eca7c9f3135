//! # Navigation
//!
//! Named routes and the stack reset dispatched after a confirmed checkout.
//!
//! ```text
//!   before checkout                      after reset (index = 2)
//!   ───────────────                      ───────────────────────
//!   [Home, Restaurant, Cart, Checkout]   [AccountHome, AccountOrders, OrderTracking]
//!                                                                      ▲ active
//! ```
//!
//! The router itself lives in the mobile shell; this module only describes
//! what it should show.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::Order;

/// A named screen of the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "params")]
pub enum Route {
    AccountHome,
    AccountOrders,
    /// Live tracking of a confirmed order.
    OrderTracking { order: Order },
}

impl Route {
    /// Route name as registered with the router.
    pub fn name(&self) -> &'static str {
        match self {
            Route::AccountHome => "AccountHome",
            Route::AccountOrders => "AccountOrders",
            Route::OrderTracking { .. } => "OrderTracking",
        }
    }

    /// Route params passed to the screen.
    pub fn params(&self) -> Value {
        match self {
            Route::OrderTracking { order } => json!({ "order": order }),
            _ => json!({}),
        }
    }
}

/// Replaces the whole navigation stack in one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackReset {
    /// Index of the active route in `routes`.
    pub index: usize,
    pub routes: Vec<Route>,
}

impl StackReset {
    /// Builds a reset. `index` is clamped to the last route.
    pub fn new(routes: Vec<Route>, index: usize) -> Self {
        let index = index.min(routes.len().saturating_sub(1));
        StackReset { index, routes }
    }

    /// The post-checkout stack: account, order history, then tracking.
    pub fn order_tracking(order: Order) -> Self {
        StackReset::new(
            vec![
                Route::AccountHome,
                Route::AccountOrders,
                Route::OrderTracking { order },
            ],
            2,
        )
    }

    /// The active route.
    pub fn active(&self) -> Option<&Route> {
        self.routes.get(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        serde_json::from_value(json!({ "@id": "/api/orders/42", "state": "new" })).unwrap()
    }

    #[test]
    fn test_order_tracking_reset() {
        let reset = StackReset::order_tracking(order());

        assert_eq!(reset.index, 2);
        let names: Vec<_> = reset.routes.iter().map(Route::name).collect();
        assert_eq!(names, vec!["AccountHome", "AccountOrders", "OrderTracking"]);
        assert_eq!(reset.active(), Some(&Route::OrderTracking { order: order() }));
    }

    #[test]
    fn test_route_params() {
        assert_eq!(Route::AccountHome.params(), json!({}));
        let params = Route::OrderTracking { order: order() }.params();
        assert_eq!(params["order"]["@id"], "/api/orders/42");
    }

    #[test]
    fn test_route_serialization() {
        let value = serde_json::to_value(Route::AccountOrders).unwrap();
        assert_eq!(value, json!({ "name": "AccountOrders" }));
    }

    #[test]
    fn test_index_is_clamped() {
        let reset = StackReset::new(vec![Route::AccountHome], 5);
        assert_eq!(reset.index, 0);
    }
}
