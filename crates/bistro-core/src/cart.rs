//! # Cart
//!
//! The shopping cart and its canonical checkout representation.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  UI Action                Cart Method               Change              │
//! │  ─────────                ───────────               ──────              │
//! │                                                                         │
//! │  Tap menu item ─────────► add_item() ─────────────► push or merge line │
//! │                                                                         │
//! │  Tap "+" ───────────────► increment_item() ───────► lines[i].qty += 1  │
//! │                                                                         │
//! │  Tap "-" ───────────────► decrement_item() ───────► qty -= 1, drop at 0│
//! │                                                                         │
//! │  Swipe line ────────────► remove_item() ──────────► lines.remove(i)    │
//! │                                                                         │
//! │  Checkout ──────────────► for_delivery() ─────────► NEW cart (clone)   │
//! │                           to_request()              canonical body     │
//! │                                                                         │
//! │  NOTE: Checkout never touches the live cart. It works on the copy      │
//! │        returned by `for_delivery`, so a failed order leaves the cart   │
//! │        exactly as the user left it.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::types::{AddressResource, MenuItem};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// A line in the shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Local line identifier, never sent to the API.
    #[ts(as = "String")]
    pub id: Uuid,

    pub menu_item: MenuItem,

    pub quantity: u32,

    /// Selected option IRIs, in selection order.
    pub options: Vec<String>,
}

impl CartItem {
    fn new(menu_item: MenuItem, options: Vec<String>) -> Self {
        CartItem {
            id: Uuid::new_v4(),
            menu_item,
            quantity: 1,
            options,
        }
    }

    /// Two lines merge when they hold the same item with the same options.
    fn same_selection(&self, menu_item: &MenuItem, options: &[String]) -> bool {
        self.menu_item.id == menu_item.id && self.options == options
    }

    /// Calculates the line total (unit price × quantity).
    ///
    /// Prices come from the server; an out-of-range total saturates.
    pub fn line_total_cents(&self) -> i64 {
        self.menu_item
            .price_cents
            .saturating_mul(i64::from(self.quantity))
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by (menu item, options); re-adding merges
/// - Quantity is always > 0 (decrementing to zero drops the line)
/// - At most [`MAX_CART_ITEMS`] lines, [`MAX_ITEM_QUANTITY`] per line
/// - `shipping_address` and `shipped_at` are only set on checkout copies
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// IRI of the restaurant this cart orders from.
    pub restaurant: Option<String>,

    pub items: Vec<CartItem>,

    #[ts(type = "unknown")]
    pub shipping_address: Option<AddressResource>,

    #[ts(as = "Option<String>")]
    pub shipped_at: Option<NaiveDateTime>,
}

impl Cart {
    /// Creates a new empty cart, not yet attached to a restaurant.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Creates an empty cart for a restaurant.
    pub fn for_restaurant(restaurant: impl Into<String>) -> Self {
        Cart {
            restaurant: Some(restaurant.into()),
            ..Cart::default()
        }
    }

    /// Adds a menu item, or bumps the quantity of a matching line.
    ///
    /// Returns the id of the line that now holds the item.
    pub fn add_item(&mut self, menu_item: MenuItem, options: Vec<String>) -> CoreResult<Uuid> {
        if self.restaurant.is_none() {
            return Err(CoreError::CartNotInitialized);
        }

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|l| l.same_selection(&menu_item, &options))
        {
            let requested = line.quantity + 1;
            if requested > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = requested;
            return Ok(line.id);
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        let line = CartItem::new(menu_item, options);
        let id = line.id;
        self.items.push(line);
        Ok(id)
    }

    /// Removes a line entirely.
    pub fn remove_item(&mut self, line: Uuid) -> CoreResult<CartItem> {
        let index = self.position(line)?;
        Ok(self.items.remove(index))
    }

    /// Adds one to a line's quantity. Returns the new quantity.
    pub fn increment_item(&mut self, line: Uuid) -> CoreResult<u32> {
        let index = self.position(line)?;
        let item = &mut self.items[index];

        let requested = item.quantity + 1;
        if requested > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested,
                max: MAX_ITEM_QUANTITY,
            });
        }

        item.quantity = requested;
        Ok(requested)
    }

    /// Removes one from a line's quantity, dropping the line at zero.
    ///
    /// Returns the remaining quantity (0 when the line was dropped).
    pub fn decrement_item(&mut self, line: Uuid) -> CoreResult<u32> {
        let index = self.position(line)?;

        if self.items[index].quantity <= 1 {
            self.items.remove(index);
            return Ok(0);
        }

        let item = &mut self.items[index];
        item.quantity -= 1;
        Ok(item.quantity)
    }

    /// Clears all lines. The restaurant is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn set_delivery_address(&mut self, address: AddressResource) {
        self.shipping_address = Some(address);
    }

    pub fn set_delivery_date(&mut self, date: NaiveDateTime) {
        self.shipped_at = Some(date);
    }

    /// Returns an independent copy carrying delivery details.
    ///
    /// `self` is left untouched.
    pub fn for_delivery(
        &self,
        address: Option<AddressResource>,
        date: Option<NaiveDateTime>,
    ) -> Cart {
        let mut copy = self.clone();
        if let Some(address) = address {
            copy.set_delivery_address(address);
        }
        if let Some(date) = date {
            copy.set_delivery_date(date);
        }
        copy
    }

    /// Builds the canonical `POST /api/orders` body.
    pub fn to_request(&self) -> OrderRequest {
        OrderRequest {
            restaurant: self.restaurant.clone(),
            shipping_address: self.shipping_address.clone(),
            shipped_at: self.shipped_at,
            items: self
                .items
                .iter()
                .map(|line| OrderRequestItem {
                    menu_item: line.menu_item.id.clone(),
                    quantity: line.quantity,
                    options: line.options.clone(),
                })
                .collect(),
        }
    }

    /// The canonical body as JSON.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self.to_request())
    }

    /// Returns the line with the given id.
    pub fn line(&self, line: Uuid) -> Option<&CartItem> {
        self.items.iter().find(|l| l.id == line)
    }

    /// Returns the number of lines in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all lines.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Calculates the subtotal. Fees and taxes are computed server-side.
    pub fn subtotal_cents(&self) -> i64 {
        self.items
            .iter()
            .map(CartItem::line_total_cents)
            .fold(0, i64::saturating_add)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, line: Uuid) -> CoreResult<usize> {
        self.items
            .iter()
            .position(|l| l.id == line)
            .ok_or(CoreError::LineNotFound(line))
    }
}

/// Cart totals summary for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: u32,
    pub subtotal_cents: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal_cents: cart.subtotal_cents(),
        }
    }
}

// =============================================================================
// Checkout Request Body
// =============================================================================

/// Canonical body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<AddressResource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipped_at: Option<NaiveDateTime>,

    pub items: Vec<OrderRequestItem>,
}

/// A line of [`OrderRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequestItem {
    pub menu_item: String,
    pub quantity: u32,
    pub options: Vec<String>,
}
