//! # Domain Types
//!
//! Wire-level types exchanged with the ordering API.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Restaurant    │   │   MenuField     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  @id (IRI)      │   │  Inline(Menu)   │   │  @id (IRI)      │       │
//! │  │  availabilities │──►│  Reference(IRI) │   │  echoed fields  │       │
//! │  │  hasMenu        │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    MenuItem     │   │ AddressResource │   │  PaymentToken   │       │
//! │  │  @id, name,     │   │  opaque JSON    │   │  single use,    │       │
//! │  │  price (cents)  │   │  from typeahead │   │  never cloned   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## JSON-LD Identity
//! Every server resource is identified by its `@id` IRI (e.g.
//! `/api/restaurants/1`). IRIs are opaque: they are only ever compared or
//! fetched, never parsed.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

// =============================================================================
// Menu
// =============================================================================

/// A restaurant menu as returned by the API.
///
/// The ordering core never interprets its content; it only guarantees that a
/// resolved restaurant carries a JSON object here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Menu(Map<String, Value>);

impl Menu {
    pub fn new(fields: Map<String, Value>) -> Self {
        Menu(fields)
    }

    /// Wraps a raw JSON menu. Anything but an object is rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Menu(fields)),
            _ => None,
        }
    }

    /// Returns the menu's own IRI, if the server sent one.
    pub fn iri(&self) -> Option<&str> {
        self.0.get("@id").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// The `hasMenu` field of a restaurant.
///
/// Collections embed the menu for some restaurants and only link it for
/// others. A JSON string is a [`MenuField::Reference`], a JSON object an
/// inline menu. Any other value fails to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuField {
    /// IRI that must be fetched to obtain the menu.
    Reference(String),
    /// Menu already present in the payload.
    Inline(Menu),
}

impl MenuField {
    /// Returns true when the menu still needs a network round-trip.
    pub fn is_reference(&self) -> bool {
        matches!(self, MenuField::Reference(_))
    }

    /// Returns the concrete menu, if resolved.
    pub fn as_menu(&self) -> Option<&Menu> {
        match self {
            MenuField::Inline(menu) => Some(menu),
            MenuField::Reference(_) => None,
        }
    }
}

// =============================================================================
// Restaurant
// =============================================================================

/// A restaurant returned by the search endpoint.
///
/// Fields the ordering core does not use are kept in `extra` so the UI
/// receives the payload untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Restaurant IRI.
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Opening slots as ISO-8601 timestamps.
    #[serde(default)]
    pub availabilities: Vec<String>,

    #[serde(rename = "hasMenu")]
    pub has_menu: MenuField,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Restaurant {
    /// Returns the resolved menu, or `None` while it is still a reference.
    pub fn menu(&self) -> Option<&Menu> {
        self.has_menu.as_menu()
    }

    /// Returns a copy of this restaurant with the menu replaced.
    pub fn with_menu(self, menu: Menu) -> Self {
        Restaurant {
            has_menu: MenuField::Inline(menu),
            ..self
        }
    }
}

/// A Hydra collection envelope (`hydra:member`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection<T> {
    #[serde(rename = "hydra:member")]
    pub members: Vec<T>,

    #[serde(rename = "hydra:totalItems", default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
}

// =============================================================================
// Coordinate
// =============================================================================

/// A search position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }

    /// Value of the `coordinate` query parameter (`lat,lng`).
    pub fn query_value(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// A purchasable menu entry, as picked from a resolved menu by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItem {
    /// Menu item IRI.
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Unit price in cents.
    #[serde(rename = "price", default)]
    pub price_cents: i64,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_cents: i64) -> Self {
        MenuItem {
            id: id.into(),
            name: name.into(),
            price_cents,
        }
    }
}

// =============================================================================
// Address Resource
// =============================================================================

/// A postal address previously resolved by the address typeahead.
///
/// Sent back to the API as-is in `shippingAddress`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressResource(Value);

impl AddressResource {
    pub fn new(value: Value) -> Self {
        AddressResource(value)
    }

    /// Returns the address IRI when the address is already persisted.
    pub fn iri(&self) -> Option<&str> {
        match &self.0 {
            Value::String(iri) => Some(iri),
            other => other.get("@id").and_then(Value::as_str),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Returns true when the typeahead produced nothing usable.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order as created and updated by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order IRI (e.g. `/api/orders/42`).
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Order {
    /// Suffix appended to the order IRI to confirm payment.
    pub const PAYMENT_SUFFIX: &'static str = "/pay";

    /// Endpoint confirming payment for this order.
    pub fn payment_path(&self) -> String {
        format!("{}{}", self.id, Self::PAYMENT_SUFFIX)
    }

    /// Server-side order state (`cart`, `new`, `accepted`, ...), if echoed.
    pub fn state(&self) -> Option<&str> {
        self.fields.get("state").and_then(Value::as_str)
    }
}

// =============================================================================
// Payment Token
// =============================================================================

/// Card token obtained from the payment provider's SDK.
///
/// Deliberately neither `Clone` nor `Serialize`: a token is consumed by
/// exactly one checkout attempt through [`PaymentToken::into_request`].
pub struct PaymentToken {
    token_id: String,
}

impl PaymentToken {
    pub fn new(token_id: impl Into<String>) -> Self {
        PaymentToken {
            token_id: token_id.into(),
        }
    }

    /// Consumes the token into the payment confirmation body.
    pub fn into_request(self) -> PaymentRequest {
        PaymentRequest {
            stripe_token: self.token_id,
        }
    }
}

impl fmt::Debug for PaymentToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PaymentToken(<redacted>)")
    }
}

/// Body of `PUT <order>/pay`.
#[derive(Serialize)]
pub struct PaymentRequest {
    #[serde(rename = "stripeToken")]
    stripe_token: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_menu_field_reference_from_string() {
        let restaurant: Restaurant = serde_json::from_value(json!({
            "@id": "/api/restaurants/1",
            "name": "Chez Nous",
            "availabilities": ["2024-03-01T12:00:00+01:00"],
            "hasMenu": "/api/menus/1"
        }))
        .unwrap();

        assert_eq!(
            restaurant.has_menu,
            MenuField::Reference("/api/menus/1".to_string())
        );
        assert!(restaurant.menu().is_none());
    }

    #[test]
    fn test_menu_field_inline_from_object() {
        let restaurant: Restaurant = serde_json::from_value(json!({
            "@id": "/api/restaurants/2",
            "hasMenu": { "@id": "/api/menus/2", "hasMenuSection": [] }
        }))
        .unwrap();

        let menu = restaurant.menu().expect("menu should be inline");
        assert_eq!(menu.iri(), Some("/api/menus/2"));
        assert!(restaurant.availabilities.is_empty());
    }

    #[test]
    fn test_restaurant_keeps_unknown_fields() {
        let payload = json!({
            "@id": "/api/restaurants/3",
            "@type": "http://schema.org/Restaurant",
            "hasMenu": "/api/menus/3",
            "address": { "streetAddress": "1 rue de Rivoli" }
        });
        let restaurant: Restaurant = serde_json::from_value(payload.clone()).unwrap();

        assert!(restaurant.extra.contains_key("@type"));
        let back = serde_json::to_value(&restaurant).unwrap();
        assert_eq!(back["address"], payload["address"]);
    }

    #[test]
    fn test_with_menu_replaces_reference() {
        let restaurant: Restaurant = serde_json::from_value(json!({
            "@id": "/api/restaurants/1",
            "hasMenu": "/api/menus/1"
        }))
        .unwrap();

        let resolved = restaurant.with_menu(Menu::from_value(json!({ "@id": "/api/menus/1" })).unwrap());
        assert!(!resolved.has_menu.is_reference());
    }

    #[test]
    fn test_menu_field_rejects_non_objects() {
        for has_menu in [json!(null), json!(7), json!(["/api/menus/1"]), json!(true)] {
            let decoded = serde_json::from_value::<Restaurant>(json!({
                "@id": "/api/restaurants/1",
                "hasMenu": has_menu
            }));
            assert!(decoded.is_err(), "hasMenu {} should not decode", has_menu);
        }
        assert!(Menu::from_value(json!("menu")).is_none());
        assert!(Menu::from_value(json!({})).is_some());
    }

    #[test]
    fn test_coordinate_query_value() {
        assert_eq!(Coordinate::new(48.85, 2.35).query_value(), "48.85,2.35");
        assert_eq!(Coordinate::new(-33.5, 151.0).query_value(), "-33.5,151");
    }

    #[test]
    fn test_order_payment_path() {
        let order: Order = serde_json::from_value(json!({
            "@id": "/api/orders/42",
            "state": "cart"
        }))
        .unwrap();

        assert_eq!(order.payment_path(), "/api/orders/42/pay");
        assert_eq!(order.state(), Some("cart"));
    }

    #[test]
    fn test_payment_token_request_body() {
        let token = PaymentToken::new("tok_123");
        assert_eq!(format!("{:?}", token), "PaymentToken(<redacted>)");

        let body = serde_json::to_value(token.into_request()).unwrap();
        assert_eq!(body, json!({ "stripeToken": "tok_123" }));
    }

    #[test]
    fn test_address_resource_iri() {
        assert_eq!(
            AddressResource::new(json!("/api/addresses/9")).iri(),
            Some("/api/addresses/9")
        );
        assert_eq!(
            AddressResource::new(json!({ "@id": "/api/addresses/9" })).iri(),
            Some("/api/addresses/9")
        );
        assert!(AddressResource::new(json!({})).is_empty());
        assert!(!AddressResource::new(json!({ "streetAddress": "x" })).is_empty());
    }
}
