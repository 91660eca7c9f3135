//! # Validation Module
//!
//! Business rule validation for values that leave the client.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Mobile shell                                                 │
//! │  ├── Address typeahead, date picker                                    │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Workflows (Rust)                                             │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: coordinates before search, cart before checkout     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ordering API                                                 │
//! │  ├── Opening hours, delivery zone                                      │
//! │  └── Payment authorization                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bistro_core::validation::{validate_coordinate, validate_quantity};
//!
//! validate_coordinate(48.85, 2.35).unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::cart::Cart;
use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > i64::from(MAX_ITEM_QUANTITY) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }

    Ok(())
}

/// Validates a search position.
///
/// ## Example
/// ```rust
/// use bistro_core::validation::validate_coordinate;
///
/// assert!(validate_coordinate(48.85, 2.35).is_ok());
/// assert!(validate_coordinate(91.0, 2.35).is_err());
/// assert!(validate_coordinate(f64::NAN, 0.0).is_err());
/// ```
pub fn validate_coordinate(latitude: f64, longitude: f64) -> ValidationResult<()> {
    check_degrees("latitude", latitude, 90)?;
    check_degrees("longitude", longitude, 180)
}

fn check_degrees(field: &str, value: f64, bound: i64) -> ValidationResult<()> {
    // NaN fails the range check as well.
    if !(value >= -(bound as f64) && value <= bound as f64) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: -bound,
            max: bound,
        });
    }
    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a resource IRI.
///
/// IRIs are opaque, so only the shape is checked: a server-relative path or
/// an absolute http(s) URL.
pub fn validate_iri(field: &str, iri: &str) -> ValidationResult<()> {
    let iri = iri.trim();

    if iri.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if !(iri.starts_with('/') || iri.starts_with("http://") || iri.starts_with("https://")) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a path or an http(s) URL".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Checkout Validators
// =============================================================================

/// Validates a checkout copy of the cart before it is submitted.
///
/// ## Rules
/// - A restaurant must be set
/// - At least one line
/// - Every line quantity within limits
/// - A non-empty delivery address and a delivery date
pub fn validate_checkout(cart: &Cart) -> ValidationResult<()> {
    match cart.restaurant.as_deref() {
        Some(restaurant) => validate_iri("restaurant", restaurant)?,
        None => {
            return Err(ValidationError::Required {
                field: "restaurant".to_string(),
            })
        }
    }

    if cart.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    for line in &cart.items {
        validate_iri("menuItem", &line.menu_item.id)?;
        validate_quantity(i64::from(line.quantity))?;
    }

    match &cart.shipping_address {
        Some(address) if !address.is_empty() => {}
        _ => {
            return Err(ValidationError::Required {
                field: "shippingAddress".to_string(),
            })
        }
    }

    if cart.shipped_at.is_none() {
        return Err(ValidationError::Required {
            field: "shippedAt".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AddressResource, MenuItem};
    use chrono::NaiveDateTime;
    use serde_json::json;

    fn ready_cart() -> Cart {
        let mut cart = Cart::for_restaurant("/api/restaurants/1");
        cart.add_item(MenuItem::new("/api/menu_items/7", "Margherita", 900), vec![])
            .unwrap();
        cart.for_delivery(
            Some(AddressResource::new(json!("/api/addresses/9"))),
            Some(
                NaiveDateTime::parse_from_str("2024-03-01 12:30:00", "%Y-%m-%d %H:%M:%S")
                    .unwrap(),
            ),
        )
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(99).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(100).is_err());
    }

    #[test]
    fn test_validate_coordinate() {
        assert!(validate_coordinate(0.0, 0.0).is_ok());
        assert!(validate_coordinate(-90.0, 180.0).is_ok());

        assert!(validate_coordinate(90.1, 0.0).is_err());
        assert!(validate_coordinate(0.0, -180.5).is_err());
        assert!(validate_coordinate(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_iri() {
        assert!(validate_iri("restaurant", "/api/restaurants/1").is_ok());
        assert!(validate_iri("restaurant", "https://demo.bistro.app/api/restaurants/1").is_ok());

        assert_eq!(
            validate_iri("restaurant", "  "),
            Err(ValidationError::Required {
                field: "restaurant".to_string()
            })
        );
        assert!(matches!(
            validate_iri("restaurant", "restaurants/1"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_checkout_ok() {
        assert!(validate_checkout(&ready_cart()).is_ok());
    }

    #[test]
    fn test_validate_checkout_missing_fields() {
        let mut cart = ready_cart();
        cart.shipping_address = Some(AddressResource::new(json!({})));
        assert_eq!(
            validate_checkout(&cart),
            Err(ValidationError::Required {
                field: "shippingAddress".to_string()
            })
        );

        let mut cart = ready_cart();
        cart.shipped_at = None;
        assert_eq!(
            validate_checkout(&cart),
            Err(ValidationError::Required {
                field: "shippedAt".to_string()
            })
        );

        let mut cart = ready_cart();
        cart.clear();
        assert_eq!(
            validate_checkout(&cart),
            Err(ValidationError::Empty {
                field: "items".to_string()
            })
        );

        let mut cart = ready_cart();
        cart.restaurant = None;
        assert!(matches!(
            validate_checkout(&cart),
            Err(ValidationError::Required { .. })
        ));
    }
}
