//! # Menu Resolver
//!
//! Turns `hasMenu` references into concrete menus.
//!
//! ## Fan-out
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  input    [ A: "/api/menus/1" ] [ B: {inline} ] [ C: "/api/menus/3" ]  │
//! │                  │                    │                  │              │
//! │                  ▼                    │                  ▼              │
//! │             GET /api/menus/1          │             GET /api/menus/3    │
//! │                  │   (concurrently)   │                  │              │
//! │                  ▼                    ▼                  ▼              │
//! │  output   [ A: {menu 1}     ] [ B: {inline} ] [ C: {menu 3}     ]      │
//! │                                                                         │
//! │  Output order follows input order, whatever order the fetches finish.  │
//! │  The first failed fetch fails the whole batch; the others are dropped. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bistro_core::{Menu, MenuField, Restaurant};
use futures_util::future::try_join_all;
use tracing::{debug, instrument};

use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;

/// Resolves the menu of every restaurant.
///
/// Inline menus pass through without a network call.
#[instrument(skip_all, fields(count = restaurants.len()))]
pub async fn resolve_menus(
    transport: &dyn Transport,
    restaurants: Vec<Restaurant>,
) -> ClientResult<Vec<Restaurant>> {
    try_join_all(
        restaurants
            .into_iter()
            .map(|restaurant| resolve_menu(transport, restaurant)),
    )
    .await
}

/// Resolves a single restaurant's menu.
pub async fn resolve_menu(transport: &dyn Transport, restaurant: Restaurant) -> ClientResult<Restaurant> {
    let iri = match &restaurant.has_menu {
        MenuField::Inline(_) => return Ok(restaurant),
        MenuField::Reference(iri) => iri.clone(),
    };

    debug!(restaurant = %restaurant.id, menu = %iri, "Fetching menu");
    let wrap = |source: ClientError| ClientError::MenuResolution {
        restaurant: restaurant.id.clone(),
        source: Box::new(source),
    };

    let value = transport.get(&iri).await.map_err(wrap)?;
    let menu = Menu::from_value(value).ok_or_else(|| {
        wrap(ClientError::InvalidResponse(format!(
            "menu {} is not a JSON object",
            iri
        )))
    })?;

    Ok(restaurant.with_menu(menu))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Method, StubTransport};
    use serde_json::{json, Value};
    use std::time::Duration;

    fn restaurant(id: u32, menu: Value) -> Restaurant {
        serde_json::from_value(json!({
            "@id": format!("/api/restaurants/{}", id),
            "hasMenu": menu
        }))
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_preserved_under_reversed_completion() {
        // The first menu is the slowest, the last one the fastest.
        let transport = (1..=4u64).fold(StubTransport::new(), |t, i| {
            t.on_delayed(
                Method::Get,
                &format!("/api/menus/{}", i),
                json!({ "@id": format!("/api/menus/{}", i) }),
                Duration::from_millis(100 * (5 - i)),
            )
        });
        let input: Vec<_> = (1..=4)
            .map(|i| restaurant(i, json!(format!("/api/menus/{}", i))))
            .collect();

        let resolved = resolve_menus(&transport, input).await.unwrap();

        assert_eq!(resolved.len(), 4);
        for (i, r) in resolved.iter().enumerate() {
            let n = i + 1;
            assert_eq!(r.id, format!("/api/restaurants/{}", n));
            assert_eq!(r.menu().and_then(Menu::iri), Some(format!("/api/menus/{}", n).as_str()));
        }
    }

    #[tokio::test]
    async fn test_inline_menus_skip_network() {
        let transport = StubTransport::new();
        let input = vec![restaurant(1, json!({ "@id": "/api/menus/1", "sections": [] }))];

        let resolved = resolve_menus(&transport, input.clone()).await.unwrap();

        assert_eq!(resolved, input);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_fetches_run_concurrently() {
        let transport = StubTransport::new()
            .on(Method::Get, "/api/menus/1", json!({}))
            .on(Method::Get, "/api/menus/2", json!({}));
        let input = vec![
            restaurant(1, json!("/api/menus/1")),
            restaurant(2, json!({ "inline": true })),
            restaurant(3, json!("/api/menus/2")),
        ];

        let resolved = resolve_menus(&transport, input).await.unwrap();

        assert!(resolved.iter().all(|r| r.menu().is_some()));
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_first_failure_fails_all() {
        let transport = StubTransport::new()
            .on(Method::Get, "/api/menus/1", json!({}))
            .fail(Method::Get, "/api/menus/2", ClientError::Timeout);
        let input = vec![
            restaurant(1, json!("/api/menus/1")),
            restaurant(2, json!("/api/menus/2")),
        ];

        let err = resolve_menus(&transport, input).await.unwrap_err();

        match err {
            ClientError::MenuResolution { restaurant, source } => {
                assert_eq!(restaurant, "/api/restaurants/2");
                assert!(matches!(*source, ClientError::Timeout));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_failure_still_fails_batch() {
        // Both successes are in before the failure arrives.
        let transport = StubTransport::new()
            .on(Method::Get, "/api/menus/1", json!({}))
            .on(Method::Get, "/api/menus/3", json!({}))
            .fail_delayed(
                Method::Get,
                "/api/menus/2",
                ClientError::Status {
                    status: 503,
                    body: "unavailable".into(),
                },
                Duration::from_millis(500),
            );
        let input = vec![
            restaurant(1, json!("/api/menus/1")),
            restaurant(2, json!("/api/menus/2")),
            restaurant(3, json!("/api/menus/3")),
        ];

        let err = resolve_menus(&transport, input).await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::MenuResolution { ref restaurant, .. } if restaurant == "/api/restaurants/2"
        ));
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_non_object_menu_is_rejected() {
        let transport = StubTransport::new().on(Method::Get, "/api/menus/1", json!("oops"));

        let err = resolve_menu(&transport, restaurant(1, json!("/api/menus/1")))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::MenuResolution { .. }));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let transport = StubTransport::new();
        assert!(resolve_menus(&transport, Vec::new()).await.unwrap().is_empty());
    }
}
