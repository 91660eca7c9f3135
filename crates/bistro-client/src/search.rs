//! # Restaurant Search Workflow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Search Sequence                                      │
//! │                                                                         │
//! │  search(lat, lng, date)                                                │
//! │     │                                                                   │
//! │     ├─► Request ──────────────────────────────────────► EventBus        │
//! │     │                                                                   │
//! │     ├─► validate coordinates                                           │
//! │     ├─► GET /api/restaurants?coordinate=lat,lng      ─┐                │
//! │     ├─► resolve_menus (concurrent)                    ├─ any error ──► │
//! │     ├─► filter_by_date                                │   Failure      │
//! │     │                                                 ─┘                │
//! │     └─► Success(restaurants) ─────────────────────────► EventBus        │
//! │                                                                         │
//! │  Idle ──► Requesting ──► Succeeded | Failed                            │
//! │  A new search does not cancel the previous one; its events carry a     │
//! │  newer generation instead.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use bistro_core::availability::filter_by_date;
use bistro_core::validation::validate_coordinate;
use bistro_core::{Collection, Coordinate, Restaurant, SearchEvent};
use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn, Span};

use crate::error::{ClientError, ClientResult};
use crate::events::{EventBus, EventReceiver};
use crate::menu::resolve_menus;
use crate::transport::Transport;

/// Collection endpoint of restaurants.
pub const RESTAURANTS_PATH: &str = "/api/restaurants";

/// Search events as published by the client.
pub type ClientSearchEvent = SearchEvent<ClientError>;

/// Finds restaurants around a position that deliver on a given day.
pub struct SearchWorkflow {
    transport: Arc<dyn Transport>,
    events: EventBus<ClientSearchEvent>,
}

impl SearchWorkflow {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        SearchWorkflow {
            transport,
            events: EventBus::default(),
        }
    }

    pub fn subscribe(&self) -> EventReceiver<ClientSearchEvent> {
        self.events.subscribe()
    }

    /// Runs one search, publishing its lifecycle events.
    ///
    /// The error is both published and returned.
    #[instrument(skip(self), fields(generation = tracing::field::Empty))]
    pub async fn search(
        &self,
        latitude: f64,
        longitude: f64,
        date: Option<NaiveDate>,
    ) -> ClientResult<Vec<Restaurant>> {
        let generation = self.events.begin();
        Span::current().record("generation", tracing::field::display(generation));
        self.events.publish(generation, SearchEvent::Request);

        match self.run(latitude, longitude, date).await {
            Ok(restaurants) => {
                info!(count = restaurants.len(), "Search complete");
                self.events
                    .publish(generation, SearchEvent::Success(restaurants.clone()));
                Ok(restaurants)
            }
            Err(err) => {
                warn!(error = %err, "Search failed");
                self.events.publish(generation, SearchEvent::Failure(err.clone()));
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        latitude: f64,
        longitude: f64,
        date: Option<NaiveDate>,
    ) -> ClientResult<Vec<Restaurant>> {
        validate_coordinate(latitude, longitude)?;

        let path = restaurants_path(Coordinate::new(latitude, longitude));
        let value = self.transport.get(&path).await?;
        let collection: Collection<Restaurant> = serde_json::from_value(value)
            .map_err(|e| ClientError::InvalidResponse(format!("restaurant collection: {}", e)))?;
        debug!(found = collection.members.len(), "Restaurants fetched");

        let resolved = resolve_menus(self.transport.as_ref(), collection.members).await?;
        Ok(filter_by_date(resolved, date))
    }
}

/// `GET` path of the restaurants around `coordinate`.
pub fn restaurants_path(coordinate: Coordinate) -> String {
    format!("{}?coordinate={}", RESTAURANTS_PATH, coordinate.query_value())
}
