//! # Workflow Events
//!
//! Lifecycle events published by the search and checkout workflows.
//!
//! ## Generations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  search #1 ──Request(g1)────────────────────────────Success(g1) ✗ stale│
//! │  search #2 ─────────Request(g2)──────Success(g2) ✓                     │
//! │                                                                         │
//! │  Neither call is cancelled. Every event carries the generation of the  │
//! │  invocation that produced it and consumers drop anything older than    │
//! │  the newest generation they have seen.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Events are generic over the failure payload. The client publishes its own
//! error type; the reducer only needs [`FailureInfo`].

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Order, Restaurant};

// =============================================================================
// Generation
// =============================================================================

/// Monotonic invocation counter of one workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Generation {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An event tagged with the generation that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<E> {
    pub generation: Generation,
    pub event: E,
}

impl<E> Stamped<E> {
    pub fn new(generation: Generation, event: E) -> Self {
        Stamped { generation, event }
    }

    pub fn map<F, T>(self, f: F) -> Stamped<T>
    where
        F: FnOnce(E) -> T,
    {
        Stamped {
            generation: self.generation,
            event: f(self.event),
        }
    }
}

// =============================================================================
// Failure
// =============================================================================

/// Broad category of a workflow failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Rejected locally before anything was sent.
    Validation,
    /// Network or server failure.
    Transport,
    /// A menu could not be fetched.
    MenuResolution,
    /// The order was created but payment was refused.
    Payment,
    /// Payment succeeded but the app could not navigate.
    Navigation,
    /// Anything else (config, storage).
    Internal,
}

/// Cloneable summary of a failure, safe to hand to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FailureInfo {
    pub kind: FailureKind,
    pub message: String,
    /// True when trying again later may succeed.
    pub retryable: bool,
}

impl FailureInfo {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        FailureInfo {
            kind,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

impl fmt::Display for FailureInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

// =============================================================================
// Search Events
// =============================================================================

/// Lifecycle of one restaurant search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent<F = FailureInfo> {
    Request,
    /// Restaurants with resolved menus, filtered by date.
    Success(Vec<Restaurant>),
    Failure(F),
}

impl<F> SearchEvent<F> {
    pub fn map_failure<G, T>(self, f: G) -> SearchEvent<T>
    where
        G: FnOnce(F) -> T,
    {
        match self {
            SearchEvent::Request => SearchEvent::Request,
            SearchEvent::Success(list) => SearchEvent::Success(list),
            SearchEvent::Failure(err) => SearchEvent::Failure(f(err)),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SearchEvent::Request)
    }
}

// =============================================================================
// Checkout Events
// =============================================================================

/// Lifecycle of one checkout attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutEvent<F = FailureInfo> {
    Request,
    /// Published only after the navigation reset was dispatched.
    Success(Order),
    Failure(F),
}

impl<F> CheckoutEvent<F> {
    pub fn map_failure<G, T>(self, f: G) -> CheckoutEvent<T>
    where
        G: FnOnce(F) -> T,
    {
        match self {
            CheckoutEvent::Request => CheckoutEvent::Request,
            CheckoutEvent::Success(order) => CheckoutEvent::Success(order),
            CheckoutEvent::Failure(err) => CheckoutEvent::Failure(f(err)),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, CheckoutEvent::Request)
    }
}
