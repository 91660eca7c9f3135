//! # Navigator
//!
//! The seam between the checkout workflow and the app's router.
//!
//! The workflow only ever asks for one thing: replace the whole stack with
//! a [`StackReset`]. Implementations must apply it atomically; a partially
//! applied reset is reported as an error.

use bistro_core::StackReset;
use thiserror::Error;

/// Failure reported by the router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The router is not mounted yet (app still starting, or in background).
    #[error("Navigator is not ready")]
    NotReady,

    /// A route in the reset is not registered.
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("Navigation rejected: {0}")]
    Rejected(String),
}

/// Applies stack resets to the app's router.
pub trait Navigator: Send + Sync {
    fn reset(&self, reset: StackReset) -> Result<(), NavigationError>;
}
