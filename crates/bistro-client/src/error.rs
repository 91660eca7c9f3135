//! # Client Error Types
//!
//! Error types for the ordering workflows.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │    Workflow     │  │     Local               │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Http           │  │  MenuResolution │  │  Core (cart rules)      │ │
//! │  │  Status         │  │  Payment        │  │  InvalidConfig          │ │
//! │  │  InvalidResponse│  │  Navigation     │  │  ConfigLoad/SaveFailed  │ │
//! │  │  Timeout        │  │                 │  │  Storage, Serialization │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Workflow errors wrap the transport error that caused them and name    │
//! │  the resource involved (restaurant or order IRI).                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bistro_core::{CoreError, FailureInfo, FailureKind, ValidationError};
use thiserror::Error;

use crate::navigation::NavigationError;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Every failure the client can report.
///
/// None of them is fatal: a workflow publishes a failure event and returns
/// the error, and the live cart is left as it was.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request could not be sent or the connection dropped.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The server answered with a non-2xx status.
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not what the endpoint promises.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The transport gave up waiting for a response.
    #[error("Request timed out")]
    Timeout,

    // =========================================================================
    // Workflow Errors
    // =========================================================================
    /// A restaurant's menu could not be fetched.
    #[error("Failed to resolve menu of {restaurant}: {source}")]
    MenuResolution {
        restaurant: String,
        #[source]
        source: Box<ClientError>,
    },

    /// The order exists but the payment confirmation failed.
    #[error("Payment for {order} failed: {source}")]
    Payment {
        order: String,
        #[source]
        source: Box<ClientError>,
    },

    /// Payment went through but the tracking screen could not be shown.
    #[error("Order {order} is paid but navigation failed: {source}")]
    Navigation {
        order: String,
        #[source]
        source: NavigationError,
    },

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// Cart rule or validation failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// The pending-order store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A value could not be encoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Core(CoreError::Validation(err))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ClientError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidConfig(format!("invalid URL: {}", err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if trying the same operation later may succeed.
    ///
    /// The workflows never retry on their own; this only drives what the UI
    /// offers the user.
    ///
    /// ## Retryable Errors
    /// - Connection failures and timeouts
    /// - 5xx and 429 responses
    /// - Menu resolution caused by one of the above
    ///
    /// ## Non-Retryable Errors
    /// - Payment failures (the card must not be charged twice)
    /// - 4xx responses, validation, configuration
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(_) | ClientError::Timeout => true,
            ClientError::Status { status, .. } => *status >= 500 || *status == 429,
            ClientError::MenuResolution { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }

    /// Returns the order IRI when the failure happened after order creation.
    pub fn order(&self) -> Option<&str> {
        match self {
            ClientError::Payment { order, .. } | ClientError::Navigation { order, .. } => {
                Some(order)
            }
            _ => None,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::Http(_)
            | ClientError::Status { .. }
            | ClientError::InvalidResponse(_)
            | ClientError::Timeout => FailureKind::Transport,
            ClientError::MenuResolution { .. } => FailureKind::MenuResolution,
            ClientError::Payment { .. } => FailureKind::Payment,
            ClientError::Navigation { .. } => FailureKind::Navigation,
            ClientError::Core(_) => FailureKind::Validation,
            ClientError::InvalidConfig(_)
            | ClientError::ConfigLoadFailed(_)
            | ClientError::ConfigSaveFailed(_)
            | ClientError::Storage(_)
            | ClientError::Serialization(_) => FailureKind::Internal,
        }
    }

    /// Cloneable summary handed to the reducer and the UI.
    pub fn failure_info(&self) -> FailureInfo {
        FailureInfo::new(self.kind(), self.to_string()).retryable(self.is_retryable())
    }
}
