//! # Pending Order Store
//!
//! Remembers a paid order until the app has navigated to it.
//!
//! ## Crash Window
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PUT /pay ✓ ──► save(pending) ──► navigator.reset ──► Success ──► clear │
//! │                      │                                                  │
//! │                      └── if the app dies anywhere after this point,    │
//! │                          Session::recover_pending() finds the order    │
//! │                          on next start and shows its tracking screen.  │
//! │                                                                         │
//! │  Without the marker a crash between payment and navigation leaves a    │
//! │  charged customer looking at a full cart.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use bistro_core::Order;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// A paid order not yet shown to the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOrder {
    pub order: Order,
    pub confirmed_at: DateTime<Utc>,
}

impl PendingOrder {
    pub fn new(order: Order) -> Self {
        PendingOrder {
            order,
            confirmed_at: Utc::now(),
        }
    }
}

/// Durable slot holding at most one [`PendingOrder`].
#[async_trait]
pub trait PendingOrderStore: Send + Sync {
    async fn save(&self, pending: &PendingOrder) -> ClientResult<()>;
    async fn load(&self) -> ClientResult<Option<PendingOrder>>;
    async fn clear(&self) -> ClientResult<()>;
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Store that does not survive a restart. Used when no path is configured.
#[derive(Debug, Default)]
pub struct MemoryPendingOrderStore {
    slot: Mutex<Option<PendingOrder>>,
}

impl MemoryPendingOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> ClientResult<std::sync::MutexGuard<'_, Option<PendingOrder>>> {
        self.slot
            .lock()
            .map_err(|_| ClientError::Storage("pending order lock poisoned".into()))
    }
}

#[async_trait]
impl PendingOrderStore for MemoryPendingOrderStore {
    async fn save(&self, pending: &PendingOrder) -> ClientResult<()> {
        *self.slot()? = Some(pending.clone());
        Ok(())
    }

    async fn load(&self) -> ClientResult<Option<PendingOrder>> {
        Ok(self.slot()?.clone())
    }

    async fn clear(&self) -> ClientResult<()> {
        self.slot()?.take();
        Ok(())
    }
}

// =============================================================================
// File Store
// =============================================================================

/// JSON file store. Writes go to a sibling temp file that is renamed over
/// the target, so a crash never leaves a half-written marker.
#[derive(Debug, Clone)]
pub struct FilePendingOrderStore {
    path: PathBuf,
}

impl FilePendingOrderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FilePendingOrderStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl PendingOrderStore for FilePendingOrderStore {
    async fn save(&self, pending: &PendingOrder) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(pending)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        debug!(path = ?self.path, order = %pending.order.id, "Pending order recorded");
        Ok(())
    }

    async fn load(&self) -> ClientResult<Option<PendingOrder>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            warn!(path = ?self.path, error = %e, "Pending order file is corrupt");
            ClientError::Storage(format!("corrupt pending order file: {}", e))
        })
    }

    async fn clear(&self) -> ClientResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
