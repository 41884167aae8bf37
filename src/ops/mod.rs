//! Long-running operation coordination.
//!
//! An operation is a single backend request tracked end-to-end by a unique
//! identifier. The coordinator issues the request, watches backend liveness
//! through per-operation heartbeats, and supports idempotent cancellation
//! from the returned handle, from the in-flight registry, or from the
//! heartbeat timeout itself.

mod cancel;
mod coordinator;

pub use cancel::CancelHandle;
pub use coordinator::{start, OperationHandle};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::driver::DriverError;

/// Correlation token for one in-flight operation. Unique among concurrently
/// active operations; minted client-side so the backend can tag heartbeats
/// and internal progress with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(Uuid);

impl OperationId {
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for OperationId {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self(raw.parse()?))
    }
}

/// Every operation settles with exactly one of these outcomes (or a value).
#[derive(Debug, Clone, thiserror::Error)]
pub enum OperationError {
    /// No heartbeat arrived within the configured window.
    #[error("operation timed out: {id}")]
    TimedOut { id: OperationId },
    /// Cancelled by the caller or the registry before the backend settled.
    #[error("operation cancelled: {id}")]
    Cancelled { id: OperationId },
    /// The backend rejected the request; passed through after local cleanup.
    #[error(transparent)]
    Backend(#[from] DriverError),
}

impl OperationError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, OperationError::TimedOut { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, OperationError::Cancelled { .. })
    }
}
