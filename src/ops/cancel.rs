//! Idempotent cancellation handle shared by the coordinator, the returned
//! operation handle, and the in-flight registry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;

use crate::bus::event_types::CHANNEL_OPERATION_CANCEL;
use crate::bus::EventBus;

use super::OperationId;

struct CancelInner {
    id: OperationId,
    bus: EventBus,
    cancelled: AtomicBool,
    signal: watch::Sender<bool>,
}

/// Requesting cancellation emits one best-effort cancel event toward the
/// backend and wakes the coordinator. Invoking it again, or after the
/// operation already settled, has no observable effect.
#[derive(Clone)]
pub struct CancelHandle {
    inner: Arc<CancelInner>,
}

impl CancelHandle {
    pub(crate) fn new(id: OperationId, bus: EventBus) -> (Self, watch::Receiver<bool>) {
        let (signal, receiver) = watch::channel(false);
        (
            Self {
                inner: Arc::new(CancelInner {
                    id,
                    bus,
                    cancelled: AtomicBool::new(false),
                    signal,
                }),
            },
            receiver,
        )
    }

    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::debug!("cancelling operation {}", self.inner.id);
        self.inner
            .bus
            .emit(CHANNEL_OPERATION_CANCEL, Value::String(self.inner.id.to_string()));
        let _ = self.inner.signal.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    pub fn id(&self) -> OperationId {
        self.inner.id
    }
}
