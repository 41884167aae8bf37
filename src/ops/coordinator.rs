//! The operation coordinator.
//!
//! `start` issues a uniquely-identified request to the backend and races its
//! settlement against a sliding heartbeat window and external cancellation.
//! The state machine is Armed -> Running -> {Completed | TimedOut |
//! Cancelled}: a spawned task selects over the request future, inbound
//! heartbeats for this operation's id, the timeout timer, and the cancel
//! signal. Every exit path clears the timer, unsubscribes the heartbeat
//! listener, and removes the registry entry exactly once.
//!
//! Heartbeats exist for the partial-failure case where the backend silently
//! stalls or the process boundary is severed; without them a caller could
//! wait forever on a request that will never settle. The window slides
//! (reset on every heartbeat) rather than acting as a deadline, so an
//! operation may run unbounded as long as the backend keeps signalling
//! progress.

use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};
use tokio::time;

use crate::bus::event_types::CHANNEL_HEARTBEAT;
use crate::bus::EventBus;
use crate::driver::DriverError;
use crate::store::{OperationEntry, PendingOperations};

use super::{CancelHandle, OperationError, OperationId};

/// Outward face of one started operation: an awaitable outcome plus an
/// idempotent cancel handle.
pub struct OperationHandle<T> {
    id: OperationId,
    outcome: oneshot::Receiver<Result<T, OperationError>>,
    cancel: CancelHandle,
}

impl<T> OperationHandle<T> {
    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Cancel handle that can be stored or passed around independently of
    /// the outcome.
    pub fn canceller(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Wait for the operation to settle. Exactly one settlement occurs per
    /// operation; if the coordinator task is torn down with the runtime
    /// before settling, that counts as cancellation.
    pub async fn wait(self) -> Result<T, OperationError> {
        match self.outcome.await {
            Ok(outcome) => outcome,
            Err(_) => Err(OperationError::Cancelled { id: self.id }),
        }
    }
}

/// Start a cancellable operation with heartbeat-based liveness tracking.
///
/// `request` receives the freshly minted operation id (the backend uses it to
/// tag heartbeats and correlate internal progress) and returns the future for
/// the actual backend call. The request runs on its own task: if the
/// operation is cancelled or times out, the underlying call is left to settle
/// on its own and its late outcome is discarded.
pub fn start<T, F>(
    bus: &EventBus,
    registry: &PendingOperations,
    heartbeat_window: Duration,
    request: F,
) -> OperationHandle<T>
where
    T: Send + 'static,
    F: FnOnce(OperationId) -> BoxFuture<'static, Result<T, DriverError>>,
{
    let id = OperationId::mint();
    let (cancel, mut cancel_rx) = CancelHandle::new(id, bus.clone());
    registry.insert(OperationEntry {
        id,
        cancel: cancel.clone(),
    });

    // The handler pushes matching heartbeats to the coordinator task. The
    // task keeps one sender alive so the channel cannot close under the
    // select loop.
    let (hb_tx, mut hb_rx) = mpsc::unbounded_channel::<()>();
    let hb_keepalive = hb_tx.clone();
    let id_str = id.to_string();
    let heartbeat_sub = bus.subscribe(CHANNEL_HEARTBEAT, move |payload| {
        if payload.as_str() == Some(id_str.as_str()) {
            let _ = hb_tx.send(());
        }
    });

    tracing::debug!("starting operation {id}");
    let (done_tx, done_rx) = oneshot::channel();
    let mut request_task = tokio::spawn(request(id));
    let registry = registry.clone();
    let task_cancel = cancel.clone();
    tokio::spawn(async move {
        let _keepalive = hb_keepalive;
        let sleep = time::sleep(heartbeat_window);
        tokio::pin!(sleep);

        let outcome: Result<T, OperationError> = loop {
            tokio::select! {
                joined = &mut request_task => {
                    if task_cancel.is_cancelled() {
                        // Settled after cancellation: suppress the outcome.
                        break Err(OperationError::Cancelled { id });
                    }
                    break match joined {
                        Ok(Ok(value)) => Ok(value),
                        Ok(Err(err)) => Err(OperationError::Backend(err)),
                        Err(join_err) => Err(OperationError::Backend(DriverError::Transport(
                            format!("request task failed: {join_err}"),
                        ))),
                    };
                }
                _ = hb_rx.recv() => {
                    sleep.as_mut().reset(time::Instant::now() + heartbeat_window);
                }
                _ = cancel_rx.changed() => {
                    break Err(OperationError::Cancelled { id });
                }
                _ = &mut sleep => {
                    tracing::warn!("operation {id} timed out waiting for a heartbeat");
                    task_cancel.cancel();
                    break Err(OperationError::TimedOut { id });
                }
            }
        };

        heartbeat_sub.unsubscribe();
        registry.discard(id);
        match &outcome {
            Ok(_) => tracing::debug!("operation {id} completed"),
            Err(err) => tracing::debug!("operation {id} settled with error: {err}"),
        }
        let _ = done_tx.send(outcome);
    });

    OperationHandle {
        id,
        outcome: done_rx,
        cancel,
    }
}
