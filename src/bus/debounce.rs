//! Burst coalescing for backend change notifications.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Runs `action` once per burst of triggers, after a quiet period with no new
/// trigger. Each trigger resets the window; it never stacks. The timer lives
/// in a single background task owned by the debouncer, and dropping the
/// debouncer stops it without firing again.
pub struct Debouncer {
    tx: mpsc::UnboundedSender<()>,
    task: JoinHandle<()>,
}

impl Debouncer {
    pub fn new(quiet: Duration, action: impl Fn() + Send + Sync + 'static) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        let task = tokio::spawn(async move {
            'idle: while rx.recv().await.is_some() {
                loop {
                    let sleep = time::sleep(quiet);
                    tokio::pin!(sleep);
                    tokio::select! {
                        more = rx.recv() => {
                            if more.is_none() {
                                break 'idle;
                            }
                            // New trigger: restart the quiet window.
                        }
                        _ = &mut sleep => {
                            action();
                            break;
                        }
                    }
                }
            }
        });
        Self { tx, task }
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// A cloneable trigger that can outlive borrows of the debouncer, e.g.
    /// inside bus handlers.
    pub fn handle(&self) -> DebounceHandle {
        DebounceHandle {
            tx: self.tx.clone(),
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[derive(Clone)]
pub struct DebounceHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl DebounceHandle {
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}
