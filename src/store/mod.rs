//! Reactive state containers mirrored from backend events.
//!
//! Everything here is built on the same primitive:
//! - `Store<T>`: a mutable value with synchronous, ordered observer
//!   notification on every mutation
//! - `LogStore`: bounded FIFO of backend log events
//! - `SelectionStore`: ordered list of currently open project ids
//! - `SnapshotStore<T>`: verbatim mirror of backend-owned record lists
//! - `PendingOperations`: registry of in-flight cancellable operations

mod logs;
mod pending;
mod reactive;
mod selection;
mod snapshot;

pub use logs::{LogStore, DEFAULT_LOG_CAPACITY};
pub use pending::{OperationEntry, PendingOperations};
pub use reactive::{Store, StoreSubscription};
pub use selection::SelectionStore;
pub use snapshot::SnapshotStore;
