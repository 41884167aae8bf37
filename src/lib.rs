//! Client-side bridge runtime for the Atelier desktop workbench.
//!
//! This is the UI-process half of the command/response and event bridge to
//! the long-running backend. It handles:
//! - Issuing uniquely identified, cancellable long-running operations
//! - Heartbeat-based backend liveness detection with auto-cancellation
//! - Mirroring backend-pushed logs and domain records into reactive stores
//! - Session-scoped listener setup and guaranteed teardown
//!
//! # Architecture
//!
//! - `bus`: named-channel pub/sub shared with the backend, plus debouncing
//! - `store`: reactive store primitive and the domain stores built on it
//! - `ops`: the operation coordinator and in-flight cancellation handles
//! - `driver`: the backend RPC surface (correlation id first argument)
//! - `session`: global listener wiring for one application session
//! - `domain`: backend-owned records mirrored verbatim

pub mod bus;
pub mod config;
pub mod domain;
pub mod driver;
pub mod ops;
pub mod session;
pub mod store;

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use uuid::Uuid;

use bus::EventBus;
use domain::{OperationRecord, Package};
use driver::{BackendDriver, DriverError};
use ops::{OperationHandle, OperationId};
use store::{LogStore, PendingOperations, SelectionStore, SnapshotStore};

pub use config::BridgeConfig;
pub use session::{Session, SessionHooks};

/// Application context owning the bus, the reactive stores, and the
/// in-flight operation registry. Constructed explicitly at session start and
/// injected into consumers; dropped at session end.
pub struct BridgeContext {
    pub config: BridgeConfig,
    pub bus: EventBus,
    pub logs: LogStore,
    pub selection: SelectionStore,
    pub packages: SnapshotStore<Package>,
    pub operations: SnapshotStore<OperationRecord>,
    pub pending: PendingOperations,
}

impl BridgeContext {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            bus: EventBus::new(),
            logs: LogStore::new(config.log_capacity),
            selection: SelectionStore::new(),
            packages: SnapshotStore::new(),
            operations: SnapshotStore::new(),
            pending: PendingOperations::new(),
            config,
        }
    }

    /// Start an arbitrary cancellable backend request through the
    /// coordinator. The request receives the minted operation id.
    pub fn start_operation<T, F>(&self, request: F) -> OperationHandle<T>
    where
        T: Send + 'static,
        F: FnOnce(OperationId) -> BoxFuture<'static, Result<T, DriverError>>,
    {
        ops::start(&self.bus, &self.pending, self.config.heartbeat_window, request)
    }

    pub fn install_package(
        &self,
        driver: Arc<dyn BackendDriver>,
        package_id: Uuid,
    ) -> OperationHandle<Value> {
        self.start_operation(move |op| {
            async move { driver.install_package(op, package_id).await }.boxed()
        })
    }

    pub fn create_project(
        &self,
        driver: Arc<dyn BackendDriver>,
        name: String,
    ) -> OperationHandle<Uuid> {
        self.start_operation(move |op| async move { driver.create_project(op, name).await }.boxed())
    }

    pub fn render_project(
        &self,
        driver: Arc<dyn BackendDriver>,
        project_id: Uuid,
    ) -> OperationHandle<Value> {
        self.start_operation(move |op| {
            async move { driver.render_project(op, project_id).await }.boxed()
        })
    }

    /// Replace the mirrored record lists from the backend's plain RPCs.
    pub async fn refresh_snapshots(&self, driver: &dyn BackendDriver) -> Result<(), DriverError> {
        self.packages.set(driver.list_packages().await?);
        self.operations.set(driver.list_operations().await?);
        Ok(())
    }

    /// Cancel everything still in flight, e.g. on navigation away or app
    /// teardown. Returns how many operations were cancelled.
    pub fn shutdown(&self) -> usize {
        self.pending.cancel_all()
    }
}

impl Default for BridgeContext {
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}

/// Install the global tracing subscriber, honoring `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
