//! Simulated backend process driving the shared bus the way the real one
//! would: heartbeats while work is in flight, and a listener on the cancel
//! channel recording what the UI asked to stop.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time;
use uuid::Uuid;

use atelier_bridge::bus::event_types::{CHANNEL_HEARTBEAT, CHANNEL_OPERATION_CANCEL};
use atelier_bridge::bus::{BusSubscription, EventBus};
use atelier_bridge::domain::{OperationRecord, Package, PackageState, Project};
use atelier_bridge::driver::{BackendDriver, DriverError};
use atelier_bridge::ops::OperationId;

pub struct MockBackend {
    bus: EventBus,
    /// Simulated duration of each long-running call.
    work: Duration,
    /// `None` simulates a stalled backend that never signals progress.
    heartbeat_every: Option<Duration>,
    cancelled: Arc<Mutex<Vec<String>>>,
    _cancel_sub: BusSubscription,
}

impl MockBackend {
    pub fn new(bus: EventBus, work: Duration, heartbeat_every: Option<Duration>) -> Self {
        let cancelled = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&cancelled);
        let cancel_sub = bus.subscribe(CHANNEL_OPERATION_CANCEL, move |payload: &Value| {
            if let Some(raw) = payload.as_str() {
                sink.lock().unwrap().push(raw.to_string());
            }
        });
        Self {
            bus,
            work,
            heartbeat_every,
            cancelled,
            _cancel_sub: cancel_sub,
        }
    }

    pub fn cancelled_ids(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }

    async fn run_long_call(&self, op: OperationId) -> Result<(), DriverError> {
        match self.heartbeat_every {
            Some(every) => {
                let bus = self.bus.clone();
                let pump = tokio::spawn(async move {
                    loop {
                        time::sleep(every).await;
                        bus.emit(CHANNEL_HEARTBEAT, json!(op.to_string()));
                    }
                });
                time::sleep(self.work).await;
                pump.abort();
                Ok(())
            }
            None => futures::future::pending().await,
        }
    }
}

#[async_trait]
impl BackendDriver for MockBackend {
    async fn install_package(
        &self,
        op: OperationId,
        package_id: Uuid,
    ) -> Result<Value, DriverError> {
        self.run_long_call(op).await?;
        Ok(json!({ "installed": package_id.to_string() }))
    }

    async fn create_project(&self, op: OperationId, _name: String) -> Result<Uuid, DriverError> {
        self.run_long_call(op).await?;
        Ok(Uuid::new_v4())
    }

    async fn render_project(
        &self,
        op: OperationId,
        project_id: Uuid,
    ) -> Result<Value, DriverError> {
        self.run_long_call(op).await?;
        Ok(json!({ "rendered": project_id.to_string() }))
    }

    async fn list_projects(&self) -> Result<Vec<Project>, DriverError> {
        Ok(vec![Project {
            id: Uuid::from_u128(1),
            name: "default scene".to_string(),
            path: Some("/projects/default".to_string()),
            updated_at: None,
        }])
    }

    async fn list_packages(&self) -> Result<Vec<Package>, DriverError> {
        Ok(vec![Package {
            id: Uuid::from_u128(2),
            name: "sculpt-tools".to_string(),
            reference: "registry/sculpt-tools/1.2.0".to_string(),
            state: PackageState::Available,
            verified: true,
            updated_at: None,
        }])
    }

    async fn list_operations(&self) -> Result<Vec<OperationRecord>, DriverError> {
        Ok(vec![OperationRecord {
            id: Uuid::from_u128(3),
            completed: false,
            error_msg: None,
        }])
    }
}
