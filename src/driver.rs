//! Request/response surface toward the backend process.
//!
//! Anything long-running takes a caller-minted [`OperationId`] as its first
//! argument; the backend uses it to tag heartbeats and to honor cancellation
//! requests arriving on the bus. The list calls are plain RPCs whose results
//! are mirrored into snapshot stores.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{OperationRecord, Package, Project};
use crate::ops::OperationId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    /// The backend refused or failed the request.
    #[error("backend rejected request: {0}")]
    Rejected(String),
    /// The process boundary itself failed.
    #[error("backend transport failure: {0}")]
    Transport(String),
}

#[async_trait]
pub trait BackendDriver: Send + Sync {
    async fn install_package(
        &self,
        op: OperationId,
        package_id: Uuid,
    ) -> Result<Value, DriverError>;

    async fn create_project(&self, op: OperationId, name: String) -> Result<Uuid, DriverError>;

    async fn render_project(
        &self,
        op: OperationId,
        project_id: Uuid,
    ) -> Result<Value, DriverError>;

    async fn list_projects(&self) -> Result<Vec<Project>, DriverError>;

    async fn list_packages(&self) -> Result<Vec<Package>, DriverError>;

    async fn list_operations(&self) -> Result<Vec<OperationRecord>, DriverError>;
}
