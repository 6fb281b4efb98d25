//! GCP API traits for mocking
//!
//! These traits abstract the GcpClient so controllers can be unit tested.
//! The concrete GcpClient implements both, and `MockGcpClient` provides an
//! in-memory implementation behind the `test-util` feature.

use crate::error::GcpError;
use crate::models::*;

/// Cloud SQL Admin operations scoped to one project
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait SqlAdminApi: Send + Sync {
    /// Project the client operates in
    fn project_id(&self) -> &str;

    async fn get_instance(&self, name: &str) -> Result<DatabaseInstance, GcpError>;
    async fn insert_instance(&self, instance: &DatabaseInstance) -> Result<Operation, GcpError>;
    async fn patch_instance(&self, name: &str, instance: &DatabaseInstance) -> Result<Operation, GcpError>;
    async fn delete_instance(&self, name: &str) -> Result<Operation, GcpError>;

    async fn list_users(&self, instance: &str) -> Result<Vec<User>, GcpError>;
    /// Update a user identified by name and host
    async fn update_user(&self, instance: &str, name: &str, host: &str, user: &User) -> Result<Operation, GcpError>;
}

/// Compute Engine network operations scoped to one project
#[async_trait::async_trait]
pub trait ComputeApi: Send + Sync {
    /// Project the client operates in
    fn project_id(&self) -> &str;

    async fn get_network(&self, name: &str) -> Result<Network, GcpError>;
    async fn insert_network(&self, network: &Network) -> Result<Operation, GcpError>;
    async fn patch_network(&self, name: &str, network: &Network) -> Result<Operation, GcpError>;
    async fn delete_network(&self, name: &str) -> Result<Operation, GcpError>;
}
