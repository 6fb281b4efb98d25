//! Lifecycle contract between the driver and a resource kind.

use crate::managed::connection::ConnectionDetails;
use crate::managed::context::ReconcileContext;
use crate::managed::error::ManagedError;

/// Result of observing an external resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalObservation {
    /// The resource exists in GCP
    pub resource_exists: bool,
    /// No update is needed before the next observation
    pub resource_up_to_date: bool,
    /// Details to publish into the connection secret
    pub connection_details: ConnectionDetails,
    /// The record's spec was filled from observed state and must be persisted
    pub spec_late_initialized: bool,
}

impl ExternalObservation {
    /// Observation of a resource that does not exist
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Result of creating an external resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalCreation {
    pub connection_details: ConnectionDetails,
}

/// Result of updating an external resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalUpdate {
    pub connection_details: ConnectionDetails,
}

/// A failed update, carrying any credentials it changed before failing.
///
/// The driver publishes `connection_details` before reporting `error`, so a
/// password pushed to the resource is never lost to a later failing step.
#[derive(Debug)]
pub struct UpdateFailure {
    pub connection_details: ConnectionDetails,
    pub error: ManagedError,
}

impl UpdateFailure {
    /// Failure after `connection_details` were applied to the resource
    pub fn with_details(error: ManagedError, connection_details: ConnectionDetails) -> Self {
        Self {
            connection_details,
            error,
        }
    }
}

impl From<ManagedError> for UpdateFailure {
    fn from(error: ManagedError) -> Self {
        Self::with_details(error, ConnectionDetails::new())
    }
}

/// Observe, create, update and delete one external resource.
///
/// Implementations hold only the bound API handle, so one client can serve
/// one reconcile without locking.
#[async_trait::async_trait]
pub trait ExternalClient<R: Send + Sync>: Send + Sync {
    /// Fetch the resource, copy observed state into `record.status` and
    /// late-initialize `record.spec`
    async fn observe(&self, ctx: &ReconcileContext, record: &mut R) -> Result<ExternalObservation, ManagedError>;

    /// Create the resource; "already exists" is success
    async fn create(&self, ctx: &ReconcileContext, record: &R) -> Result<ExternalCreation, ManagedError>;

    /// Bring the resource in line with `record.spec`
    async fn update(&self, ctx: &ReconcileContext, record: &R) -> Result<ExternalUpdate, UpdateFailure>;

    /// Delete the resource; "not found" is success
    async fn delete(&self, ctx: &ReconcileContext, record: &R) -> Result<(), ManagedError>;
}

/// Produces an [`ExternalClient`] bound to the record's provider
#[async_trait::async_trait]
pub trait Connector<R: Send + Sync>: Send + Sync {
    async fn connect(&self, ctx: &ReconcileContext, record: &R) -> Result<Box<dyn ExternalClient<R>>, ManagedError>;
}
