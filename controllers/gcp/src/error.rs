//! Controller-specific error types.
//!
//! Errors raised by the lifecycle itself live in `managed::ManagedError`;
//! this type adds the Kubernetes writes and startup failures around it.

use crate::managed::{ManagedError, StoreError};
use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur in the GCP Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Lifecycle error against the external resource
    #[error(transparent)]
    Managed(#[from] ManagedError),

    /// Connection details could not be written to the Secret
    #[error("cannot publish connection details: {0}")]
    Publish(#[from] StoreError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}
