//! Errors reported by the managed-resource lifecycle.
//!
//! Each variant carries a stable prefix naming the phase that failed. "Not
//! found" on delete and "already exists" on create never reach this type;
//! the external clients absorb them.

use crate::managed::store::StoreError;
use gcp_client::GcpError;
use thiserror::Error;

/// Errors that can occur while connecting to or operating on an external resource.
#[derive(Debug, Error)]
pub enum ManagedError {
    /// The referenced Provider could not be read
    #[error("cannot get provider: {0}")]
    ProviderNotFound(#[source] StoreError),

    /// The Provider's credentials secret or key could not be read
    #[error("cannot get provider credentials secret: {0}")]
    CredentialNotFound(#[source] StoreError),

    /// Credentials were malformed or the API client could not be built
    #[error("cannot create new provider client: {0}")]
    ClientInit(#[source] GcpError),

    /// The resource kind requires a name in its spec
    #[error("name not given")]
    NameNotGiven,

    /// Fetching the external resource failed
    #[error("cannot observe external resource: {0}")]
    Observe(#[source] GcpError),

    /// Creating the external resource failed
    #[error("cannot create external resource: {0}")]
    Create(#[source] GcpError),

    /// Patching the external resource failed
    #[error("cannot update external resource: {0}")]
    Patch(#[source] GcpError),

    /// Deleting the external resource failed
    #[error("cannot delete external resource: {0}")]
    Delete(#[source] GcpError),

    /// Connection details could not be assembled
    #[error("cannot get connection details: {0}")]
    Connection(#[source] StoreError),

    /// The root user does not exist on the instance
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Rotating the root user's password failed
    #[error("cannot update root user credentials: {0}")]
    CredentialUpdate(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The reconcile was cancelled before the call completed
    #[error("operation cancelled")]
    Cancelled,
}
