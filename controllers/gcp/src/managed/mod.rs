//! Generic managed-resource protocol.
//!
//! A managed resource is a Kubernetes record describing one external GCP
//! resource. Each resource kind supplies a [`Connector`] that resolves provider
//! credentials and returns an [`ExternalClient`] bound to one project. The
//! driver in `reconciler` calls the four lifecycle operations and persists
//! whatever they report.
//!
//! - `context`: cancellation carried through every external call
//! - `connection`: connection detail keys and secret helpers
//! - `error`: error taxonomy shared by all kinds
//! - `external`: lifecycle traits and their results
//! - `provider`: provider/credential resolution and client construction
//! - `resource`: the `ManagedResource` capability trait
//! - `store`: lookup of Providers and Secrets
//! - `compare`: desired-vs-observed comparison used for drift detection

pub mod compare;
pub mod connection;
pub mod context;
pub mod error;
pub mod external;
pub mod provider;
pub mod resource;
pub mod store;

pub use connection::*;
pub use context::ReconcileContext;
pub use error::ManagedError;
pub use external::*;
pub use provider::*;
pub use resource::ManagedResource;
pub use store::*;
