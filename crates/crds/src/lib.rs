//! GCP Stack CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for GCP managed resources.
//!
//! Each managed resource carries a `forProvider` block with the desired
//! configuration and an `atProvider` block with the last observed state.
//! Controllers late-initialize unset `forProvider` fields from `atProvider`
//! but never overwrite a value the user has set.

pub mod compute;
pub mod conditions;
pub mod database;
pub mod provider;
pub mod references;

pub use compute::*;
pub use conditions::*;
pub use database::*;
pub use provider::*;
pub use references::*;

/// Annotation carrying the name of the resource in the external system.
pub const EXTERNAL_NAME_ANNOTATION: &str = "crossplane.io/external-name";
