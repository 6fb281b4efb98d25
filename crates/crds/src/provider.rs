//! Provider Custom Resource Definition
//!
//! A Provider names the GCP project that managed resources are created in and
//! the Secret holding the service-account credentials used to reach it.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::references::SecretKeySelector;

/// ProviderSpec configures access to one GCP project
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "gcp.crossplane.io",
    version = "v1alpha2",
    kind = "Provider",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSpec {
    /// GCP project ID that managed resources belong to
    #[serde(rename = "projectID")]
    pub project_id: String,

    /// Secret key holding the service-account credentials JSON.
    /// The Secret lives in the same namespace as the Provider.
    pub credentials_secret_ref: SecretKeySelector,
}
