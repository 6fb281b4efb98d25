//! Network Custom Resource Definition
//!
//! Declares a Compute Engine VPC network.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::conditions::ConditionedStatus;
use crate::database::ReclaimPolicy;
use crate::references::{LocalSecretReference, ProviderReference};

/// NetworkSpec defines the desired state of a VPC network
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "compute.gcp.crossplane.io",
    version = "v1alpha2",
    kind = "Network",
    namespaced,
    status = "NetworkStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
    /// Desired configuration of the network
    pub for_provider: NetworkParameters,

    /// Provider holding project and credentials
    pub provider_ref: ProviderReference,

    /// Secret that receives connection details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_connection_secret_to_ref: Option<LocalSecretReference>,

    /// What to do with the network when this resource is deleted
    #[serde(default)]
    pub reclaim_policy: ReclaimPolicy,
}

/// User-configurable parameters of a VPC network
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkParameters {
    /// Name of the network in GCP, also used as its identity
    pub name: String,

    /// Description of the network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Create one subnetwork per region automatically (auto mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_create_subnetworks: Option<bool>,

    /// Legacy network range, mutually exclusive with subnet mode
    #[serde(default, rename = "IPv4Range", skip_serializing_if = "Option::is_none")]
    pub ipv4_range: Option<String>,

    /// Network-wide routing configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_config: Option<NetworkRoutingConfig>,
}

/// Routing configuration of a network
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRoutingConfig {
    /// REGIONAL or GLOBAL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_mode: Option<String>,
}

/// NetworkStatus defines the observed state of a VPC network
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    /// Ready and Synced conditions
    #[serde(flatten)]
    pub conditioned_status: ConditionedStatus,

    /// Last state reported by the Compute API
    #[serde(default)]
    pub at_provider: NetworkObservation,
}

/// Observed state of a VPC network
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkObservation {
    /// Server-assigned numeric ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// RFC 3339 creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,

    /// Gateway address of legacy networks
    #[serde(default, rename = "gatewayIPv4", skip_serializing_if = "Option::is_none")]
    pub gateway_ipv4: Option<String>,

    /// URI of the network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,

    /// URIs of the network's subnetworks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subnetworks: Vec<String>,

    /// Peerings of the network
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peerings: Vec<NetworkPeering>,
}

/// A peering between two networks
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPeering {
    /// Name of the peering
    pub name: String,

    /// URI of the peer network
    pub network: String,

    /// ACTIVE or INACTIVE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Details about the current state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_details: Option<String>,

    /// Whether routes are exchanged automatically
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_create_routes: Option<bool>,

    /// Whether subnet routes are exchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_subnet_routes: Option<bool>,
}
