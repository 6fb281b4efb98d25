//! GCP API models
//!
//! These models match the JSON representation of the Cloud SQL Admin
//! `v1beta4` and Compute Engine `v1` REST resources. Only the fields the
//! controllers read or write are modelled; 64-bit integers travel as strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use crate::common::int64::{option_i64, option_u64};

// Cloud SQL Admin

/// Cloud SQL instance matching the `DatabaseInstance` resource
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInstance {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_instance_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gce_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    /// Output only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Output only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_type: Option<String>,
    /// Output only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_name: Option<String>,
    /// Output only
    #[serde(default, with = "option_i64", skip_serializing_if = "Option::is_none")]
    pub current_disk_size: Option<i64>,
    /// Output only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_addresses: Vec<IpMapping>,
    /// Output only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_address: Option<String>,
    /// Output only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    /// Output only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_email_address: Option<String>,
}

/// Settings of a Cloud SQL instance
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub tier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized_gae_applications: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crash_safe_replication_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_auto_resize: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_disk_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_labels: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_flags: Option<Vec<DatabaseFlags>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_configuration: Option<BackupConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_configuration: Option<IpConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_preference: Option<LocationPreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_window: Option<MaintenanceWindow>,
    #[serde(default, with = "option_i64", skip_serializing_if = "Option::is_none")]
    pub data_disk_size_gb: Option<i64>,
    #[serde(default, with = "option_i64", skip_serializing_if = "Option::is_none")]
    pub storage_auto_resize_limit: Option<i64>,
    /// Must match the server's value on patch
    #[serde(default, with = "option_i64", skip_serializing_if = "Option::is_none")]
    pub settings_version: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseFlags {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BackupConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_log_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IpConfiguration {
    #[serde(default, rename = "ipv4Enabled", skip_serializing_if = "Option::is_none")]
    pub ipv4_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_ssl: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized_networks: Option<Vec<AclEntry>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AclEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocationPreference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_gae_application: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_track: Option<String>,
}

/// An IP address assigned to an instance
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IpMapping {
    pub ip_address: String,
    #[serde(rename = "type")]
    pub ip_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_retire: Option<String>,
}

/// Database user matching the `User` resource
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

/// Response of `users.list`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersListResponse {
    #[serde(default)]
    pub items: Vec<User>,
}

// Compute

/// VPC network matching the Compute `Network` resource
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_create_subnetworks: Option<bool>,
    #[serde(default, rename = "IPv4Range", skip_serializing_if = "Option::is_none")]
    pub ipv4_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_config: Option<NetworkRoutingConfig>,
    /// Output only
    #[serde(default, with = "option_u64", skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Output only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
    /// Output only
    #[serde(default, rename = "gatewayIPv4", skip_serializing_if = "Option::is_none")]
    pub gateway_ipv4: Option<String>,
    /// Output only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    /// Output only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subnetworks: Vec<String>,
    /// Output only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peerings: Vec<NetworkPeering>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRoutingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_mode: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPeering {
    pub name: String,
    pub network: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_create_routes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_subnet_routes: Option<bool>,
}

// Shared

/// Long-running operation acknowledging a mutation.
///
/// Both APIs return an operation; the fields below are common to the two.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_decodes_string_int64() {
        let instance: DatabaseInstance = serde_json::from_value(serde_json::json!({
            "name": "db",
            "state": "RUNNABLE",
            "currentDiskSize": "1073741824",
            "settings": { "tier": "db-n1-standard-1", "dataDiskSizeGb": "10", "settingsVersion": 3 },
            "ipAddresses": [{ "ipAddress": "1.2.3.4", "type": "PRIMARY" }]
        }))
        .expect("valid instance");

        assert_eq!(instance.current_disk_size, Some(1_073_741_824));
        let settings = instance.settings.expect("settings");
        assert_eq!(settings.data_disk_size_gb, Some(10));
        assert_eq!(settings.settings_version, Some(3));
        assert_eq!(instance.ip_addresses[0].ip_type, "PRIMARY");
    }

    #[test]
    fn test_network_encodes_ipv4_range_key() {
        let network = Network {
            name: "legacy".to_string(),
            ipv4_range: Some("10.0.0.0/16".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&network).expect("serializable");
        assert_eq!(value["IPv4Range"], "10.0.0.0/16");
        assert!(value.get("id").is_none());
    }
}
