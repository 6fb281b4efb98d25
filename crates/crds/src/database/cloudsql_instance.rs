//! CloudsqlInstance Custom Resource Definition
//!
//! Declares a Cloud SQL database instance. `spec.forProvider` mirrors the
//! subset of the Cloud SQL Admin `DatabaseInstance` resource that users may
//! configure; `status.atProvider` carries what the API last reported.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::conditions::ConditionedStatus;
use crate::references::{LocalSecretReference, ProviderReference};

/// Instance is serving and accepting connections
pub const STATE_RUNNABLE: &str = "RUNNABLE";
/// Instance is being created
pub const STATE_CREATING: &str = "PENDING_CREATE";
/// Instance creation failed
pub const STATE_CREATION_FAILED: &str = "FAILED";
/// Instance is suspended, usually for billing reasons
pub const STATE_SUSPENDED: &str = "SUSPENDED";
/// Instance is down for maintenance
pub const STATE_MAINTENANCE: &str = "MAINTENANCE";
/// Instance state is unknown
pub const STATE_UNKNOWN: &str = "UNKNOWN_STATE";

/// Connection secret key holding the private IP address
pub const PRIVATE_IP_KEY: &str = "privateIP";
/// Connection secret key holding the public IP address
pub const PUBLIC_IP_KEY: &str = "publicIP";

/// IP mapping type of a private (VPC peered) address
pub const PRIVATE_IP_TYPE: &str = "PRIVATE";
/// IP mapping type of a public address
pub const PUBLIC_IP_TYPE: &str = "PRIMARY";

/// Database version prefix of PostgreSQL engines
pub const POSTGRESQL_DB_VERSION_PREFIX: &str = "POSTGRES";
/// Root user of MySQL instances
pub const MYSQL_DEFAULT_USER: &str = "root";
/// Root user of PostgreSQL instances
pub const POSTGRESQL_DEFAULT_USER: &str = "postgres";

/// Minimum length of a generated root password
pub const PASSWORD_LENGTH: usize = 20;

/// What happens to the external resource when the managed resource is deleted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub enum ReclaimPolicy {
    /// Delete the external resource
    #[default]
    Delete,
    /// Leave the external resource in place
    Retain,
}

/// CloudsqlInstanceSpec defines the desired state of a Cloud SQL instance
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[kube(
    group = "database.gcp.crossplane.io",
    version = "v1alpha2",
    kind = "CloudsqlInstance",
    namespaced,
    status = "CloudsqlInstanceStatus",
    printcolumn = r#"{"name":"STATE","type":"string","jsonPath":".status.atProvider.state"}"#,
    printcolumn = r#"{"name":"VERSION","type":"string","jsonPath":".spec.forProvider.databaseVersion"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct CloudsqlInstanceSpec {
    /// Desired configuration of the instance
    pub for_provider: CloudsqlInstanceParameters,

    /// Provider holding project and credentials
    pub provider_ref: ProviderReference,

    /// Secret that receives connection details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_connection_secret_to_ref: Option<LocalSecretReference>,

    /// What to do with the instance when this resource is deleted
    #[serde(default)]
    pub reclaim_policy: ReclaimPolicy,
}

/// User-configurable parameters of a Cloud SQL instance
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CloudsqlInstanceParameters {
    /// Region the instance lives in (e.g., "us-central1")
    pub region: String,

    /// Settings of the instance
    pub settings: Settings,

    /// Database engine and version (e.g., "MYSQL_5_7", "POSTGRES_9_6")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_version: Option<String>,

    /// Name of the instance this one replicates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_instance_name: Option<String>,

    /// Compute Engine zone the instance is currently serving from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gce_zone: Option<String>,

    /// CLOUD_SQL_INSTANCE, ON_PREMISES_INSTANCE or READ_REPLICA_INSTANCE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
}

/// Settings of a Cloud SQL instance
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Machine tier (e.g., "db-n1-standard-1")
    pub tier: String,

    /// ALWAYS, NEVER or ON_DEMAND
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_policy: Option<String>,

    /// App Engine app IDs that can access this instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized_gae_applications: Option<Vec<String>>,

    /// ZONAL or REGIONAL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_type: Option<String>,

    /// Whether binary log and InnoDB flush settings are crash safe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crash_safe_replication_enabled: Option<bool>,

    /// Whether storage grows automatically
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_auto_resize: Option<bool>,

    /// PD_SSD or PD_HDD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_disk_type: Option<String>,

    /// PER_USE or PACKAGE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_plan: Option<String>,

    /// SYNCHRONOUS or ASYNCHRONOUS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_type: Option<String>,

    /// User labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_labels: Option<BTreeMap<String, String>>,

    /// Database flags passed at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_flags: Option<Vec<DatabaseFlags>>,

    /// Backup configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_configuration: Option<BackupConfiguration>,

    /// IP management settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_configuration: Option<IpConfiguration>,

    /// Preferred location of the instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_preference: Option<LocationPreference>,

    /// Preferred maintenance window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_window: Option<MaintenanceWindow>,

    /// Size of the data disk in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_disk_size_gb: Option<i64>,

    /// Upper bound in GB for automatic storage growth, 0 means unlimited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_auto_resize_limit: Option<i64>,
}

/// A database flag
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseFlags {
    /// Flag name (e.g., "max_connections")
    pub name: String,

    /// Flag value, omitted for boolean flags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Backup settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BackupConfiguration {
    /// Whether backups are enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Whether MySQL binary logging is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_log_enabled: Option<bool>,

    /// Start time of the daily backup window, "HH:MM" in UTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    /// Location of the backups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// IP management settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IpConfiguration {
    /// Whether the instance gets a public IP address
    #[serde(default, rename = "ipv4Enabled", skip_serializing_if = "Option::is_none")]
    pub ipv4_enabled: Option<bool>,

    /// Self link of the VPC network the instance is peered with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_network: Option<String>,

    /// Whether SSL connections are required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_ssl: Option<bool>,

    /// Networks allowed to connect over the public IP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized_networks: Option<Vec<AclEntry>>,
}

/// An authorized network
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AclEntry {
    /// Label of the entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// CIDR or address allowed to connect
    pub value: String,

    /// RFC 3339 expiry of the entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,
}

/// Preferred location of an instance
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocationPreference {
    /// Preferred Compute Engine zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,

    /// App Engine application to follow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_gae_application: Option<String>,
}

/// Preferred maintenance window
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindow {
    /// Day of week, 1-7 starting on Monday
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<i64>,

    /// Hour of day, 0-23
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<i64>,

    /// canary or stable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_track: Option<String>,
}

/// CloudsqlInstanceStatus defines the observed state of a Cloud SQL instance
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CloudsqlInstanceStatus {
    /// Ready and Synced conditions
    #[serde(flatten)]
    pub conditioned_status: ConditionedStatus,

    /// Last state reported by the Cloud SQL Admin API
    #[serde(default)]
    pub at_provider: CloudsqlInstanceObservation,
}

/// Observed state of a Cloud SQL instance
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CloudsqlInstanceObservation {
    /// Serving state (RUNNABLE, PENDING_CREATE, ...)
    #[serde(default)]
    pub state: String,

    /// FIRST_GEN, SECOND_GEN or EXTERNAL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_type: Option<String>,

    /// Connection name used by the Cloud SQL proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_name: Option<String>,

    /// Current disk usage in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_disk_size: Option<i64>,

    /// Zone the instance is serving from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gce_zone: Option<String>,

    /// Assigned IP addresses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_addresses: Vec<IpMapping>,

    /// Assigned IPv6 address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_address: Option<String>,

    /// Project the instance belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// URI of the instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,

    /// Service account used by the instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_email_address: Option<String>,

    /// Version of the settings, required for updates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_version: Option<i64>,
}

/// An IP address assigned to an instance
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IpMapping {
    /// The address
    pub ip_address: String,

    /// PRIMARY, OUTGOING or PRIVATE
    #[serde(rename = "type")]
    pub ip_type: String,

    /// RFC 3339 time the address is scheduled for retirement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_retire: Option<String>,
}

impl CloudsqlInstance {
    /// Name of the root user the controller manages credentials for.
    ///
    /// PostgreSQL instances use `postgres`, everything else `root`.
    pub fn database_user_name(&self) -> &'static str {
        match &self.spec.for_provider.database_version {
            Some(v) if v.starts_with(POSTGRESQL_DB_VERSION_PREFIX) => POSTGRESQL_DEFAULT_USER,
            _ => MYSQL_DEFAULT_USER,
        }
    }
}
