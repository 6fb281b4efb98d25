//! Test utilities for unit testing reconcilers
//!
//! This module provides fixtures for records, providers and API objects, and
//! a client factory handing out a shared `MockGcpClient`.

use crate::managed::{ClientFactory, InMemoryStore};
use crds::*;
use gcp_client::{ComputeApi, Credentials, GcpError, MockGcpClient, SqlAdminApi};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::sync::Arc;

pub const TEST_PROJECT: &str = "test-project";
pub const TEST_TOKEN: &str = "test-token";
pub const TEST_PROVIDER: &str = "gcp-provider";
pub const TEST_CREDENTIALS_SECRET: &str = "gcp-credentials";
pub const TEST_CREDENTIALS_KEY: &str = "credentials.json";
pub const TEST_CONNECTION_SECRET: &str = "db-conn";
pub const TEST_REGION: &str = "us-central1";
pub const TEST_TIER: &str = "db-n1-standard-1";

/// Helper to create a test Provider
pub fn create_test_provider(name: &str) -> Provider {
    Provider::new(
        name,
        ProviderSpec {
            project_id: TEST_PROJECT.to_string(),
            credentials_secret_ref: SecretKeySelector {
                name: TEST_CREDENTIALS_SECRET.to_string(),
                key: TEST_CREDENTIALS_KEY.to_string(),
            },
        },
    )
}

/// Add the test Provider and its credentials secret to `store`
pub fn seed_provider(store: &InMemoryStore, namespace: &str) {
    store.add_provider(namespace, create_test_provider(TEST_PROVIDER));
    let credentials = format!(r#"{{"access_token":"{}"}}"#, TEST_TOKEN);
    store.add_secret(
        namespace,
        TEST_CREDENTIALS_SECRET,
        &[(TEST_CREDENTIALS_KEY, credentials.as_bytes())],
    );
}

fn test_meta(name: &str, namespace: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        uid: Some(format!("uid-{}", name)),
        ..Default::default()
    }
}

/// Helper to create a test CloudsqlInstance (MySQL, connection secret set)
pub fn create_test_cloudsql_instance(name: &str, namespace: &str) -> CloudsqlInstance {
    CloudsqlInstance {
        metadata: test_meta(name, namespace),
        spec: CloudsqlInstanceSpec {
            for_provider: CloudsqlInstanceParameters {
                region: TEST_REGION.to_string(),
                settings: Settings {
                    tier: TEST_TIER.to_string(),
                    ..Default::default()
                },
                database_version: Some("MYSQL_5_7".to_string()),
                ..Default::default()
            },
            provider_ref: ProviderReference::new(TEST_PROVIDER),
            write_connection_secret_to_ref: Some(LocalSecretReference {
                name: TEST_CONNECTION_SECRET.to_string(),
            }),
            reclaim_policy: ReclaimPolicy::Delete,
        },
        status: None,
    }
}

/// Helper to create a test Network
pub fn create_test_network(name: &str, namespace: &str, network_name: &str) -> Network {
    Network {
        metadata: test_meta(name, namespace),
        spec: NetworkSpec {
            for_provider: NetworkParameters {
                name: network_name.to_string(),
                ..Default::default()
            },
            provider_ref: ProviderReference::new(TEST_PROVIDER),
            write_connection_secret_to_ref: None,
            reclaim_policy: ReclaimPolicy::Delete,
        },
        status: None,
    }
}

/// API instance matching `create_test_cloudsql_instance`, with `addresses`
/// given as (address, type) pairs
pub fn api_instance(name: &str, state: &str, addresses: &[(&str, &str)]) -> gcp_client::DatabaseInstance {
    gcp_client::DatabaseInstance {
        name: name.to_string(),
        project: Some(TEST_PROJECT.to_string()),
        region: Some(TEST_REGION.to_string()),
        database_version: Some("MYSQL_5_7".to_string()),
        state: Some(state.to_string()),
        settings: Some(gcp_client::Settings {
            tier: TEST_TIER.to_string(),
            settings_version: Some(4),
            ..Default::default()
        }),
        ip_addresses: addresses
            .iter()
            .map(|(address, ip_type)| gcp_client::IpMapping {
                ip_address: address.to_string(),
                ip_type: ip_type.to_string(),
                time_to_retire: None,
            })
            .collect(),
        ..Default::default()
    }
}

/// Factory handing out clones of one mock, so tests can inspect its state
#[derive(Clone)]
pub struct MockClientFactory {
    pub mock: MockGcpClient,
}

impl MockClientFactory {
    pub fn new() -> Self {
        Self {
            mock: MockGcpClient::new(TEST_PROJECT),
        }
    }
}

#[async_trait::async_trait]
impl ClientFactory for MockClientFactory {
    async fn sql_admin(&self, project_id: String, _credentials: Credentials) -> Result<Arc<dyn SqlAdminApi>, GcpError> {
        assert_eq!(project_id, TEST_PROJECT);
        Ok(Arc::new(self.mock.clone()))
    }

    async fn compute(&self, project_id: String, _credentials: Credentials) -> Result<Arc<dyn ComputeApi>, GcpError> {
        assert_eq!(project_id, TEST_PROJECT);
        Ok(Arc::new(self.mock.clone()))
    }
}
