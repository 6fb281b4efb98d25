//! GCP API client
//!
//! Implements the Cloud SQL Admin and Compute REST operations used by the
//! stack controllers. One client is bound to one project.

use crate::common::HttpClient;
use crate::credentials::Credentials;
use crate::error::GcpError;
use crate::gcp_trait::{ComputeApi, SqlAdminApi};
use crate::models::*;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Cloud SQL Admin API root
pub const SQLADMIN_BASE_URL: &str = "https://sqladmin.googleapis.com/sql/v1beta4";

/// Compute Engine API root
pub const COMPUTE_BASE_URL: &str = "https://compute.googleapis.com/compute/v1";

/// GCP API client bound to a project
#[derive(Debug)]
pub struct GcpClient {
    project_id: String,
    sql: HttpClient,
    compute: HttpClient,
}

impl GcpClient {
    /// Create a client against the public Google endpoints
    ///
    /// # Arguments
    /// * `project_id` - GCP project every call is scoped to
    /// * `credentials` - parsed provider credentials
    pub async fn new(project_id: String, credentials: Credentials) -> Result<Self, GcpError> {
        Self::with_endpoints(
            project_id,
            credentials,
            SQLADMIN_BASE_URL.to_string(),
            COMPUTE_BASE_URL.to_string(),
        )
        .await
    }

    /// Create a client with explicit API roots (emulators, private endpoints)
    pub async fn with_endpoints(
        project_id: String,
        credentials: Credentials,
        sql_base_url: String,
        compute_base_url: String,
    ) -> Result<Self, GcpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(GcpError::Http)?;

        let token = credentials.access_token().await?;
        debug!("Created GCP client for project {}", project_id);

        Ok(Self {
            project_id,
            sql: HttpClient::new(client.clone(), sql_base_url, token.clone()),
            compute: HttpClient::new(client, compute_base_url, token),
        })
    }

    fn instances_path(&self) -> String {
        format!("/projects/{}/instances", urlencoding::encode(&self.project_id))
    }

    fn instance_path(&self, name: &str) -> String {
        format!("{}/{}", self.instances_path(), urlencoding::encode(name))
    }

    fn networks_path(&self) -> String {
        format!("/projects/{}/global/networks", urlencoding::encode(&self.project_id))
    }

    fn network_path(&self, name: &str) -> String {
        format!("{}/{}", self.networks_path(), urlencoding::encode(name))
    }
}

#[async_trait::async_trait]
impl SqlAdminApi for GcpClient {
    fn project_id(&self) -> &str {
        &self.project_id
    }

    async fn get_instance(&self, name: &str) -> Result<DatabaseInstance, GcpError> {
        self.sql.get(&self.instance_path(name)).await
    }

    async fn insert_instance(&self, instance: &DatabaseInstance) -> Result<Operation, GcpError> {
        let body = serde_json::to_value(instance)?;
        self.sql.post(&self.instances_path(), &body).await
    }

    async fn patch_instance(&self, name: &str, instance: &DatabaseInstance) -> Result<Operation, GcpError> {
        let body = serde_json::to_value(instance)?;
        self.sql.patch(&self.instance_path(name), &body).await
    }

    async fn delete_instance(&self, name: &str) -> Result<Operation, GcpError> {
        self.sql.delete(&self.instance_path(name)).await
    }

    async fn list_users(&self, instance: &str) -> Result<Vec<User>, GcpError> {
        let path = format!("{}/users", self.instance_path(instance));
        let response: UsersListResponse = self.sql.get(&path).await?;
        Ok(response.items)
    }

    async fn update_user(&self, instance: &str, name: &str, host: &str, user: &User) -> Result<Operation, GcpError> {
        let query = self.sql.build_query_string(&[("name", name), ("host", host)]);
        let path = format!("{}/users?{}", self.instance_path(instance), query);
        let body = serde_json::to_value(user)?;
        self.sql.put(&path, &body).await
    }
}

#[async_trait::async_trait]
impl ComputeApi for GcpClient {
    fn project_id(&self) -> &str {
        &self.project_id
    }

    async fn get_network(&self, name: &str) -> Result<Network, GcpError> {
        self.compute.get(&self.network_path(name)).await
    }

    async fn insert_network(&self, network: &Network) -> Result<Operation, GcpError> {
        let body = serde_json::to_value(network)?;
        self.compute.post(&self.networks_path(), &body).await
    }

    async fn patch_network(&self, name: &str, network: &Network) -> Result<Operation, GcpError> {
        let body = serde_json::to_value(network)?;
        self.compute.patch(&self.network_path(name), &body).await
    }

    async fn delete_network(&self, name: &str) -> Result<Operation, GcpError> {
        self.compute.delete(&self.network_path(name)).await
    }
}
