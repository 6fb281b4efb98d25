//! Mock GcpClient for unit testing
//!
//! This module provides an in-memory implementation of `SqlAdminApi` and
//! `ComputeApi` that can be used in unit tests without reaching Google.
//! Failures for any operation can be injected by name with `fail_on`.

use crate::error::GcpError;
use crate::gcp_trait::{ComputeApi, SqlAdminApi};
use crate::models::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// State reported for a freshly inserted instance
pub const MOCK_CREATE_STATE: &str = "PENDING_CREATE";

/// A recorded `update_user` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub instance: String,
    pub name: String,
    pub host: String,
    pub user: User,
}

/// Mock GcpClient for testing
///
/// Clones share the same state, so a test can keep a handle while the
/// controller under test owns another.
#[derive(Clone, Default)]
pub struct MockGcpClient {
    project_id: String,
    instances: Arc<Mutex<HashMap<String, DatabaseInstance>>>,
    users: Arc<Mutex<HashMap<String, Vec<User>>>>,
    networks: Arc<Mutex<HashMap<String, Network>>>,
    failures: Arc<Mutex<HashMap<String, (u16, String)>>>,
    calls: Arc<Mutex<Vec<String>>>,
    user_updates: Arc<Mutex<Vec<UserUpdate>>>,
    next_id: Arc<Mutex<u64>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn default_user_for(instance: &DatabaseInstance) -> User {
    let postgres = instance
        .database_version
        .as_deref()
        .is_some_and(|v| v.starts_with("POSTGRES"));
    User {
        name: if postgres { "postgres" } else { "root" }.to_string(),
        host: if postgres { None } else { Some("%".to_string()) },
        instance: Some(instance.name.clone()),
        ..Default::default()
    }
}

impl MockGcpClient {
    /// Create a new mock client for a project
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            next_id: Arc::new(Mutex::new(1)),
            ..Default::default()
        }
    }

    /// Add an instance to the mock store (for test setup)
    ///
    /// The engine's default user is created alongside it.
    pub fn add_instance(&self, instance: DatabaseInstance) {
        lock(&self.users)
            .entry(instance.name.clone())
            .or_insert_with(|| vec![default_user_for(&instance)]);
        lock(&self.instances).insert(instance.name.clone(), instance);
    }

    /// Replace the users of an instance (for test setup)
    pub fn set_users(&self, instance: &str, users: Vec<User>) {
        lock(&self.users).insert(instance.to_string(), users);
    }

    /// Add a network to the mock store (for test setup)
    pub fn add_network(&self, network: Network) {
        lock(&self.networks).insert(network.name.clone(), network);
    }

    /// Force the lifecycle state of a stored instance
    pub fn set_instance_state(&self, name: &str, state: &str) {
        if let Some(instance) = lock(&self.instances).get_mut(name) {
            instance.state = Some(state.to_string());
        }
    }

    /// Stored copy of an instance
    pub fn instance(&self, name: &str) -> Option<DatabaseInstance> {
        lock(&self.instances).get(name).cloned()
    }

    /// Stored copy of a network
    pub fn network(&self, name: &str) -> Option<Network> {
        lock(&self.networks).get(name).cloned()
    }

    /// Make every call to `operation` fail with the given HTTP status
    pub fn fail_on(&self, operation: &str, code: u16, message: impl Into<String>) {
        lock(&self.failures).insert(operation.to_string(), (code, message.into()));
    }

    /// Remove an injected failure
    pub fn clear_failure(&self, operation: &str) {
        lock(&self.failures).remove(operation);
    }

    /// Names of all operations invoked so far, in order
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Number of times `operation` was invoked
    pub fn call_count(&self, operation: &str) -> usize {
        lock(&self.calls).iter().filter(|c| c.as_str() == operation).count()
    }

    /// Recorded `update_user` calls
    pub fn user_updates(&self) -> Vec<UserUpdate> {
        lock(&self.user_updates).clone()
    }

    fn record(&self, operation: &str) -> Result<(), GcpError> {
        lock(&self.calls).push(operation.to_string());
        match lock(&self.failures).get(operation) {
            Some((code, message)) => Err(GcpError::from_status(*code, message.clone())),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> u64 {
        let mut id = lock(&self.next_id);
        let current = *id;
        *id += 1;
        current
    }

    fn operation(&self, kind: &str, target: &str) -> Operation {
        Operation {
            name: format!("operation-{}", self.next_id()),
            status: Some("PENDING".to_string()),
            operation_type: Some(kind.to_string()),
            target_link: Some(target.to_string()),
            self_link: None,
        }
    }
}

#[async_trait::async_trait]
impl SqlAdminApi for MockGcpClient {
    fn project_id(&self) -> &str {
        &self.project_id
    }

    async fn get_instance(&self, name: &str) -> Result<DatabaseInstance, GcpError> {
        self.record("get_instance")?;
        self.instance(name)
            .ok_or_else(|| GcpError::NotFound(format!("instance {} not found", name)))
    }

    async fn insert_instance(&self, instance: &DatabaseInstance) -> Result<Operation, GcpError> {
        self.record("insert_instance")?;
        if lock(&self.instances).contains_key(&instance.name) {
            return Err(GcpError::AlreadyExists(format!("instance {} already exists", instance.name)));
        }

        let mut stored = instance.clone();
        stored.project = Some(self.project_id.clone());
        stored.state = Some(MOCK_CREATE_STATE.to_string());
        if let Some(settings) = stored.settings.as_mut() {
            settings.settings_version = Some(1);
        }
        self.add_instance(stored);
        Ok(self.operation("CREATE", &instance.name))
    }

    async fn patch_instance(&self, name: &str, instance: &DatabaseInstance) -> Result<Operation, GcpError> {
        self.record("patch_instance")?;
        let mut instances = lock(&self.instances);
        let stored = instances
            .get_mut(name)
            .ok_or_else(|| GcpError::NotFound(format!("instance {} not found", name)))?;

        if let Some(settings) = &instance.settings {
            let version = stored
                .settings
                .as_ref()
                .and_then(|s| s.settings_version)
                .unwrap_or(0);
            let mut patched = settings.clone();
            patched.settings_version = Some(version + 1);
            stored.settings = Some(patched);
        }
        if instance.database_version.is_some() {
            stored.database_version = instance.database_version.clone();
        }
        drop(instances);
        Ok(self.operation("UPDATE", name))
    }

    async fn delete_instance(&self, name: &str) -> Result<Operation, GcpError> {
        self.record("delete_instance")?;
        lock(&self.instances)
            .remove(name)
            .ok_or_else(|| GcpError::NotFound(format!("instance {} not found", name)))?;
        lock(&self.users).remove(name);
        Ok(self.operation("DELETE", name))
    }

    async fn list_users(&self, instance: &str) -> Result<Vec<User>, GcpError> {
        self.record("list_users")?;
        if !lock(&self.instances).contains_key(instance) {
            return Err(GcpError::NotFound(format!("instance {} not found", instance)));
        }
        Ok(lock(&self.users).get(instance).cloned().unwrap_or_default())
    }

    async fn update_user(&self, instance: &str, name: &str, host: &str, user: &User) -> Result<Operation, GcpError> {
        self.record("update_user")?;
        {
            let mut users = lock(&self.users);
            let stored = users
                .get_mut(instance)
                .and_then(|list| list.iter_mut().find(|u| u.name == name))
                .ok_or_else(|| GcpError::NotFound(format!("user {} not found", name)))?;
            stored.password = user.password.clone();
        }
        lock(&self.user_updates).push(UserUpdate {
            instance: instance.to_string(),
            name: name.to_string(),
            host: host.to_string(),
            user: user.clone(),
        });
        Ok(self.operation("UPDATE_USER", instance))
    }
}

#[async_trait::async_trait]
impl ComputeApi for MockGcpClient {
    fn project_id(&self) -> &str {
        &self.project_id
    }

    async fn get_network(&self, name: &str) -> Result<Network, GcpError> {
        self.record("get_network")?;
        self.network(name)
            .ok_or_else(|| GcpError::NotFound(format!("network {} not found", name)))
    }

    async fn insert_network(&self, network: &Network) -> Result<Operation, GcpError> {
        self.record("insert_network")?;
        if lock(&self.networks).contains_key(&network.name) {
            return Err(GcpError::AlreadyExists(format!("network {} already exists", network.name)));
        }

        let mut stored = network.clone();
        stored.id = Some(self.next_id());
        stored.self_link = Some(format!(
            "https://www.googleapis.com/compute/v1/projects/{}/global/networks/{}",
            self.project_id, network.name
        ));
        if stored.routing_config.is_none() {
            stored.routing_config = Some(NetworkRoutingConfig {
                routing_mode: Some("REGIONAL".to_string()),
            });
        }
        if stored.auto_create_subnetworks.is_none() && stored.ipv4_range.is_none() {
            stored.auto_create_subnetworks = Some(true);
        }
        self.add_network(stored);
        Ok(self.operation("insert", &network.name))
    }

    async fn patch_network(&self, name: &str, network: &Network) -> Result<Operation, GcpError> {
        self.record("patch_network")?;
        let mut networks = lock(&self.networks);
        let stored = networks
            .get_mut(name)
            .ok_or_else(|| GcpError::NotFound(format!("network {} not found", name)))?;
        if network.routing_config.is_some() {
            stored.routing_config = network.routing_config.clone();
        }
        if network.description.is_some() {
            stored.description = network.description.clone();
        }
        drop(networks);
        Ok(self.operation("patch", name))
    }

    async fn delete_network(&self, name: &str) -> Result<Operation, GcpError> {
        self.record("delete_network")?;
        lock(&self.networks)
            .remove(name)
            .ok_or_else(|| GcpError::NotFound(format!("network {} not found", name)))?;
        Ok(self.operation("delete", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(name: &str) -> DatabaseInstance {
        DatabaseInstance {
            name: name.to_string(),
            database_version: Some("POSTGRES_11".to_string()),
            settings: Some(Settings {
                tier: "db-custom-1-3840".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_then_conflict() {
        let mock = MockGcpClient::new("p");
        mock.insert_instance(&instance("db")).await.expect("first insert");
        let err = mock.insert_instance(&instance("db")).await.expect_err("duplicate");
        assert!(err.is_already_exists());
        assert_eq!(mock.instance("db").and_then(|i| i.state).as_deref(), Some(MOCK_CREATE_STATE));
    }

    #[tokio::test]
    async fn test_default_user_by_engine() {
        let mock = MockGcpClient::new("p");
        mock.insert_instance(&instance("db")).await.expect("insert");
        let users = mock.list_users("db").await.expect("list");
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "postgres");
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let mock = MockGcpClient::new("p");
        mock.fail_on("get_network", 500, "boom");
        let err = mock.get_network("vpc").await.expect_err("injected");
        assert!(matches!(err, GcpError::Api { code: 500, .. }));
        mock.clear_failure("get_network");
        assert!(mock.get_network("vpc").await.expect_err("missing").is_not_found());
        assert_eq!(mock.call_count("get_network"), 2);
    }
}
