//! Lookup of Providers and Secrets.
//!
//! The lifecycle code reads Providers and Secrets by namespaced name and
//! writes connection details into Secrets. `KubeStore` talks to the API
//! server; tests use an in-memory store.

use crate::managed::connection::ConnectionDetails;
use crds::Provider;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};
use k8s_openapi::ByteString;
use kube::api::{Patch, PatchParams, PostParams};
use kube::{Api, Client};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Errors returned by a [`ResourceStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    /// The object does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),
}

/// Key-value access to Providers and Secrets
#[async_trait::async_trait]
pub trait ResourceStore: Send + Sync {
    /// Get a Provider by namespaced name
    async fn get_provider(&self, namespace: &str, name: &str) -> Result<Provider, StoreError>;

    /// Get a Secret by namespaced name, `None` if it does not exist
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>, StoreError>;

    /// Merge connection details into a Secret, creating it if needed
    async fn publish_connection_details(
        &self,
        namespace: &str,
        name: &str,
        owner: Option<OwnerReference>,
        details: &ConnectionDetails,
    ) -> Result<(), StoreError>;
}

fn to_secret_data(details: &ConnectionDetails) -> BTreeMap<String, ByteString> {
    details
        .iter()
        .map(|(k, v)| (k.clone(), ByteString(v.clone())))
        .collect()
}

/// Store backed by the Kubernetes API server
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl std::fmt::Debug for KubeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStore")
            .finish_non_exhaustive()
    }
}

impl KubeStore {
    /// Creates a new store using `client`
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ResourceStore for KubeStore {
    async fn get_provider(&self, namespace: &str, name: &str) -> Result<Provider, StoreError> {
        let api: Api<Provider> = Api::namespaced(self.client.clone(), namespace);
        match api.get(name).await {
            Ok(provider) => Ok(provider),
            Err(kube::Error::Api(api_err)) if api_err.code == 404 => {
                Err(StoreError::NotFound(format!("provider {}/{}", namespace, name)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>, StoreError> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get_opt(name).await?)
    }

    async fn publish_connection_details(
        &self,
        namespace: &str,
        name: &str,
        owner: Option<OwnerReference>,
        details: &ConnectionDetails,
    ) -> Result<(), StoreError> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let data = to_secret_data(details);

        if api.get_opt(name).await?.is_some() {
            let patch = serde_json::json!({ "data": data });
            api.patch(name, &PatchParams::default(), &Patch::Merge(&patch)).await?;
            debug!("Merged {} connection keys into secret {}/{}", details.len(), namespace, name);
        } else {
            let secret = Secret {
                metadata: ObjectMeta {
                    name: Some(name.to_string()),
                    namespace: Some(namespace.to_string()),
                    owner_references: owner.map(|o| vec![o]),
                    ..Default::default()
                },
                data: Some(data),
                ..Default::default()
            };
            api.create(&PostParams::default(), &secret).await?;
            debug!("Created connection secret {}/{}", namespace, name);
        }
        Ok(())
    }
}

#[cfg(test)]
pub use in_memory::InMemoryStore;
