//! Provider and credential resolution.
//!
//! A managed record names a `Provider`; the Provider names the GCP project
//! and a Secret key holding credentials JSON. Connectors resolve both and
//! hand them to a [`ClientFactory`] to build project-scoped API clients.

use crate::managed::connection::secret_value;
use crate::managed::context::ReconcileContext;
use crate::managed::error::ManagedError;
use crate::managed::resource::ManagedResource;
use crate::managed::store::{ResourceStore, StoreError};
use gcp_client::{ComputeApi, Credentials, GcpClient, GcpError, SqlAdminApi};
use std::sync::Arc;
use tracing::debug;

/// Project identity and credentials resolved from a Provider
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub project_id: String,
    pub credentials: Credentials,
}

/// Builds API clients for a project
#[async_trait::async_trait]
pub trait ClientFactory: Send + Sync {
    /// Cloud SQL Admin client for `project_id`
    async fn sql_admin(&self, project_id: String, credentials: Credentials) -> Result<Arc<dyn SqlAdminApi>, GcpError>;

    /// Compute client for `project_id`
    async fn compute(&self, project_id: String, credentials: Credentials) -> Result<Arc<dyn ComputeApi>, GcpError>;
}

/// Factory producing REST clients against the public Google endpoints
#[derive(Debug, Clone, Copy, Default)]
pub struct GcpClientFactory;

#[async_trait::async_trait]
impl ClientFactory for GcpClientFactory {
    async fn sql_admin(&self, project_id: String, credentials: Credentials) -> Result<Arc<dyn SqlAdminApi>, GcpError> {
        Ok(Arc::new(GcpClient::new(project_id, credentials).await?))
    }

    async fn compute(&self, project_id: String, credentials: Credentials) -> Result<Arc<dyn ComputeApi>, GcpError> {
        Ok(Arc::new(GcpClient::new(project_id, credentials).await?))
    }
}

/// Resolve the record's Provider and parse its credentials.
///
/// The Provider is looked up in the reference's namespace, falling back to
/// the record's own; its credentials Secret lives beside it.
pub async fn resolve_provider<R: ManagedResource>(
    ctx: &ReconcileContext,
    store: &dyn ResourceStore,
    record: &R,
) -> Result<ProviderCredentials, ManagedError> {
    let record_ns = record.namespace_or_default();
    let provider_ref = record.provider_ref();
    let namespace = provider_ref.namespace_or(&record_ns);

    let provider = ctx
        .run(store.get_provider(namespace, &provider_ref.name))
        .await?
        .map_err(ManagedError::ProviderNotFound)?;

    let selector = &provider.spec.credentials_secret_ref;
    let secret = ctx
        .run(store.get_secret(namespace, &selector.name))
        .await?
        .map_err(ManagedError::CredentialNotFound)?
        .ok_or_else(|| {
            ManagedError::CredentialNotFound(StoreError::NotFound(format!(
                "secret {}/{}",
                namespace, selector.name
            )))
        })?;

    let data = secret_value(&secret, &selector.key).ok_or_else(|| {
        ManagedError::CredentialNotFound(StoreError::NotFound(format!(
            "key {} in secret {}/{}",
            selector.key, namespace, selector.name
        )))
    })?;

    let credentials = Credentials::from_json(&data).map_err(ManagedError::ClientInit)?;
    debug!("Resolved provider {}/{} for project {}", namespace, provider_ref.name, provider.spec.project_id);

    Ok(ProviderCredentials {
        project_id: provider.spec.project_id.clone(),
        credentials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managed::store::InMemoryStore;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_resolve_provider() {
        let store = InMemoryStore::new();
        seed_provider(&store, "default");
        let record = create_test_cloudsql_instance("db", "default");

        let resolved = resolve_provider(&ReconcileContext::default(), &store, &record)
            .await
            .expect("provider resolves");
        assert_eq!(resolved.project_id, TEST_PROJECT);
        assert_eq!(resolved.credentials, Credentials::AccessToken(TEST_TOKEN.to_string()));
    }

    #[tokio::test]
    async fn test_missing_provider() {
        let store = InMemoryStore::new();
        let record = create_test_cloudsql_instance("db", "default");

        let err = resolve_provider(&ReconcileContext::default(), &store, &record)
            .await
            .expect_err("no provider");
        assert!(matches!(err, ManagedError::ProviderNotFound(_)));
        assert!(err.to_string().starts_with("cannot get provider: "));
    }

    #[tokio::test]
    async fn test_missing_credentials_secret() {
        let store = InMemoryStore::new();
        store.add_provider("default", create_test_provider(TEST_PROVIDER));
        let record = create_test_cloudsql_instance("db", "default");

        let err = resolve_provider(&ReconcileContext::default(), &store, &record)
            .await
            .expect_err("no secret");
        assert!(matches!(err, ManagedError::CredentialNotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_credentials_key() {
        let store = InMemoryStore::new();
        store.add_provider("default", create_test_provider(TEST_PROVIDER));
        store.add_secret("default", TEST_CREDENTIALS_SECRET, &[("other", b"{}")]);
        let record = create_test_cloudsql_instance("db", "default");

        let err = resolve_provider(&ReconcileContext::default(), &store, &record)
            .await
            .expect_err("no key");
        assert!(matches!(err, ManagedError::CredentialNotFound(_)));
    }

    #[tokio::test]
    async fn test_malformed_credentials() {
        let store = InMemoryStore::new();
        store.add_provider("default", create_test_provider(TEST_PROVIDER));
        store.add_secret("default", TEST_CREDENTIALS_SECRET, &[(TEST_CREDENTIALS_KEY, b"not-json")]);
        let record = create_test_cloudsql_instance("db", "default");

        let err = resolve_provider(&ReconcileContext::default(), &store, &record)
            .await
            .expect_err("bad credentials");
        assert!(matches!(err, ManagedError::ClientInit(_)));
        assert!(err.to_string().starts_with("cannot create new provider client: "));
    }
}
