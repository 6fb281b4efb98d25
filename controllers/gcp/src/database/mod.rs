//! Cloud SQL instance support.
//!
//! - `comparator`: spec/API translation, late-initialization and drift detection
//! - `connection`: connection details and root password rotation
//! - `external`: the lifecycle operations

pub mod comparator;
pub mod connection;
pub mod external;

pub use external::CloudsqlExternal;

use crate::managed::{resolve_provider, ClientFactory, Connector, ExternalClient, ManagedError, ReconcileContext, ResourceStore};
use crds::CloudsqlInstance;
use std::sync::Arc;

/// Connects CloudsqlInstance records to the Cloud SQL Admin API
pub struct CloudsqlConnector {
    store: Arc<dyn ResourceStore>,
    factory: Arc<dyn ClientFactory>,
    password_length: usize,
}

impl std::fmt::Debug for CloudsqlConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudsqlConnector")
            .field("password_length", &self.password_length)
            .finish_non_exhaustive()
    }
}

impl CloudsqlConnector {
    /// Creates a new connector
    pub fn new(store: Arc<dyn ResourceStore>, factory: Arc<dyn ClientFactory>, password_length: usize) -> Self {
        Self {
            store,
            factory,
            password_length,
        }
    }
}

#[async_trait::async_trait]
impl Connector<CloudsqlInstance> for CloudsqlConnector {
    async fn connect(
        &self,
        ctx: &ReconcileContext,
        record: &CloudsqlInstance,
    ) -> Result<Box<dyn ExternalClient<CloudsqlInstance>>, ManagedError> {
        let provider = resolve_provider(ctx, self.store.as_ref(), record).await?;
        let sql = ctx
            .run(self.factory.sql_admin(provider.project_id, provider.credentials))
            .await?
            .map_err(ManagedError::ClientInit)?;
        Ok(Box::new(CloudsqlExternal::new(sql, Arc::clone(&self.store), self.password_length)))
    }
}
