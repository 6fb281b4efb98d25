//! Compute Engine VPC network support.
//!
//! - `comparator`: spec/API translation, late-initialization and drift detection
//! - `external`: the lifecycle operations

pub mod comparator;
pub mod external;
#[cfg(test)]
mod external_test;

pub use external::NetworkExternal;

use crate::managed::{
    resolve_provider, ClientFactory, Connector, ExternalClient, ManagedError, ManagedResource, ReconcileContext,
    ResourceStore,
};
use crds::Network;
use std::sync::Arc;

/// Connects Network records to the Compute API
pub struct NetworkConnector {
    store: Arc<dyn ResourceStore>,
    factory: Arc<dyn ClientFactory>,
}

impl std::fmt::Debug for NetworkConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkConnector")
            .finish_non_exhaustive()
    }
}

impl NetworkConnector {
    /// Creates a new connector
    pub fn new(store: Arc<dyn ResourceStore>, factory: Arc<dyn ClientFactory>) -> Self {
        Self { store, factory }
    }
}

#[async_trait::async_trait]
impl Connector<Network> for NetworkConnector {
    async fn connect(
        &self,
        ctx: &ReconcileContext,
        record: &Network,
    ) -> Result<Box<dyn ExternalClient<Network>>, ManagedError> {
        if record.external_name().is_empty() {
            return Err(ManagedError::NameNotGiven);
        }
        let provider = resolve_provider(ctx, self.store.as_ref(), record).await?;
        let compute = ctx
            .run(self.factory.compute(provider.project_id, provider.credentials))
            .await?
            .map_err(ManagedError::ClientInit)?;
        Ok(Box::new(NetworkExternal::new(compute)))
    }
}
