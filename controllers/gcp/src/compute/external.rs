//! Lifecycle operations for VPC networks.

use crate::compute::comparator::{generate_network, generate_observation, generate_update, is_up_to_date, late_initialize};
use crate::managed::{
    ExternalClient, ExternalCreation, ExternalObservation, ExternalUpdate, ManagedError, ManagedResource,
    ReconcileContext, UpdateFailure,
};
use crds::{available, Network};
use gcp_client::ComputeApi;
use std::sync::Arc;
use tracing::{debug, info};

/// External client bound to one project's Compute API
pub struct NetworkExternal {
    compute: Arc<dyn ComputeApi>,
}

impl std::fmt::Debug for NetworkExternal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkExternal")
            .finish_non_exhaustive()
    }
}

impl NetworkExternal {
    pub fn new(compute: Arc<dyn ComputeApi>) -> Self {
        Self { compute }
    }
}

#[async_trait::async_trait]
impl ExternalClient<Network> for NetworkExternal {
    async fn observe(&self, ctx: &ReconcileContext, record: &mut Network) -> Result<ExternalObservation, ManagedError> {
        let name = record.external_name();
        let network = match ctx.run(self.compute.get_network(&name)).await? {
            Ok(network) => network,
            Err(e) if e.is_not_found() => {
                debug!("Network {} does not exist", name);
                return Ok(ExternalObservation::absent());
            }
            Err(e) => return Err(ManagedError::Observe(e)),
        };

        record.status.get_or_insert_with(Default::default).at_provider = generate_observation(&network);
        let spec_late_initialized = late_initialize(&mut record.spec.for_provider, &network);
        let resource_up_to_date = is_up_to_date(&record.spec.for_provider, &network);
        record.set_conditions([available()]);

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date,
            connection_details: Default::default(),
            spec_late_initialized,
        })
    }

    async fn create(&self, ctx: &ReconcileContext, record: &Network) -> Result<ExternalCreation, ManagedError> {
        let network = generate_network(&record.spec.for_provider);
        match ctx.run(self.compute.insert_network(&network)).await? {
            Ok(_) => info!("Requested creation of network {}", network.name),
            Err(e) if e.is_already_exists() => debug!("Network {} already exists", network.name),
            Err(e) => return Err(ManagedError::Create(e)),
        }
        Ok(ExternalCreation::default())
    }

    async fn update(&self, ctx: &ReconcileContext, record: &Network) -> Result<ExternalUpdate, UpdateFailure> {
        let name = record.external_name();
        let patch = generate_update(&record.spec.for_provider);
        ctx.run(self.compute.patch_network(&name, &patch))
            .await?
            .map_err(ManagedError::Patch)?;
        info!("Patched network {}", name);
        Ok(ExternalUpdate::default())
    }

    async fn delete(&self, ctx: &ReconcileContext, record: &Network) -> Result<(), ManagedError> {
        let name = record.external_name();
        match ctx.run(self.compute.delete_network(&name)).await? {
            Ok(_) => info!("Requested deletion of network {}", name),
            Err(e) if e.is_not_found() => debug!("Network {} already gone", name),
            Err(e) => return Err(ManagedError::Delete(e)),
        }
        Ok(())
    }
}
