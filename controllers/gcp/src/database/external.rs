//! Lifecycle operations for Cloud SQL instances.

use crate::database::comparator::{
    generate_database_instance, generate_observation, generate_update, is_up_to_date, late_initialize,
};
use crate::database::connection::{build_connection_details, rotate_root_password};
use crate::managed::{
    persisted_password, ConnectionDetails, ExternalClient, ExternalCreation, ExternalObservation,
    ExternalUpdate, ManagedError, ManagedResource, ReconcileContext, ResourceStore, UpdateFailure,
};
use crds::{available, creating, unavailable, CloudsqlInstance, STATE_CREATING, STATE_RUNNABLE};
use gcp_client::SqlAdminApi;
use std::sync::Arc;
use tracing::{debug, info};

/// External client bound to one project's Cloud SQL Admin API
pub struct CloudsqlExternal {
    sql: Arc<dyn SqlAdminApi>,
    store: Arc<dyn ResourceStore>,
    password_length: usize,
}

impl std::fmt::Debug for CloudsqlExternal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudsqlExternal")
            .field("password_length", &self.password_length)
            .finish_non_exhaustive()
    }
}

impl CloudsqlExternal {
    /// Creates a new external client
    pub fn new(sql: Arc<dyn SqlAdminApi>, store: Arc<dyn ResourceStore>, password_length: usize) -> Self {
        Self {
            sql,
            store,
            password_length,
        }
    }

    /// Password already published to the record's connection secret
    async fn persisted_password(
        &self,
        ctx: &ReconcileContext,
        record: &CloudsqlInstance,
    ) -> Result<Option<Vec<u8>>, ManagedError> {
        let Some(secret_ref) = record.connection_secret_ref() else {
            return Ok(None);
        };
        let secret = ctx
            .run(self.store.get_secret(&record.namespace_or_default(), &secret_ref.name))
            .await?
            .map_err(ManagedError::Connection)?;
        Ok(persisted_password(secret.as_ref()))
    }
}

#[async_trait::async_trait]
impl ExternalClient<CloudsqlInstance> for CloudsqlExternal {
    async fn observe(
        &self,
        ctx: &ReconcileContext,
        record: &mut CloudsqlInstance,
    ) -> Result<ExternalObservation, ManagedError> {
        let name = record.external_name();
        let instance = match ctx.run(self.sql.get_instance(&name)).await? {
            Ok(instance) => instance,
            Err(e) if e.is_not_found() => {
                debug!("Cloud SQL instance {} does not exist", name);
                return Ok(ExternalObservation::absent());
            }
            Err(e) => return Err(ManagedError::Observe(e)),
        };

        record.status.get_or_insert_with(Default::default).at_provider = generate_observation(&instance);
        let spec_late_initialized = late_initialize(&mut record.spec.for_provider, &instance);
        let mut resource_up_to_date = is_up_to_date(&name, &record.spec.for_provider, &instance);

        let mut connection_details = ConnectionDetails::new();
        match instance.state.as_deref().unwrap_or_default() {
            STATE_RUNNABLE => {
                record.set_conditions([available()]);
                let password = self.persisted_password(ctx, record).await?;
                // The root password has never been issued; one update rotates it.
                if record.connection_secret_ref().is_some() && password.is_none() {
                    resource_up_to_date = false;
                }
                connection_details = build_connection_details(record, password);
            }
            STATE_CREATING => record.set_conditions([creating()]),
            _ => record.set_conditions([unavailable()]),
        }

        Ok(ExternalObservation {
            resource_exists: true,
            resource_up_to_date,
            connection_details,
            spec_late_initialized,
        })
    }

    async fn create(&self, ctx: &ReconcileContext, record: &CloudsqlInstance) -> Result<ExternalCreation, ManagedError> {
        let name = record.external_name();
        let instance = generate_database_instance(&name, &record.spec.for_provider);
        match ctx.run(self.sql.insert_instance(&instance)).await? {
            Ok(_) => info!("Requested creation of Cloud SQL instance {}", name),
            Err(e) if e.is_already_exists() => debug!("Cloud SQL instance {} already exists", name),
            Err(e) => return Err(ManagedError::Create(e)),
        }
        Ok(ExternalCreation::default())
    }

    async fn update(&self, ctx: &ReconcileContext, record: &CloudsqlInstance) -> Result<ExternalUpdate, UpdateFailure> {
        let name = record.external_name();

        let mut connection_details = ConnectionDetails::new();
        if record.connection_secret_ref().is_some() {
            let persisted = self.persisted_password(ctx, record).await.map_err(|e| match e {
                ManagedError::Cancelled => ManagedError::Cancelled,
                other => ManagedError::CredentialUpdate(Box::new(other)),
            })?;
            connection_details =
                rotate_root_password(ctx, self.sql.as_ref(), record, &name, persisted, self.password_length).await?;
        }

        let observation = record.status.as_ref().map(|s| &s.at_provider);
        let patch = generate_update(&name, &record.spec.for_provider, observation);
        match ctx.run(self.sql.patch_instance(&name, &patch)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(UpdateFailure::with_details(ManagedError::Patch(e), connection_details)),
            Err(cancelled) => return Err(UpdateFailure::with_details(cancelled, connection_details)),
        }
        info!("Patched Cloud SQL instance {}", name);

        Ok(ExternalUpdate { connection_details })
    }

    async fn delete(&self, ctx: &ReconcileContext, record: &CloudsqlInstance) -> Result<(), ManagedError> {
        let name = record.external_name();
        match ctx.run(self.sql.delete_instance(&name)).await? {
            Ok(_) => info!("Requested deletion of Cloud SQL instance {}", name),
            Err(e) if e.is_not_found() => debug!("Cloud SQL instance {} already gone", name),
            Err(e) => return Err(ManagedError::Delete(e)),
        }
        Ok(())
    }
}
