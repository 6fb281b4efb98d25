//! Managed reconciliation driver.
//!
//! Runs one pass of the lifecycle for a record: finalizer, connect, observe,
//! spec write-back, then create, update or delete, publishing connection
//! details and persisting status. Errors set the `Synced` condition and are
//! retried with a per-record Fibonacci backoff.

pub mod writer;
#[cfg(test)]
mod reconciler_test;

pub use writer::{KubeRecordWriter, RecordWriter};

use crate::backoff::FibonacciBackoff;
use crate::error::ControllerError;
use crate::managed::{ConnectionDetails, Connector, ManagedResource, ReconcileContext, ResourceStore};
use crds::{creating, deleting, reconcile_error, reconcile_success, ReclaimPolicy};
use kube::ResourceExt;
use kube_runtime::controller::Action;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Finalizer guarding external resources of managed records
pub const FINALIZER: &str = "finalizer.managedresource.crossplane.io";

/// Requeue delay while waiting for an external deletion to finish
const DELETION_POLL: Duration = Duration::from_secs(15);

/// Backoff state for a resource
#[derive(Debug, Clone, Default)]
struct BackoffState {
    backoff: FibonacciBackoff,
    error_count: u32,
}

/// Reconciles one managed resource kind.
pub struct ManagedReconciler<R: ManagedResource> {
    connector: Arc<dyn Connector<R>>,
    writer: Arc<dyn RecordWriter<R>>,
    store: Arc<dyn ResourceStore>,
    poll_interval: Duration,
    shutdown: CancellationToken,
    /// Error tracking per resource (namespace/name -> BackoffState)
    backoff_states: Arc<Mutex<HashMap<String, BackoffState>>>,
}

impl<R: ManagedResource> std::fmt::Debug for ManagedReconciler<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedReconciler")
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl<R: ManagedResource> ManagedReconciler<R> {
    /// Creates a new reconciler
    pub fn new(
        connector: Arc<dyn Connector<R>>,
        writer: Arc<dyn RecordWriter<R>>,
        store: Arc<dyn ResourceStore>,
        poll_interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            connector,
            writer,
            store,
            poll_interval,
            shutdown,
            backoff_states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Run one reconcile pass for `record`
    pub async fn reconcile(&self, record: &R) -> Result<Action, ControllerError> {
        let key = record.key();
        let ctx = ReconcileContext::new(self.shutdown.child_token());
        let mut record = record.clone();

        let result = if record.meta().deletion_timestamp.is_some() {
            self.reconcile_delete(&ctx, &mut record).await
        } else {
            self.reconcile_apply(&ctx, &mut record).await
        };

        match result {
            Ok(action) => {
                self.reset_error(&key);
                Ok(action)
            }
            Err(e) => {
                record.set_conditions([reconcile_error(&e)]);
                if let Err(status_err) = self.writer.update_status(&record).await {
                    warn!("Failed to record reconcile error on {}: {}", key, status_err);
                }
                Err(e)
            }
        }
    }

    async fn reconcile_apply(&self, ctx: &ReconcileContext, record: &mut R) -> Result<Action, ControllerError> {
        let key = record.key();

        if !has_finalizer(record) {
            debug!("Adding finalizer to {}", key);
            let stored = self.writer.add_finalizer(record, FINALIZER).await?;
            record.meta_mut().finalizers.get_or_insert_with(Vec::new).push(FINALIZER.to_string());
            record.meta_mut().resource_version = stored.meta().resource_version.clone();
        }

        let external = self.connector.connect(ctx, record).await?;
        let observation = external.observe(ctx, record).await?;

        if observation.spec_late_initialized {
            debug!("Persisting late-initialized spec of {}", key);
            let stored = self.writer.update_spec(record).await?;
            record.meta_mut().resource_version = stored.meta().resource_version.clone();
        }

        if !observation.resource_exists {
            info!("Creating external resource for {}", key);
            record.set_conditions([creating()]);
            let creation = external.create(ctx, record).await?;
            self.publish(ctx, record, &creation.connection_details).await?;
            record.set_conditions([reconcile_success()]);
            self.writer.update_status(record).await?;
            return Ok(Action::requeue(self.poll_interval));
        }

        self.publish(ctx, record, &observation.connection_details).await?;

        if !observation.resource_up_to_date {
            info!("Updating external resource for {}", key);
            let update = match external.update(ctx, record).await {
                Ok(update) => update,
                Err(failure) => {
                    self.publish(ctx, record, &failure.connection_details).await?;
                    return Err(failure.error.into());
                }
            };
            self.publish(ctx, record, &update.connection_details).await?;
        }

        record.set_conditions([reconcile_success()]);
        self.writer.update_status(record).await?;
        Ok(Action::requeue(self.poll_interval))
    }

    async fn reconcile_delete(&self, ctx: &ReconcileContext, record: &mut R) -> Result<Action, ControllerError> {
        let key = record.key();
        if !has_finalizer(record) {
            return Ok(Action::await_change());
        }

        if record.reclaim_policy() == ReclaimPolicy::Delete {
            let external = self.connector.connect(ctx, record).await?;
            let observation = external.observe(ctx, record).await?;
            if observation.resource_exists {
                info!("Deleting external resource for {}", key);
                record.set_conditions([deleting()]);
                external.delete(ctx, record).await?;
                record.set_conditions([reconcile_success()]);
                self.writer.update_status(record).await?;
                return Ok(Action::requeue(DELETION_POLL));
            }
        } else {
            info!("Retaining external resource for {}", key);
        }

        self.writer.remove_finalizer(record, FINALIZER).await?;
        Ok(Action::await_change())
    }

    async fn publish(
        &self,
        ctx: &ReconcileContext,
        record: &R,
        details: &ConnectionDetails,
    ) -> Result<(), ControllerError> {
        let Some(secret_ref) = record.connection_secret_ref() else {
            return Ok(());
        };
        if details.is_empty() {
            return Ok(());
        }
        let owner = record.controller_owner_ref(&());
        ctx.run(self.store.publish_connection_details(
            &record.namespace_or_default(),
            &secret_ref.name,
            owner,
            details,
        ))
        .await??;
        Ok(())
    }

    /// Requeue delay for a record whose reconcile failed
    pub fn error_backoff(&self, record: &R) -> Duration {
        let key = record.key();
        match self.backoff_states.lock() {
            Ok(mut states) => {
                let state = states.entry(key.clone()).or_default();
                state.error_count += 1;
                let delay = state.backoff.next_backoff();
                debug!("Backing off {} for {:?} after {} errors", key, delay, state.error_count);
                delay
            }
            Err(e) => {
                warn!("Failed to lock backoff_states: {}, using default backoff", e);
                Duration::from_secs(60)
            }
        }
    }

    /// Reset error tracking for a resource (on successful reconciliation)
    fn reset_error(&self, key: &str) {
        if let Ok(mut states) = self.backoff_states.lock() {
            states.remove(key);
        }
    }
}

fn has_finalizer<R: ManagedResource>(record: &R) -> bool {
    record.finalizers().iter().any(|f| f == FINALIZER)
}
