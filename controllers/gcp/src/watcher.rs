//! Kubernetes resource watchers.
//!
//! Each managed kind runs under its own `kube_runtime::Controller`, driven
//! by the generic `watch_resource()` helper. The runtime handles
//! reconnection and scheduling; the reconciler decides requeue delays.

use crate::error::ControllerError;
use crate::managed::ManagedResource;
use crate::reconciler::ManagedReconciler;
use futures::StreamExt;
use kube::Api;
use kube_runtime::controller::{Action, Config as RuntimeConfig};
use kube_runtime::{watcher, Controller};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Watch one managed kind and reconcile it until `shutdown` fires.
pub async fn watch_resource<R>(
    api: Api<R>,
    reconciler: Arc<ManagedReconciler<R>>,
    resource_name: &'static str,
    shutdown: CancellationToken,
) -> Result<(), ControllerError>
where
    R: ManagedResource,
{
    info!("Starting {} watcher", resource_name);

    let error_policy = move |obj: Arc<R>, error: &ControllerError, ctx: Arc<ManagedReconciler<R>>| {
        let delay = ctx.error_backoff(&obj);
        error!(
            kind = resource_name,
            key = %obj.key(),
            "Reconciliation failed, retrying in {:?}: {}",
            delay,
            error
        );
        Action::requeue(delay)
    };

    let reconcile = move |obj: Arc<R>, ctx: Arc<ManagedReconciler<R>>| async move {
        debug!(kind = resource_name, key = %obj.key(), "Reconciling");
        ctx.reconcile(&obj).await
    };

    // Debounce batches the status writes each pass makes.
    let runtime_config = RuntimeConfig::default()
        .debounce(Duration::from_secs(1))
        .concurrency(3);

    Controller::new(api, watcher::Config::default())
        .with_config(runtime_config)
        .graceful_shutdown_on(async move { shutdown.cancelled().await })
        .run(reconcile, error_policy, reconciler)
        .for_each(|res| async move {
            if let Err(e) = res {
                debug!("Controller event for {}: {}", resource_name, e);
            }
        })
        .await;

    info!("{} watcher stopped", resource_name);
    Ok(())
}
