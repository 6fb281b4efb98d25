//! Main controller implementation.
//!
//! The `Controller` builds the shared store and client factory, one
//! reconciler per managed kind, and runs a watcher for each:
//! - CloudsqlInstance: Cloud SQL instances and their root credentials
//! - Network: Compute Engine VPC networks

use crate::compute::NetworkConnector;
use crate::config::ControllerConfig;
use crate::database::CloudsqlConnector;
use crate::error::ControllerError;
use crate::managed::{GcpClientFactory, KubeStore, ManagedResource};
use crate::reconciler::{KubeRecordWriter, ManagedReconciler};
use crate::watcher::watch_resource;
use crds::{CloudsqlInstance, Network};
use kube::{Api, Client};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Main controller for GCP managed resources.
#[derive(Debug)]
pub struct Controller {
    shutdown: CancellationToken,
    cloudsql_watcher: JoinHandle<Result<(), ControllerError>>,
    network_watcher: JoinHandle<Result<(), ControllerError>>,
}

fn api_for<R: ManagedResource>(client: &Client, namespace: Option<&str>) -> Api<R> {
    match namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::all(client.clone()),
    }
}

impl Controller {
    /// Creates a new controller instance and starts its watchers.
    pub async fn new(config: ControllerConfig) -> Result<Self, ControllerError> {
        info!("Initializing GCP Controller");

        let kube_client = Client::try_default().await?;
        let store = Arc::new(KubeStore::new(kube_client.clone()));
        let factory = Arc::new(GcpClientFactory);
        let shutdown = CancellationToken::new();
        let namespace = config.namespace.as_deref();

        let cloudsql_reconciler = Arc::new(ManagedReconciler::<CloudsqlInstance>::new(
            Arc::new(CloudsqlConnector::new(store.clone(), factory.clone(), config.password_length)),
            Arc::new(KubeRecordWriter::new(kube_client.clone())),
            store.clone(),
            config.poll_interval,
            shutdown.clone(),
        ));
        let network_reconciler = Arc::new(ManagedReconciler::<Network>::new(
            Arc::new(NetworkConnector::new(store.clone(), factory)),
            Arc::new(KubeRecordWriter::new(kube_client.clone())),
            store,
            config.poll_interval,
            shutdown.clone(),
        ));

        let cloudsql_watcher = tokio::spawn(watch_resource(
            api_for::<CloudsqlInstance>(&kube_client, namespace),
            cloudsql_reconciler,
            "CloudsqlInstance",
            shutdown.clone(),
        ));
        let network_watcher = tokio::spawn(watch_resource(
            api_for::<Network>(&kube_client, namespace),
            network_reconciler,
            "Network",
            shutdown.clone(),
        ));

        Ok(Self {
            shutdown,
            cloudsql_watcher,
            network_watcher,
        })
    }

    /// Runs the controller until a watcher exits or a shutdown signal arrives.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("GCP Controller running");

        tokio::select! {
            result = &mut self.cloudsql_watcher => {
                result.map_err(|e| ControllerError::Watch(format!("CloudsqlInstance watcher panicked: {}", e)))??;
                warn!("CloudsqlInstance watcher exited");
            }
            result = &mut self.network_watcher => {
                result.map_err(|e| ControllerError::Watch(format!("Network watcher panicked: {}", e)))??;
                warn!("Network watcher exited");
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!("Failed to listen for shutdown signal: {}", e);
                }
                info!("Shutdown signal received");
            }
        }

        // In-flight reconciles observe the token and abort their external calls.
        self.shutdown.cancel();
        for handle in [self.cloudsql_watcher, self.network_watcher] {
            if handle.is_finished() {
                continue;
            }
            if let Err(e) = handle.await {
                warn!("Watcher task failed during shutdown: {}", e);
            }
        }
        Ok(())
    }
}
