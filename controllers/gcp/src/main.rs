//! GCP Controller
//!
//! Reconciles GCP managed resources declared as Kubernetes records:
//! - CloudsqlInstance: Cloud SQL instances, publishing connection details
//! - Network: Compute Engine VPC networks
//!
//! Each record names a `Provider` holding the GCP project and credentials.

mod backoff;
mod compute;
mod config;
mod controller;
mod database;
mod error;
mod managed;
mod reconciler;
#[cfg(test)]
mod test_utils;
mod watcher;

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use controller::Controller;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting GCP Controller");

    let config = ControllerConfig::from_env()?;
    info!("Configuration:");
    info!("  Namespace: {}", config.namespace.as_deref().unwrap_or("all namespaces"));
    info!("  Poll interval: {:?}", config.poll_interval);
    info!("  Password length: {}", config.password_length);

    let controller = Controller::new(config).await?;
    controller.run().await?;

    Ok(())
}
