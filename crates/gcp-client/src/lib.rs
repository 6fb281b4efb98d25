//! GCP REST API Client
//!
//! A Rust client for the two GCP APIs the stack controllers manage:
//! Cloud SQL Admin (`sql/v1beta4`) and Compute Engine (`compute/v1`).
//!
//! # Example
//!
//! ```no_run
//! use gcp_client::{Credentials, GcpClient, SqlAdminApi};
//!
//! # async fn example(credentials_json: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Credentials::from_json(credentials_json)?;
//! let client = GcpClient::new("my-project".to_string(), credentials).await?;
//!
//! let instance = client.get_instance("my-db").await?;
//! println!("{} is {:?}", instance.name, instance.state);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Cloud SQL Admin**: get, insert, patch and delete instances; list and update users
//! - **Compute**: get, insert, patch and delete VPC networks
//! - **Error classification**: 404 and 409 map to `NotFound` and `AlreadyExists`
//!   so callers can treat them as idempotent outcomes
//! - **Mocking**: `MockGcpClient` behind the `test-util` feature

pub mod client;
pub mod common;
pub mod credentials;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod gcp_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::{GcpClient, COMPUTE_BASE_URL, SQLADMIN_BASE_URL};
pub use common::HttpClient;
pub use credentials::{Credentials, ServiceAccountKey};
pub use error::GcpError;
pub use models::*;
pub use gcp_trait::{ComputeApi, SqlAdminApi};
#[cfg(any(test, feature = "test-util"))]
pub use mock::{MockGcpClient, UserUpdate};
