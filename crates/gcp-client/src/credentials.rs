//! Provider credentials
//!
//! The provider's credentials secret holds a JSON document. Two forms are
//! accepted:
//!
//! - a service account key (`{"type": "service_account", ...}`); the key signs
//!   its own OAuth2 token request
//! - a pre-minted token (`{"access_token": "..."}`), used as-is

use crate::error::GcpError;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use serde::Deserialize;
use tracing::debug;

/// OAuth2 scope covering the Cloud SQL Admin and Compute APIs
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Fields of a service account key file the client reads
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub client_email: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
    /// The key document as stored in the secret
    #[serde(skip)]
    raw: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Token provider signing requests with this key
    fn token_provider(&self) -> Result<CustomServiceAccount, GcpError> {
        CustomServiceAccount::from_json(&self.raw).map_err(|e| {
            GcpError::InvalidCredentials(format!(
                "service account key for {} is unusable: {}",
                self.client_email, e
            ))
        })
    }
}

#[derive(Debug, Deserialize)]
struct AccessTokenDocument {
    access_token: String,
}

/// Parsed provider credentials
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Bearer token supplied directly
    AccessToken(String),
    /// Service account key exchanged for a token at its `token_uri`
    ServiceAccount(ServiceAccountKey),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::AccessToken(_) => f.write_str("Credentials::AccessToken(..)"),
            Credentials::ServiceAccount(key) => f
                .debug_tuple("Credentials::ServiceAccount")
                .field(&key.client_email)
                .finish(),
        }
    }
}

impl Credentials {
    /// Parse the credentials JSON stored in the provider secret
    pub fn from_json(data: &[u8]) -> Result<Self, GcpError> {
        let value: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| GcpError::InvalidCredentials(format!("not valid JSON: {}", e)))?;

        if value.get("access_token").is_some() {
            let doc: AccessTokenDocument = serde_json::from_value(value)
                .map_err(|e| GcpError::InvalidCredentials(e.to_string()))?;
            if doc.access_token.is_empty() {
                return Err(GcpError::InvalidCredentials("empty access_token".to_string()));
            }
            return Ok(Credentials::AccessToken(doc.access_token));
        }

        let mut key: ServiceAccountKey = serde_json::from_value(value.clone())
            .map_err(|e| GcpError::InvalidCredentials(e.to_string()))?;
        if key.key_type != "service_account" {
            return Err(GcpError::InvalidCredentials(format!(
                "unsupported credentials type {:?}",
                key.key_type
            )));
        }
        if key.private_key.is_empty() {
            return Err(GcpError::InvalidCredentials("empty private_key".to_string()));
        }
        key.raw = value.to_string();
        Ok(Credentials::ServiceAccount(key))
    }

    /// Resolve an access token usable as a bearer credential
    pub async fn access_token(&self) -> Result<String, GcpError> {
        match self {
            Credentials::AccessToken(token) => Ok(token.clone()),
            Credentials::ServiceAccount(key) => {
                let provider = key.token_provider()?;
                debug!("Requesting access token for {}", key.client_email);
                let token = provider.token(&[CLOUD_PLATFORM_SCOPE]).await.map_err(|e| {
                    GcpError::Authentication(format!(
                        "token request for {} failed: {}",
                        key.client_email, e
                    ))
                })?;
                Ok(token.as_str().to_string())
            }
        }
    }
}
