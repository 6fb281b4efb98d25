//! GCP client errors

use thiserror::Error;

/// Errors that can occur when interacting with the GCP APIs
#[derive(Debug, Error)]
pub enum GcpError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GCP API returned an error
    #[error("GCP API error {code}: {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message reported by the API
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (invalid token, missing permission)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource already exists (HTTP 409)
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Credentials could not be parsed or used
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
}

impl GcpError {
    /// Classify an HTTP error status and message
    pub fn from_status(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            404 => GcpError::NotFound(message),
            409 => GcpError::AlreadyExists(message),
            401 | 403 => GcpError::Authentication(message),
            _ => GcpError::Api { code, message },
        }
    }

    /// Whether the error reports a missing resource
    pub fn is_not_found(&self) -> bool {
        matches!(self, GcpError::NotFound(_))
    }

    /// Whether the error reports a resource that already exists
    pub fn is_already_exists(&self) -> bool {
        matches!(self, GcpError::AlreadyExists(_))
    }
}
