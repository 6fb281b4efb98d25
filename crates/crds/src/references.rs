//! Kubernetes object references shared by the managed resource CRDs
//!
//! Managed resources point at a `Provider` for project identity and
//! credentials, and at a `Secret` that receives connection details.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reference to a `Provider` resource.
///
/// The namespace defaults to the namespace of the referencing resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderReference {
    /// Name of the referenced Provider
    pub name: String,

    /// Namespace of the referenced Provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ProviderReference {
    /// Create a reference in the same namespace as the referencing resource
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    /// Create a reference with an explicit namespace
    pub fn with_namespace(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }

    /// Namespace to look the Provider up in, falling back to `default_ns`
    pub fn namespace_or<'a>(&'a self, default_ns: &'a str) -> &'a str {
        self.namespace.as_deref().unwrap_or(default_ns)
    }
}

/// Reference to a Secret in the same namespace as the referencing resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocalSecretReference {
    /// Name of the Secret
    pub name: String,
}

/// Selects a key of a Secret.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeySelector {
    /// Name of the Secret
    pub name: String,

    /// Key within the Secret's data
    pub key: String,
}
