//! The capability set the lifecycle driver needs from a managed record.

use crds::{
    CloudsqlInstance, Condition, ConditionedStatus, LocalSecretReference, Network,
    ProviderReference, ReclaimPolicy, EXTERNAL_NAME_ANNOTATION,
};
use kube::core::NamespaceResourceScope;
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// A namespaced record that manages one external resource
pub trait ManagedResource:
    Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + Clone
    + Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Name of the resource in GCP.
    ///
    /// The external-name annotation wins, otherwise the object name is used.
    fn external_name(&self) -> String {
        self.meta()
            .annotations
            .as_ref()
            .and_then(|a| a.get(EXTERNAL_NAME_ANNOTATION))
            .filter(|n| !n.is_empty())
            .cloned()
            .unwrap_or_else(|| self.name_any())
    }

    /// Provider holding project and credentials
    fn provider_ref(&self) -> &ProviderReference;

    /// Secret receiving connection details, if any
    fn connection_secret_ref(&self) -> Option<&LocalSecretReference>;

    /// What happens to the external resource on deletion
    fn reclaim_policy(&self) -> ReclaimPolicy;

    /// Conditions, if a status exists
    fn conditioned_status(&self) -> Option<&ConditionedStatus>;

    /// Conditions, creating an empty status when missing
    fn conditioned_status_mut(&mut self) -> &mut ConditionedStatus;

    /// Merge patch body carrying the full status
    fn status_patch(&self) -> serde_json::Value;

    /// Set conditions, keeping transition times of unchanged ones
    fn set_conditions<I>(&mut self, conditions: I)
    where
        I: IntoIterator<Item = Condition>,
    {
        self.conditioned_status_mut().set_conditions(conditions);
    }

    /// Namespace of the record
    fn namespace_or_default(&self) -> String {
        self.namespace().unwrap_or_else(|| "default".to_string())
    }

    /// `namespace/name`, used for logging and backoff tracking
    fn key(&self) -> String {
        format!("{}/{}", self.namespace_or_default(), self.name_any())
    }
}

impl ManagedResource for CloudsqlInstance {
    fn provider_ref(&self) -> &ProviderReference {
        &self.spec.provider_ref
    }

    fn connection_secret_ref(&self) -> Option<&LocalSecretReference> {
        self.spec.write_connection_secret_to_ref.as_ref()
    }

    fn reclaim_policy(&self) -> ReclaimPolicy {
        self.spec.reclaim_policy
    }

    fn conditioned_status(&self) -> Option<&ConditionedStatus> {
        self.status.as_ref().map(|s| &s.conditioned_status)
    }

    fn conditioned_status_mut(&mut self) -> &mut ConditionedStatus {
        &mut self.status.get_or_insert_with(Default::default).conditioned_status
    }

    fn status_patch(&self) -> serde_json::Value {
        serde_json::json!({ "status": self.status })
    }
}

impl ManagedResource for Network {
    /// Networks are identified by their declared name
    fn external_name(&self) -> String {
        self.spec.for_provider.name.clone()
    }

    fn provider_ref(&self) -> &ProviderReference {
        &self.spec.provider_ref
    }

    fn connection_secret_ref(&self) -> Option<&LocalSecretReference> {
        self.spec.write_connection_secret_to_ref.as_ref()
    }

    fn reclaim_policy(&self) -> ReclaimPolicy {
        self.spec.reclaim_policy
    }

    fn conditioned_status(&self) -> Option<&ConditionedStatus> {
        self.status.as_ref().map(|s| &s.conditioned_status)
    }

    fn conditioned_status_mut(&mut self) -> &mut ConditionedStatus {
        &mut self.status.get_or_insert_with(Default::default).conditioned_status
    }

    fn status_patch(&self) -> serde_json::Value {
        serde_json::json!({ "status": self.status })
    }
}
