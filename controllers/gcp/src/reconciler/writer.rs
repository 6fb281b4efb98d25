//! Writes the driver makes to the managed record itself.

use crate::managed::ManagedResource;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, ResourceExt};
use std::marker::PhantomData;

/// Field manager used for every patch this controller sends
pub const FIELD_MANAGER: &str = "gcp-controller";

/// Persists finalizers, spec write-backs and status
#[async_trait::async_trait]
pub trait RecordWriter<R: ManagedResource>: Send + Sync {
    /// Add `finalizer` to the record, returning the stored copy
    async fn add_finalizer(&self, record: &R, finalizer: &str) -> Result<R, kube::Error>;

    /// Remove `finalizer` from the record
    async fn remove_finalizer(&self, record: &R, finalizer: &str) -> Result<(), kube::Error>;

    /// Write the record's spec back, returning the stored copy.
    ///
    /// Fails with a conflict when the stored record changed since `record`
    /// was read.
    async fn update_spec(&self, record: &R) -> Result<R, kube::Error>;

    /// Merge-patch the record's status subresource
    async fn update_status(&self, record: &R) -> Result<(), kube::Error>;
}

/// Writer backed by the Kubernetes API server
pub struct KubeRecordWriter<R> {
    client: Client,
    _kind: PhantomData<fn() -> R>,
}

impl<R> std::fmt::Debug for KubeRecordWriter<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeRecordWriter").finish_non_exhaustive()
    }
}

impl<R> KubeRecordWriter<R> {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }
}

impl<R: ManagedResource> KubeRecordWriter<R> {
    fn api(&self, record: &R) -> Api<R> {
        Api::namespaced(self.client.clone(), &record.namespace_or_default())
    }

    async fn patch_finalizers(&self, record: &R, finalizers: Vec<String>) -> Result<R, kube::Error> {
        let patch = serde_json::json!({
            "metadata": {
                "finalizers": finalizers
            }
        });
        self.api(record)
            .patch(&record.name_any(), &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(&patch))
            .await
    }
}

/// Merge patch replacing the spec, guarded by the record's resourceVersion
pub fn spec_patch<R: ManagedResource>(record: &R) -> Result<serde_json::Value, kube::Error> {
    let value = serde_json::to_value(record).map_err(kube::Error::SerdeError)?;
    Ok(serde_json::json!({
        "metadata": { "resourceVersion": record.resource_version() },
        "spec": value.get("spec"),
    }))
}

#[async_trait::async_trait]
impl<R: ManagedResource> RecordWriter<R> for KubeRecordWriter<R> {
    async fn add_finalizer(&self, record: &R, finalizer: &str) -> Result<R, kube::Error> {
        // Read the current finalizers so ones added by others survive the patch.
        let current = self.api(record).get(&record.name_any()).await?;
        let mut finalizers = current.finalizers().to_vec();
        if finalizers.iter().any(|f| f == finalizer) {
            return Ok(current);
        }
        finalizers.push(finalizer.to_string());
        self.patch_finalizers(record, finalizers).await
    }

    async fn remove_finalizer(&self, record: &R, finalizer: &str) -> Result<(), kube::Error> {
        let current = match self.api(record).get_opt(&record.name_any()).await? {
            Some(current) => current,
            None => return Ok(()),
        };
        let finalizers: Vec<String> = current
            .finalizers()
            .iter()
            .filter(|f| *f != finalizer)
            .cloned()
            .collect();
        self.patch_finalizers(record, finalizers).await?;
        Ok(())
    }

    async fn update_spec(&self, record: &R) -> Result<R, kube::Error> {
        let patch = spec_patch(record)?;
        self.api(record)
            .patch(&record.name_any(), &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(&patch))
            .await
    }

    async fn update_status(&self, record: &R) -> Result<(), kube::Error> {
        self.api(record)
            .patch_status(
                &record.name_any(),
                &PatchParams::apply(FIELD_MANAGER),
                &Patch::Merge(&record.status_patch()),
            )
            .await?;
        Ok(())
    }
}
