//! Unit tests for the managed reconciliation driver

#[cfg(test)]
mod tests {
    use crate::database::CloudsqlConnector;
    use crate::managed::*;
    use crate::reconciler::{ManagedReconciler, RecordWriter, FINALIZER};
    use crate::test_utils::*;
    use crds::{CloudsqlInstance, ReclaimPolicy, TYPE_READY, TYPE_SYNCED};
    use kube::ResourceExt;
    use kube_runtime::controller::Action;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    const NS: &str = "default";
    const DB: &str = "prod-db";
    const POLL: Duration = Duration::from_secs(60);

    /// Writer recording every write in memory
    #[derive(Default)]
    struct RecordingWriter {
        added: Mutex<Vec<String>>,
        removed: Mutex<Vec<String>>,
        specs: Mutex<Vec<CloudsqlInstance>>,
        statuses: Mutex<Vec<CloudsqlInstance>>,
    }

    impl RecordingWriter {
        fn last_status(&self) -> CloudsqlInstance {
            self.statuses.lock().unwrap().last().cloned().expect("status written")
        }
    }

    #[async_trait::async_trait]
    impl RecordWriter<CloudsqlInstance> for RecordingWriter {
        async fn add_finalizer(&self, record: &CloudsqlInstance, finalizer: &str) -> Result<CloudsqlInstance, kube::Error> {
            self.added.lock().unwrap().push(finalizer.to_string());
            let mut stored = record.clone();
            stored.metadata.resource_version = Some("2".to_string());
            Ok(stored)
        }

        async fn remove_finalizer(&self, _record: &CloudsqlInstance, finalizer: &str) -> Result<(), kube::Error> {
            self.removed.lock().unwrap().push(finalizer.to_string());
            Ok(())
        }

        async fn update_spec(&self, record: &CloudsqlInstance) -> Result<CloudsqlInstance, kube::Error> {
            self.specs.lock().unwrap().push(record.clone());
            Ok(record.clone())
        }

        async fn update_status(&self, record: &CloudsqlInstance) -> Result<(), kube::Error> {
            self.statuses.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct Fixture {
        factory: MockClientFactory,
        store: InMemoryStore,
        writer: Arc<RecordingWriter>,
        reconciler: ManagedReconciler<CloudsqlInstance>,
    }

    fn fixture() -> Fixture {
        let factory = MockClientFactory::new();
        let store = InMemoryStore::new();
        seed_provider(&store, NS);
        let writer = Arc::new(RecordingWriter::default());
        let connector = CloudsqlConnector::new(Arc::new(store.clone()), Arc::new(factory.clone()), 20);
        let reconciler = ManagedReconciler::new(
            Arc::new(connector),
            writer.clone(),
            Arc::new(store.clone()),
            POLL,
            CancellationToken::new(),
        );
        Fixture {
            factory,
            store,
            writer,
            reconciler,
        }
    }

    fn with_finalizer(mut record: CloudsqlInstance) -> CloudsqlInstance {
        record.metadata.finalizers = Some(vec![FINALIZER.to_string()]);
        record
    }

    fn deleted(mut record: CloudsqlInstance) -> CloudsqlInstance {
        record.metadata.deletion_timestamp =
            Some(serde_json::from_value(serde_json::json!("2026-01-01T00:00:00Z")).unwrap());
        with_finalizer(record)
    }

    fn condition(record: &CloudsqlInstance, condition_type: &str) -> Option<(String, Option<String>)> {
        record
            .conditioned_status()
            .and_then(|s| s.get_condition(condition_type))
            .map(|c| (c.reason.clone(), c.message.clone()))
    }

    #[tokio::test]
    async fn test_new_record_creates_instance() {
        let f = fixture();
        let record = create_test_cloudsql_instance(DB, NS);

        let action = f.reconciler.reconcile(&record).await.unwrap();

        assert_eq!(action, Action::requeue(POLL));
        assert_eq!(*f.writer.added.lock().unwrap(), vec![FINALIZER.to_string()]);
        assert_eq!(f.factory.mock.call_count("insert_instance"), 1);
        let status = f.writer.last_status();
        assert_eq!(condition(&status, TYPE_READY).map(|c| c.0).as_deref(), Some("Creating"));
        assert_eq!(condition(&status, TYPE_SYNCED).map(|c| c.0).as_deref(), Some("ReconcileSuccess"));
    }

    #[tokio::test]
    async fn test_runnable_instance_publishes_details() {
        let f = fixture();
        f.factory
            .mock
            .add_instance(api_instance(DB, "RUNNABLE", &[("1.2.3.4", "PRIMARY")]));
        f.store.add_secret(NS, TEST_CONNECTION_SECRET, &[(PASSWORD_KEY, b"secretpw")]);
        let record = with_finalizer(create_test_cloudsql_instance(DB, NS));

        f.reconciler.reconcile(&record).await.unwrap();

        assert!(f.writer.added.lock().unwrap().is_empty());
        assert!(f.factory.mock.user_updates().is_empty());
        let data = f.store.secret_data(NS, TEST_CONNECTION_SECRET).expect("secret written");
        assert_eq!(data.get(USERNAME_KEY).map(Vec::as_slice), Some(&b"root"[..]));
        assert_eq!(data.get(PASSWORD_KEY).map(Vec::as_slice), Some(&b"secretpw"[..]));
        assert_eq!(data.get(ENDPOINT_KEY).map(Vec::as_slice), Some(&b"1.2.3.4"[..]));
        // The secret existed before this pass, so its owners are left alone
        assert!(f.store.secret_owner(NS, TEST_CONNECTION_SECRET).is_none());

        let status = f.writer.last_status();
        assert_eq!(condition(&status, TYPE_READY).map(|c| c.0).as_deref(), Some("Available"));
        assert_eq!(status.status.as_ref().unwrap().at_provider.state, "RUNNABLE");
    }

    #[tokio::test]
    async fn test_first_pass_issues_password_once() {
        let f = fixture();
        f.factory.mock.add_instance(api_instance(DB, "RUNNABLE", &[]));
        let record = with_finalizer(create_test_cloudsql_instance(DB, NS));

        f.reconciler.reconcile(&record).await.unwrap();
        let data = f.store.secret_data(NS, TEST_CONNECTION_SECRET).expect("secret written");
        let password = data.get(PASSWORD_KEY).cloned().expect("password published");
        assert_eq!(password.len(), 20);
        assert_eq!(f.factory.mock.user_updates().len(), 1);
        let owner = f.store.secret_owner(NS, TEST_CONNECTION_SECRET).expect("owner set on create");
        assert_eq!(owner.kind, "CloudsqlInstance");
        assert_eq!(owner.name, DB);
        assert_eq!(owner.controller, Some(true));

        // The published password is now persisted; the next pass changes nothing.
        f.reconciler.reconcile(&record).await.unwrap();
        assert_eq!(f.factory.mock.user_updates().len(), 1);
        let data = f.store.secret_data(NS, TEST_CONNECTION_SECRET).expect("secret kept");
        assert_eq!(data.get(PASSWORD_KEY), Some(&password));
    }

    #[tokio::test]
    async fn test_password_survives_failing_patch() {
        let f = fixture();
        f.factory.mock.add_instance(api_instance(DB, "RUNNABLE", &[]));
        f.factory.mock.fail_on("patch_instance", 400, "invalid tier");
        let mut record = with_finalizer(create_test_cloudsql_instance(DB, NS));
        record.spec.for_provider.settings.tier = "db-n1-standard-2".to_string();

        let err = f.reconciler.reconcile(&record).await.unwrap_err();
        assert!(err.to_string().starts_with("cannot update external resource: "));
        let data = f.store.secret_data(NS, TEST_CONNECTION_SECRET).expect("secret written");
        let password = data.get(PASSWORD_KEY).cloned().expect("rotated password published");

        f.reconciler.reconcile(&record).await.unwrap_err();
        let updates = f.factory.mock.user_updates();
        assert_eq!(updates.len(), 2);
        for update in &updates {
            assert_eq!(update.user.password.as_deref().map(str::as_bytes), Some(password.as_slice()));
        }
        let data = f.store.secret_data(NS, TEST_CONNECTION_SECRET).expect("secret kept");
        assert_eq!(data.get(PASSWORD_KEY), Some(&password));
    }

    #[tokio::test]
    async fn test_late_initialized_spec_is_written_back() {
        let f = fixture();
        let mut instance = api_instance(DB, "RUNNABLE", &[]);
        instance.gce_zone = Some("us-central1-f".to_string());
        f.factory.mock.add_instance(instance);
        f.store.add_secret(NS, TEST_CONNECTION_SECRET, &[(PASSWORD_KEY, b"pw")]);
        let record = with_finalizer(create_test_cloudsql_instance(DB, NS));

        f.reconciler.reconcile(&record).await.unwrap();

        let specs = f.writer.specs.lock().unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].spec.for_provider.gce_zone.as_deref(), Some("us-central1-f"));
        assert_eq!(specs[0].spec.for_provider.settings.tier, TEST_TIER);
    }

    #[tokio::test]
    async fn test_spec_write_back_uses_version_after_finalizer() {
        let f = fixture();
        let mut instance = api_instance(DB, "RUNNABLE", &[]);
        instance.gce_zone = Some("us-central1-f".to_string());
        f.factory.mock.add_instance(instance);
        f.store.add_secret(NS, TEST_CONNECTION_SECRET, &[(PASSWORD_KEY, b"pw")]);
        let mut record = create_test_cloudsql_instance(DB, NS);
        record.metadata.resource_version = Some("1".to_string());

        f.reconciler.reconcile(&record).await.unwrap();

        let specs = f.writer.specs.lock().unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].metadata.resource_version.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_failure_sets_synced_error_and_backs_off() {
        let f = fixture();
        f.factory.mock.fail_on("get_instance", 500, "backend error");
        let record = with_finalizer(create_test_cloudsql_instance(DB, NS));

        let err = f.reconciler.reconcile(&record).await.unwrap_err();

        assert!(err.to_string().starts_with("cannot observe external resource: "));
        let (reason, message) = condition(&f.writer.last_status(), TYPE_SYNCED).expect("synced condition");
        assert_eq!(reason, "ReconcileError");
        assert!(message.unwrap_or_default().starts_with("cannot observe external resource: "));

        let delays: Vec<u64> = (0..3).map(|_| f.reconciler.error_backoff(&record).as_secs()).collect();
        assert_eq!(delays, vec![60, 60, 120]);

        f.factory.mock.clear_failure("get_instance");
        f.reconciler.reconcile(&record).await.unwrap();
        assert_eq!(f.reconciler.error_backoff(&record), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_missing_provider_is_reported() {
        let f = fixture();
        let mut record = with_finalizer(create_test_cloudsql_instance(DB, NS));
        record.spec.provider_ref = crds::ProviderReference::new("missing");

        let err = f.reconciler.reconcile(&record).await.unwrap_err();
        assert!(err.to_string().starts_with("cannot get provider: "));
        assert!(f.factory.mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_waits_for_external_resource() {
        let f = fixture();
        f.factory.mock.add_instance(api_instance(DB, "RUNNABLE", &[]));
        let record = deleted(create_test_cloudsql_instance(DB, NS));

        let action = f.reconciler.reconcile(&record).await.unwrap();
        assert_eq!(action, Action::requeue(Duration::from_secs(15)));
        assert_eq!(f.factory.mock.call_count("delete_instance"), 1);
        assert!(f.writer.removed.lock().unwrap().is_empty());
        let status = f.writer.last_status();
        assert_eq!(condition(&status, TYPE_READY).map(|c| c.0).as_deref(), Some("Deleting"));

        let action = f.reconciler.reconcile(&record).await.unwrap();
        assert_eq!(action, Action::await_change());
        assert_eq!(*f.writer.removed.lock().unwrap(), vec![FINALIZER.to_string()]);
    }

    #[tokio::test]
    async fn test_retain_policy_keeps_external_resource() {
        let f = fixture();
        f.factory.mock.add_instance(api_instance(DB, "RUNNABLE", &[]));
        let mut record = deleted(create_test_cloudsql_instance(DB, NS));
        record.spec.reclaim_policy = ReclaimPolicy::Retain;

        let action = f.reconciler.reconcile(&record).await.unwrap();

        assert_eq!(action, Action::await_change());
        assert!(f.factory.mock.calls().is_empty());
        assert!(f.factory.mock.instance(DB).is_some());
        assert_eq!(*f.writer.removed.lock().unwrap(), vec![FINALIZER.to_string()]);
    }

    #[tokio::test]
    async fn test_deleted_record_without_finalizer_is_ignored() {
        let f = fixture();
        let mut record = deleted(create_test_cloudsql_instance(DB, NS));
        record.metadata.finalizers = None;
        assert!(record.finalizers().is_empty());

        let action = f.reconciler.reconcile(&record).await.unwrap();

        assert_eq!(action, Action::await_change());
        assert!(f.factory.mock.calls().is_empty());
        assert!(f.writer.removed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_cancels_reconcile() {
        let factory = MockClientFactory::new();
        let store = InMemoryStore::new();
        seed_provider(&store, NS);
        let shutdown = CancellationToken::new();
        let reconciler = ManagedReconciler::new(
            Arc::new(CloudsqlConnector::new(Arc::new(store.clone()), Arc::new(factory.clone()), 20)),
            Arc::new(RecordingWriter::default()),
            Arc::new(store),
            POLL,
            shutdown.clone(),
        );
        shutdown.cancel();

        let record = with_finalizer(create_test_cloudsql_instance(DB, NS));
        let err = reconciler.reconcile(&record).await.unwrap_err();

        assert_eq!(err.to_string(), "operation cancelled");
        assert!(factory.mock.calls().is_empty());
    }
}
