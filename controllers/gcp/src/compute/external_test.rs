//! Unit tests for VPC network lifecycle operations

#[cfg(test)]
mod tests {
    use crate::compute::{NetworkConnector, NetworkExternal};
    use crate::managed::*;
    use crate::test_utils::*;
    use crds::TYPE_READY;
    use gcp_client::MockGcpClient;
    use std::sync::Arc;

    const NS: &str = "default";

    fn external(mock: &MockGcpClient) -> NetworkExternal {
        NetworkExternal::new(Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn test_create_observe_cycle() {
        let mock = MockGcpClient::new(TEST_PROJECT);
        let client = external(&mock);
        let ctx = ReconcileContext::default();
        let mut record = create_test_network("vpc", NS, "main-vpc");

        let observation = client.observe(&ctx, &mut record).await.unwrap();
        assert!(!observation.resource_exists);

        client.create(&ctx, &record).await.unwrap();
        client.create(&ctx, &record).await.unwrap();

        let observation = client.observe(&ctx, &mut record).await.unwrap();
        assert!(observation.resource_exists);
        assert!(observation.resource_up_to_date);
        assert!(observation.spec_late_initialized);
        assert!(observation.connection_details.is_empty());

        let params = &record.spec.for_provider;
        assert_eq!(params.auto_create_subnetworks, Some(true));
        assert_eq!(
            params.routing_config.as_ref().and_then(|r| r.routing_mode.as_deref()),
            Some("REGIONAL")
        );
        let status = record.status.as_ref().expect("status set");
        assert!(status.at_provider.id.is_some());
        let ready = status.conditioned_status.get_condition(TYPE_READY).expect("ready condition");
        assert_eq!(ready.reason, "Available");
    }

    #[tokio::test]
    async fn test_update_routing_mode() {
        let mock = MockGcpClient::new(TEST_PROJECT);
        let client = external(&mock);
        let ctx = ReconcileContext::default();
        let mut record = create_test_network("vpc", NS, "main-vpc");
        client.create(&ctx, &record).await.unwrap();

        record.spec.for_provider.routing_config = Some(crds::NetworkRoutingConfig {
            routing_mode: Some("GLOBAL".to_string()),
        });
        let observation = client.observe(&ctx, &mut record).await.unwrap();
        assert!(!observation.resource_up_to_date);

        client.update(&ctx, &record).await.unwrap();

        let stored = mock.network("main-vpc").expect("network stored");
        assert_eq!(stored.routing_config.and_then(|r| r.routing_mode).as_deref(), Some("GLOBAL"));
        let observation = client.observe(&ctx, &mut record).await.unwrap();
        assert!(observation.resource_up_to_date);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let mock = MockGcpClient::new(TEST_PROJECT);
        let client = external(&mock);
        let ctx = ReconcileContext::default();
        let record = create_test_network("vpc", NS, "main-vpc");
        client.create(&ctx, &record).await.unwrap();

        client.delete(&ctx, &record).await.unwrap();
        client.delete(&ctx, &record).await.unwrap();
        assert!(mock.network("main-vpc").is_none());

        mock.fail_on("delete_network", 500, "backend error");
        let err = client.delete(&ctx, &record).await.unwrap_err();
        assert!(matches!(err, ManagedError::Delete(_)));
    }

    #[tokio::test]
    async fn test_observe_and_patch_failures() {
        let mock = MockGcpClient::new(TEST_PROJECT);
        let client = external(&mock);
        let ctx = ReconcileContext::default();
        let mut record = create_test_network("vpc", NS, "main-vpc");

        mock.fail_on("get_network", 403, "permission denied");
        let err = client.observe(&ctx, &mut record).await.unwrap_err();
        assert!(matches!(err, ManagedError::Observe(_)));

        mock.fail_on("patch_network", 500, "backend error");
        let failure = client.update(&ctx, &record).await.unwrap_err();
        assert!(matches!(failure.error, ManagedError::Patch(_)));
        assert!(failure.connection_details.is_empty());
    }

    #[tokio::test]
    async fn test_connect_requires_name() {
        let store = InMemoryStore::new();
        seed_provider(&store, NS);
        let connector = NetworkConnector::new(Arc::new(store), Arc::new(MockClientFactory::new()));
        let ctx = ReconcileContext::default();

        let record = create_test_network("vpc", NS, "");
        let err = connector.connect(&ctx, &record).await.err().expect("empty name rejected");
        assert!(matches!(err, ManagedError::NameNotGiven));
        assert_eq!(err.to_string(), "name not given");

        let record = create_test_network("vpc", NS, "main-vpc");
        assert!(connector.connect(&ctx, &record).await.is_ok());
    }
}
