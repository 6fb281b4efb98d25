//! Translation between Network records and Compute API models.

use crate::managed::compare::desired_matches_observed;
use crds::{NetworkObservation, NetworkParameters};
use gcp_client as api;

fn routing_config(config: &crds::NetworkRoutingConfig) -> api::NetworkRoutingConfig {
    api::NetworkRoutingConfig {
        routing_mode: config.routing_mode.clone(),
    }
}

/// Network payload described by the spec
pub fn generate_network(params: &NetworkParameters) -> api::Network {
    api::Network {
        name: params.name.clone(),
        description: params.description.clone(),
        auto_create_subnetworks: params.auto_create_subnetworks,
        ipv4_range: params.ipv4_range.clone(),
        routing_config: params.routing_config.as_ref().map(routing_config),
        ..Default::default()
    }
}

/// Patch payload; only the description and routing mode are mutable
pub fn generate_update(params: &NetworkParameters) -> api::Network {
    api::Network {
        name: params.name.clone(),
        description: params.description.clone(),
        routing_config: params.routing_config.as_ref().map(routing_config),
        ..Default::default()
    }
}

/// Observed state recorded in `status.atProvider`
pub fn generate_observation(network: &api::Network) -> NetworkObservation {
    NetworkObservation {
        id: network.id,
        creation_timestamp: network.creation_timestamp.clone(),
        gateway_ipv4: network.gateway_ipv4.clone(),
        self_link: network.self_link.clone(),
        subnetworks: network.subnetworks.clone(),
        peerings: network
            .peerings
            .iter()
            .map(|p| crds::NetworkPeering {
                name: p.name.clone(),
                network: p.network.clone(),
                state: p.state.clone(),
                state_details: p.state_details.clone(),
                auto_create_routes: p.auto_create_routes,
                exchange_subnet_routes: p.exchange_subnet_routes,
            })
            .collect(),
    }
}

/// Fill `autoCreateSubnetworks` and `routingConfig` when unset
pub fn late_initialize(params: &mut NetworkParameters, observed: &api::Network) -> bool {
    let mut changed = false;
    if params.auto_create_subnetworks.is_none() && observed.auto_create_subnetworks.is_some() {
        params.auto_create_subnetworks = observed.auto_create_subnetworks;
        changed = true;
    }
    let observed_mode = observed.routing_config.as_ref().and_then(|r| r.routing_mode.as_ref());
    let declared_mode = params.routing_config.as_ref().and_then(|r| r.routing_mode.as_ref());
    if let (Some(mode), None) = (observed_mode, declared_mode) {
        params.routing_config.get_or_insert_with(Default::default).routing_mode = Some(mode.clone());
        changed = true;
    }
    changed
}

/// Whether the user-set description and routing config match
pub fn is_up_to_date(params: &NetworkParameters, observed: &api::Network) -> bool {
    desired_matches_observed(&generate_update(params), observed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observed() -> api::Network {
        api::Network {
            name: "vpc".to_string(),
            auto_create_subnetworks: Some(false),
            routing_config: Some(api::NetworkRoutingConfig {
                routing_mode: Some("GLOBAL".to_string()),
            }),
            id: Some(8675309),
            self_link: Some("https://www.googleapis.com/compute/v1/projects/p/global/networks/vpc".to_string()),
            subnetworks: vec!["subnet-a".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_late_init_fills_unset_fields() {
        let mut params = NetworkParameters {
            name: "vpc".to_string(),
            ..Default::default()
        };
        assert!(late_initialize(&mut params, &observed()));
        assert_eq!(params.auto_create_subnetworks, Some(false));
        assert_eq!(
            params.routing_config.and_then(|r| r.routing_mode).as_deref(),
            Some("GLOBAL")
        );
    }

    #[test]
    fn test_late_init_keeps_user_values() {
        let mut params = NetworkParameters {
            name: "vpc".to_string(),
            auto_create_subnetworks: Some(true),
            routing_config: Some(crds::NetworkRoutingConfig {
                routing_mode: Some("REGIONAL".to_string()),
            }),
            ..Default::default()
        };
        assert!(!late_initialize(&mut params, &observed()));
        assert_eq!(params.auto_create_subnetworks, Some(true));
        assert!(!is_up_to_date(&params, &observed()));
    }

    #[test]
    fn test_late_init_without_observed_routing_mode_leaves_spec_alone() {
        let mut params = NetworkParameters {
            name: "vpc".to_string(),
            auto_create_subnetworks: Some(false),
            ..Default::default()
        };
        let mut network = observed();
        network.routing_config = Some(api::NetworkRoutingConfig::default());

        assert!(!late_initialize(&mut params, &network));
        assert!(params.routing_config.is_none());
    }

    #[test]
    fn test_description_drift() {
        let mut params = NetworkParameters {
            name: "vpc".to_string(),
            ..Default::default()
        };
        assert!(is_up_to_date(&params, &observed()));

        params.description = Some("main network".to_string());
        assert!(!is_up_to_date(&params, &observed()));
    }

    #[test]
    fn test_observation_copies_output_fields() {
        let observation = generate_observation(&observed());
        assert_eq!(observation.id, Some(8675309));
        assert_eq!(observation.subnetworks, vec!["subnet-a".to_string()]);
        assert!(observation.self_link.is_some());
    }
}
