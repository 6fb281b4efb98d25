//! Translation between CloudsqlInstance records and Cloud SQL Admin models,
//! late-initialization of unset spec fields, and drift detection.

use crate::managed::compare::desired_matches_observed;
use crds::{CloudsqlInstanceObservation, CloudsqlInstanceParameters};
use gcp_client as api;

/// Observed state recorded in `status.atProvider`
pub fn generate_observation(instance: &api::DatabaseInstance) -> CloudsqlInstanceObservation {
    CloudsqlInstanceObservation {
        state: instance.state.clone().unwrap_or_default(),
        backend_type: instance.backend_type.clone(),
        connection_name: instance.connection_name.clone(),
        current_disk_size: instance.current_disk_size,
        gce_zone: instance.gce_zone.clone(),
        ip_addresses: instance
            .ip_addresses
            .iter()
            .map(|ip| crds::IpMapping {
                ip_address: ip.ip_address.clone(),
                ip_type: ip.ip_type.clone(),
                time_to_retire: ip.time_to_retire.clone(),
            })
            .collect(),
        ipv6_address: instance.ipv6_address.clone(),
        project: instance.project.clone(),
        self_link: instance.self_link.clone(),
        service_account_email_address: instance.service_account_email_address.clone(),
        settings_version: instance.settings.as_ref().and_then(|s| s.settings_version),
    }
}

/// Instance payload described by the spec, named `name`
pub fn generate_database_instance(name: &str, params: &CloudsqlInstanceParameters) -> api::DatabaseInstance {
    api::DatabaseInstance {
        name: name.to_string(),
        region: Some(params.region.clone()).filter(|r| !r.is_empty()),
        database_version: params.database_version.clone(),
        master_instance_name: params.master_instance_name.clone(),
        gce_zone: params.gce_zone.clone(),
        instance_type: params.instance_type.clone(),
        settings: Some(generate_settings(&params.settings)),
        ..Default::default()
    }
}

/// Patch payload: the spec plus the observed settings version
pub fn generate_update(
    name: &str,
    params: &CloudsqlInstanceParameters,
    observation: Option<&CloudsqlInstanceObservation>,
) -> api::DatabaseInstance {
    let mut instance = generate_database_instance(name, params);
    if let Some(settings) = instance.settings.as_mut() {
        settings.settings_version = observation.and_then(|o| o.settings_version);
    }
    instance
}

fn generate_settings(s: &crds::Settings) -> api::Settings {
    api::Settings {
        tier: s.tier.clone(),
        activation_policy: s.activation_policy.clone(),
        authorized_gae_applications: s.authorized_gae_applications.clone(),
        availability_type: s.availability_type.clone(),
        crash_safe_replication_enabled: s.crash_safe_replication_enabled,
        storage_auto_resize: s.storage_auto_resize,
        data_disk_type: s.data_disk_type.clone(),
        pricing_plan: s.pricing_plan.clone(),
        replication_type: s.replication_type.clone(),
        user_labels: s.user_labels.clone(),
        database_flags: s.database_flags.as_ref().map(|flags| {
            flags
                .iter()
                .map(|f| api::DatabaseFlags {
                    name: f.name.clone(),
                    value: f.value.clone(),
                })
                .collect()
        }),
        backup_configuration: s.backup_configuration.as_ref().map(|b| api::BackupConfiguration {
            enabled: b.enabled,
            binary_log_enabled: b.binary_log_enabled,
            start_time: b.start_time.clone(),
            location: b.location.clone(),
        }),
        ip_configuration: s.ip_configuration.as_ref().map(|c| api::IpConfiguration {
            ipv4_enabled: c.ipv4_enabled,
            private_network: c.private_network.clone(),
            require_ssl: c.require_ssl,
            authorized_networks: c.authorized_networks.as_ref().map(|nets| {
                nets.iter()
                    .map(|n| api::AclEntry {
                        name: n.name.clone(),
                        value: n.value.clone(),
                        expiration_time: n.expiration_time.clone(),
                    })
                    .collect()
            }),
        }),
        location_preference: s.location_preference.as_ref().map(|l| api::LocationPreference {
            zone: l.zone.clone(),
            follow_gae_application: l.follow_gae_application.clone(),
        }),
        maintenance_window: s.maintenance_window.as_ref().map(|m| api::MaintenanceWindow {
            day: m.day,
            hour: m.hour,
            update_track: m.update_track.clone(),
        }),
        data_disk_size_gb: s.data_disk_size_gb,
        storage_auto_resize_limit: s.storage_auto_resize_limit,
        settings_version: None,
    }
}

fn late_init<T: Clone>(field: &mut Option<T>, observed: &Option<T>) {
    if field.is_none() {
        field.clone_from(observed);
    }
}

fn late_init_string(field: &mut String, observed: &Option<String>) {
    if field.is_empty() {
        if let Some(value) = observed {
            field.clone_from(value);
        }
    }
}

/// Fill spec fields the user left unset from the observed instance.
///
/// Set fields are never touched. Returns whether the spec changed.
pub fn late_initialize(params: &mut CloudsqlInstanceParameters, observed: &api::DatabaseInstance) -> bool {
    let before = params.clone();

    late_init_string(&mut params.region, &observed.region);
    late_init(&mut params.database_version, &observed.database_version);
    late_init(&mut params.master_instance_name, &observed.master_instance_name);
    late_init(&mut params.gce_zone, &observed.gce_zone);
    late_init(&mut params.instance_type, &observed.instance_type);
    if let Some(settings) = &observed.settings {
        late_initialize_settings(&mut params.settings, settings);
    }

    *params != before
}

fn late_initialize_settings(s: &mut crds::Settings, o: &api::Settings) {
    if s.tier.is_empty() {
        s.tier.clone_from(&o.tier);
    }
    late_init(&mut s.activation_policy, &o.activation_policy);
    late_init(&mut s.authorized_gae_applications, &o.authorized_gae_applications);
    late_init(&mut s.availability_type, &o.availability_type);
    late_init(&mut s.crash_safe_replication_enabled, &o.crash_safe_replication_enabled);
    late_init(&mut s.storage_auto_resize, &o.storage_auto_resize);
    late_init(&mut s.data_disk_type, &o.data_disk_type);
    late_init(&mut s.pricing_plan, &o.pricing_plan);
    late_init(&mut s.replication_type, &o.replication_type);
    late_init(&mut s.user_labels, &o.user_labels);
    late_init(&mut s.data_disk_size_gb, &o.data_disk_size_gb);
    late_init(&mut s.storage_auto_resize_limit, &o.storage_auto_resize_limit);

    if s.database_flags.is_none() {
        s.database_flags = o.database_flags.as_ref().map(|flags| {
            flags
                .iter()
                .map(|f| crds::DatabaseFlags {
                    name: f.name.clone(),
                    value: f.value.clone(),
                })
                .collect()
        });
    }

    if let Some(ob) = &o.backup_configuration {
        let sb = s.backup_configuration.get_or_insert_with(Default::default);
        late_init(&mut sb.enabled, &ob.enabled);
        late_init(&mut sb.binary_log_enabled, &ob.binary_log_enabled);
        late_init(&mut sb.start_time, &ob.start_time);
        late_init(&mut sb.location, &ob.location);
    }

    if let Some(oc) = &o.ip_configuration {
        let sc = s.ip_configuration.get_or_insert_with(Default::default);
        late_init(&mut sc.ipv4_enabled, &oc.ipv4_enabled);
        late_init(&mut sc.private_network, &oc.private_network);
        late_init(&mut sc.require_ssl, &oc.require_ssl);
        if sc.authorized_networks.is_none() {
            sc.authorized_networks = oc.authorized_networks.as_ref().map(|nets| {
                nets.iter()
                    .map(|n| crds::AclEntry {
                        name: n.name.clone(),
                        value: n.value.clone(),
                        expiration_time: n.expiration_time.clone(),
                    })
                    .collect()
            });
        }
    }

    if let Some(ol) = &o.location_preference {
        let sl = s.location_preference.get_or_insert_with(Default::default);
        late_init(&mut sl.zone, &ol.zone);
        late_init(&mut sl.follow_gae_application, &ol.follow_gae_application);
    }

    if let Some(om) = &o.maintenance_window {
        let sm = s.maintenance_window.get_or_insert_with(Default::default);
        late_init(&mut sm.day, &om.day);
        late_init(&mut sm.hour, &om.hour);
        late_init(&mut sm.update_track, &om.update_track);
    }
}

/// Whether every field set in the spec matches the observed instance
pub fn is_up_to_date(name: &str, params: &CloudsqlInstanceParameters, observed: &api::DatabaseInstance) -> bool {
    desired_matches_observed(&generate_database_instance(name, params), observed)
}
