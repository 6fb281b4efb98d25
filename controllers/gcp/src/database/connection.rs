//! Connection details and root password rotation for Cloud SQL instances.

use crate::managed::{
    ConnectionDetails, ManagedError, ReconcileContext, ENDPOINT_KEY, PASSWORD_KEY, USERNAME_KEY,
};
use crds::{CloudsqlInstance, PRIVATE_IP_KEY, PRIVATE_IP_TYPE, PUBLIC_IP_KEY, PUBLIC_IP_TYPE};
use gcp_client::{SqlAdminApi, User};
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::info;

/// Build the details consumers need to reach the instance.
///
/// A private address always takes the endpoint; a public address only
/// takes it when no private address is reported.
pub fn build_connection_details(record: &CloudsqlInstance, password: Option<Vec<u8>>) -> ConnectionDetails {
    let mut details = ConnectionDetails::new();
    details.insert(USERNAME_KEY.to_string(), record.database_user_name().as_bytes().to_vec());

    if let Some(password) = password.filter(|p| !p.is_empty()) {
        details.insert(PASSWORD_KEY.to_string(), password);
    }

    let addresses = record.status.iter().flat_map(|s| s.at_provider.ip_addresses.iter());
    for ip in addresses {
        let address = ip.ip_address.as_bytes().to_vec();
        match ip.ip_type.as_str() {
            PRIVATE_IP_TYPE => {
                details.insert(PRIVATE_IP_KEY.to_string(), address.clone());
                details.insert(ENDPOINT_KEY.to_string(), address);
            }
            PUBLIC_IP_TYPE => {
                details.insert(PUBLIC_IP_KEY.to_string(), address.clone());
                details.entry(ENDPOINT_KEY.to_string()).or_insert(address);
            }
            _ => {}
        }
    }

    details
}

/// Random alphanumeric password of `length` characters
pub fn generate_password(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

fn credential_update(err: impl std::error::Error + Send + Sync + 'static) -> ManagedError {
    ManagedError::CredentialUpdate(Box::new(err))
}

/// Set the root user's password on the instance.
///
/// A persisted password is reused byte for byte; otherwise a new one of
/// `password_length` characters is generated. Either way it is pushed to
/// the provider once and returned in the details.
pub async fn rotate_root_password(
    ctx: &ReconcileContext,
    sql: &dyn SqlAdminApi,
    record: &CloudsqlInstance,
    instance_name: &str,
    persisted: Option<Vec<u8>>,
    password_length: usize,
) -> Result<ConnectionDetails, ManagedError> {
    let username = record.database_user_name();

    let users = ctx.run(sql.list_users(instance_name)).await?.map_err(credential_update)?;
    let user = users
        .into_iter()
        .find(|u| u.name == username)
        .ok_or_else(|| credential_update(ManagedError::UserNotFound(username.to_string())))?;

    let password = match persisted.filter(|p| !p.is_empty()) {
        Some(bytes) => String::from_utf8(bytes).map_err(credential_update)?,
        None => {
            info!("Generating root password for instance {}", instance_name);
            generate_password(password_length)
        }
    };

    let host = user.host.clone().unwrap_or_default();
    let update = User {
        password: Some(password.clone()),
        ..user
    };
    ctx.run(sql.update_user(instance_name, username, &host, &update))
        .await?
        .map_err(credential_update)?;

    let mut details = ConnectionDetails::new();
    details.insert(USERNAME_KEY.to_string(), username.as_bytes().to_vec());
    details.insert(PASSWORD_KEY.to_string(), password.into_bytes());
    Ok(details)
}
