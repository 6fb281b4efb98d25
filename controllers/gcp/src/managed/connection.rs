//! Connection details published for consumers of a managed resource.

use k8s_openapi::api::core::v1::Secret;
use std::collections::BTreeMap;

/// Key holding the user name
pub const USERNAME_KEY: &str = "username";
/// Key holding the password
pub const PASSWORD_KEY: &str = "password";
/// Key holding the address consumers should connect to
pub const ENDPOINT_KEY: &str = "endpoint";

/// Connection details keyed by well-known names.
///
/// Written into the record's connection Secret with merge semantics, so keys
/// not produced by a pass keep their persisted values.
pub type ConnectionDetails = BTreeMap<String, Vec<u8>>;

/// Value of `key` in a Secret, looking at `data` before `stringData`
pub fn secret_value(secret: &Secret, key: &str) -> Option<Vec<u8>> {
    if let Some(value) = secret.data.as_ref().and_then(|d| d.get(key)) {
        return Some(value.0.clone());
    }
    secret
        .string_data
        .as_ref()
        .and_then(|d| d.get(key))
        .map(|s| s.as_bytes().to_vec())
}

/// Persisted password, if present and non-empty
pub fn persisted_password(secret: Option<&Secret>) -> Option<Vec<u8>> {
    secret
        .and_then(|s| secret_value(s, PASSWORD_KEY))
        .filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::ByteString;

    fn secret(data: &[(&str, &[u8])]) -> Secret {
        Secret {
            data: Some(
                data.iter()
                    .map(|(k, v)| (k.to_string(), ByteString(v.to_vec())))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn test_persisted_password() {
        assert_eq!(
            persisted_password(Some(&secret(&[(PASSWORD_KEY, b"secretpw")]))),
            Some(b"secretpw".to_vec())
        );
        assert_eq!(persisted_password(Some(&secret(&[(PASSWORD_KEY, b"")]))), None);
        assert_eq!(persisted_password(Some(&secret(&[]))), None);
        assert_eq!(persisted_password(None), None);
    }

    #[test]
    fn test_secret_value_reads_string_data() {
        let mut s = Secret::default();
        s.string_data = Some([(USERNAME_KEY.to_string(), "root".to_string())].into());
        assert_eq!(secret_value(&s, USERNAME_KEY), Some(b"root".to_vec()));
    }
}
