//! Controller configuration read from the environment at startup.

use crate::error::ControllerError;
use std::time::Duration;

/// Shortest root password the controller will generate
pub const MIN_PASSWORD_LENGTH: usize = crds::PASSWORD_LENGTH;

const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 60;

/// Runtime configuration of the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Namespace to watch; all namespaces when `None`
    pub namespace: Option<String>,
    /// Requeue delay after a successful reconcile
    pub poll_interval: Duration,
    /// Length of generated root passwords
    pub password_length: usize,
}

impl ControllerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let namespace = lookup("WATCH_NAMESPACE").filter(|ns| !ns.is_empty());

        let poll_seconds = match lookup("POLL_INTERVAL_SECONDS") {
            Some(value) => value.parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                ControllerError::InvalidConfig(format!(
                    "POLL_INTERVAL_SECONDS must be a positive integer, got {:?}",
                    value
                ))
            })?,
            None => DEFAULT_POLL_INTERVAL_SECONDS,
        };

        let password_length = match lookup("PASSWORD_LENGTH") {
            Some(value) => value
                .parse::<usize>()
                .ok()
                .filter(|l| *l >= MIN_PASSWORD_LENGTH)
                .ok_or_else(|| {
                    ControllerError::InvalidConfig(format!(
                        "PASSWORD_LENGTH must be an integer of at least {}, got {:?}",
                        MIN_PASSWORD_LENGTH, value
                    ))
                })?,
            None => MIN_PASSWORD_LENGTH,
        };

        Ok(Self {
            namespace,
            poll_interval: Duration::from_secs(poll_seconds),
            password_length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ControllerConfig, ControllerError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ControllerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.namespace, None);
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.password_length, 20);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("WATCH_NAMESPACE", "crossplane-system"),
            ("POLL_INTERVAL_SECONDS", "30"),
            ("PASSWORD_LENGTH", "32"),
        ])
        .unwrap();
        assert_eq!(config.namespace.as_deref(), Some("crossplane-system"));
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.password_length, 32);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for vars in [
            [("PASSWORD_LENGTH", "12")],
            [("PASSWORD_LENGTH", "lots")],
            [("POLL_INTERVAL_SECONDS", "0")],
            [("POLL_INTERVAL_SECONDS", "-5")],
        ] {
            let err = load(&vars).unwrap_err();
            assert!(matches!(err, ControllerError::InvalidConfig(_)), "{:?}", vars);
        }
    }
}
