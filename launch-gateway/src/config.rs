//! Gateway configuration read from environment variables.

use std::{path::PathBuf, time::Duration};

use launch_trials::TrialsConfig;

/// Default bind address.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3456";

/// Default origin trials API base URL.
pub const DEFAULT_OT_API_URL: &str = "http://127.0.0.1:8090";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A variable is set but its value cannot be used.
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue { var: &'static str, value: String, reason: String },
}

/// Runtime configuration for the gateway binary.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct GatewayConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: String,
    /// Origin trials API connection settings.
    pub trials: TrialsConfig,
    /// Emails allowed to edit every feature.
    pub admin_emails: Vec<String>,
    /// JSON file used to seed the in-memory entity store.
    pub seed_path: Option<PathBuf>,
}

impl GatewayConfig {
    /// Read configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `LAUNCH_LISTEN_ADDR` | `127.0.0.1:3456` |
    /// | `LAUNCH_OT_API_URL` | `http://127.0.0.1:8090` |
    /// | `LAUNCH_OT_API_KEY` | unset |
    /// | `LAUNCH_OT_ACCESS_TOKEN` | unset |
    /// | `LAUNCH_OT_TIMEOUT_SECS` | `30` |
    /// | `LAUNCH_ADMIN_EMAILS` | empty, comma-separated |
    /// | `LAUNCH_SEED_PATH` | unset |
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    /// See [`GatewayConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let get = |var: &'static str| lookup(var).filter(|v| !v.trim().is_empty());

        let listen_addr = get("LAUNCH_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned());

        let mut trials =
            TrialsConfig::new(get("LAUNCH_OT_API_URL").unwrap_or_else(|| DEFAULT_OT_API_URL.to_owned()));
        if let Some(key) = get("LAUNCH_OT_API_KEY") {
            trials = trials.with_api_key(key);
        }
        if let Some(token) = get("LAUNCH_OT_ACCESS_TOKEN") {
            trials = trials.with_access_token(token);
        }
        if let Some(raw) = get("LAUNCH_OT_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                var: "LAUNCH_OT_TIMEOUT_SECS",
                value: raw.clone(),
                reason: e.to_string(),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    var: "LAUNCH_OT_TIMEOUT_SECS",
                    value: raw,
                    reason: "timeout must be positive".to_owned(),
                });
            }
            trials = trials.with_timeout(Duration::from_secs(secs));
        }

        let admin_emails = get("LAUNCH_ADMIN_EMAILS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let seed_path = get("LAUNCH_SEED_PATH").map(PathBuf::from);

        Ok(Self { listen_addr, trials, admin_emails, seed_path })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&'static str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let map: HashMap<&'static str, String> =
            vars.iter().map(|(k, v)| (*k, (*v).to_owned())).collect();
        GatewayConfig::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = match config_from(&[]) {
            Ok(c) => c,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.trials.base_url, DEFAULT_OT_API_URL);
        assert_eq!(config.trials.timeout, launch_trials::config::DEFAULT_TIMEOUT);
        assert!(config.trials.api_key.is_none());
        assert!(config.admin_emails.is_empty());
        assert!(config.seed_path.is_none());
    }

    #[test]
    fn variables_override_defaults() {
        let config = match config_from(&[
            ("LAUNCH_LISTEN_ADDR", "0.0.0.0:8080"),
            ("LAUNCH_OT_API_URL", "https://trials.example.com/"),
            ("LAUNCH_OT_API_KEY", "key"),
            ("LAUNCH_OT_TIMEOUT_SECS", "5"),
            ("LAUNCH_ADMIN_EMAILS", "a@example.com, ,b@example.com"),
            ("LAUNCH_SEED_PATH", "/etc/launch/seed.json"),
        ]) {
            Ok(c) => c,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.trials.base_url, "https://trials.example.com");
        assert_eq!(config.trials.api_key.as_deref(), Some("key"));
        assert_eq!(config.trials.timeout, Duration::from_secs(5));
        assert_eq!(config.admin_emails, vec!["a@example.com", "b@example.com"]);
        assert_eq!(config.seed_path, Some(PathBuf::from("/etc/launch/seed.json")));
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        for bad in ["soon", "0", "-1"] {
            let result = config_from(&[("LAUNCH_OT_TIMEOUT_SECS", bad)]);
            assert!(
                matches!(result, Err(ConfigError::InvalidValue { var: "LAUNCH_OT_TIMEOUT_SECS", .. })),
                "{bad:?} must be rejected"
            );
        }
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = match config_from(&[("LAUNCH_LISTEN_ADDR", "  "), ("LAUNCH_OT_API_KEY", "")]) {
            Ok(c) => c,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert!(config.trials.api_key.is_none());
    }
}
