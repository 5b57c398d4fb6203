use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "http://20.244.56.144/evaluation-service";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Upstream credentials supplied by the operator. Each one, when set,
/// takes precedence over what a client submits.
#[derive(Clone, Default)]
pub struct Credentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub access_code: Option<String>,
}

impl Credentials {
    pub fn is_complete(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some() && self.access_code.is_some()
    }
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub demo_mode: bool,
    pub upstream_base_url: String,
    pub credentials: Credentials,
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so callers other than the
    /// binary don't have to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let credentials = Credentials {
            client_id: optional("CLIENT_ID"),
            client_secret: optional("CLIENT_SECRET"),
            access_code: optional("ACCESS_CODE"),
        };

        let upstream_base_url = optional("UPSTREAM_BASE_URL")
            .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            port: try_load(&optional, "PORT", "5000")?,
            demo_mode: optional("MODE").is_some_and(|mode| mode.eq_ignore_ascii_case("demo")),
            upstream_base_url,
            credentials,
            static_dir: optional("STATIC_DIR").map(PathBuf::from),
        })
    }

    /// Settings for running against canned sample data.
    pub fn demo() -> Self {
        Self {
            port: 5000,
            demo_mode: true,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            credentials: Credentials::default(),
            static_dir: None,
        }
    }

    pub fn log_status(&self) {
        let status = |value: &Option<String>| if value.is_some() { "Set" } else { "Not set" };

        info!("Mode: {}", if self.demo_mode { "demo" } else { "live" });
        info!("Upstream: {}", self.upstream_base_url);
        info!("CLIENT_ID: {}", status(&self.credentials.client_id));
        info!("CLIENT_SECRET: {}", status(&self.credentials.client_secret));
        info!("ACCESS_CODE: {}", status(&self.credentials.access_code));
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.port, 5000);
        assert!(!config.demo_mode);
        assert_eq!(config.upstream_base_url, DEFAULT_UPSTREAM_BASE_URL);
        assert!(!config.credentials.is_complete());
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn reads_mode_and_credentials() {
        let config = config_from(&[
            ("MODE", "demo"),
            ("PORT", "8080"),
            ("CLIENT_ID", "id"),
            ("CLIENT_SECRET", "secret"),
            ("ACCESS_CODE", "code"),
            ("UPSTREAM_BASE_URL", "http://localhost:9000/eval/"),
        ])
        .unwrap();

        assert!(config.demo_mode);
        assert_eq!(config.port, 8080);
        assert!(config.credentials.is_complete());
        assert_eq!(config.upstream_base_url, "http://localhost:9000/eval");
    }

    #[test]
    fn blank_credentials_count_as_unset() {
        let config = config_from(&[("CLIENT_ID", "  ")]).unwrap();
        assert!(config.credentials.client_id.is_none());
    }

    #[test]
    fn blank_port_uses_default() {
        let config = config_from(&[("PORT", "")]).unwrap();
        assert_eq!(config.port, 5000);

        let config = config_from(&[("PORT", "   ")]).unwrap();
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn rejects_non_numeric_port() {
        let result = config_from(&[("PORT", "http")]);
        assert!(matches!(result, Err(ConfigError::Invalid { key: "PORT", .. })));
    }
}
