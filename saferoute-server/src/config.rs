use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use saferoute_core::SafetyConfig;
use saferoute_core::transit::odsay::SEARCH_PATH_URL;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Whole server configuration, one TOML table per section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub transit: TransitSettings,
    pub safety: SafetyConfig,
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub listen: SocketAddr,
    pub request_timeout_secs: u64,
    pub concurrency_limit: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
            request_timeout_secs: 30,
            concurrency_limit: 64,
        }
    }
}

impl ServerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransitSettings {
    pub base_url: String,
    /// Inline credential; takes precedence over `api_key_env`
    pub api_key: Option<String>,
    /// Environment variable holding the credential
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for TransitSettings {
    fn default() -> Self {
        Self {
            base_url: SEARCH_PATH_URL.to_string(),
            api_key: None,
            api_key_env: "ODSAY_API_KEY".to_string(),
            timeout_secs: 5,
        }
    }
}

impl TransitSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.listen.port(), 8080);
        assert_eq!(config.transit.timeout_secs, 5);
        assert_eq!(config.safety, SafetyConfig::default());
    }

    #[test]
    fn tables_override_selected_fields() {
        let config = ServerConfig::from_toml_str(
            r#"
            [server]
            listen = "0.0.0.0:9000"

            [transit]
            api_key = "secret"
            timeout_secs = 2

            [safety.weights]
            blind_coefficient = 1.2

            [safety.ingest]
            require_node_ids = true
            "#,
        )
        .unwrap();

        assert_eq!(config.server.listen.port(), 9000);
        assert_eq!(config.server.concurrency_limit, 64);
        assert_eq!(config.transit.resolve_api_key().as_deref(), Some("secret"));
        assert_eq!(config.safety.weights.blind_coefficient, 1.2);
        assert_eq!(config.safety.weights.base_light, 3.0);
        assert!(config.safety.ingest.require_node_ids);
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let settings = TransitSettings {
            api_key: Some("  ".to_string()),
            api_key_env: "SAFEROUTE_UNSET_TRANSIT_KEY".to_string(),
            ..TransitSettings::default()
        };
        assert_eq!(settings.resolve_api_key(), None);
    }

    #[test]
    fn mistyped_field_is_rejected() {
        assert!(ServerConfig::from_toml_str("[server]\nlisten = 12").is_err());
    }
}
