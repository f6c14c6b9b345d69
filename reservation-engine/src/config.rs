//! Configuration for the reservation engine

use serde::{Deserialize, Serialize};

/// Reservation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Payment window for a reservation, in seconds
    ///
    /// After this long an unclaimed reservation is removed and its memo
    /// slot freed.
    pub reservation_ttl_secs: u64,

    /// Ledger client configuration
    pub ledger: LedgerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reservation_ttl_secs: 9600,
            ledger: LedgerConfig::default(),
        }
    }
}

/// Ledger client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Ledger service endpoint
    pub endpoint: String,

    /// Request timeout (milliseconds)
    pub request_timeout_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8900".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(ttl) = std::env::var("GIVERAIL_RESERVATION_TTL_SECS") {
            config.reservation_ttl_secs = ttl
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid TTL: {}", e)))?;
        }

        if let Ok(endpoint) = std::env::var("GIVERAIL_LEDGER_ENDPOINT") {
            config.ledger.endpoint = endpoint;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.reservation_ttl_secs, 9600);
        assert_eq!(config.ledger.request_timeout_ms, 5000);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.reservation_ttl_secs, config.reservation_ttl_secs);
        assert_eq!(parsed.ledger.endpoint, config.ledger.endpoint);
    }
}
