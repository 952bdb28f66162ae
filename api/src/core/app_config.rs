use std::net::SocketAddr;

use thiserror::Error;

/// Listen address used when `API_ADDRESS` is unset.
pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API_ADDRESS `{value}`: {reason}")]
    InvalidAddress { value: String, reason: String },
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub address: SocketAddr,
}

impl ApiConfig {
    /// Load from `API_ADDRESS` (default `0.0.0.0:8000`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("API_ADDRESS")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_ADDRESS.into());
        Self::parse(&raw)
    }

    fn parse(raw: &str) -> Result<Self, ConfigError> {
        let address = raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidAddress {
                value: raw.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { address })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_address() {
        let cfg = ApiConfig::parse(DEFAULT_API_ADDRESS).unwrap();
        assert_eq!(cfg.address.port(), 8000);
    }

    #[test]
    fn rejects_address_without_port() {
        assert!(matches!(
            ApiConfig::parse("localhost"),
            Err(ConfigError::InvalidAddress { .. })
        ));
    }
}
