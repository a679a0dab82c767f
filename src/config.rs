//! Startup configuration
//!
//! - `PORT` - main HTTP port (default 8080)
//! - `METRICS_PORT` - Prometheus exposition port (default 9090)

use crate::env::EnvSource;
use thiserror::Error;

/// Default port for the main HTTP surface
pub const DEFAULT_PORT: u16 = 8080;

/// Default port for the metrics server
pub const DEFAULT_METRICS_PORT: u16 = 9090;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: expected a port number")]
    InvalidPort { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub metrics_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            metrics_port: DEFAULT_METRICS_PORT,
        }
    }
}

impl AppConfig {
    /// Load configuration, falling back to defaults for unset variables
    pub fn from_env(env: &dyn EnvSource) -> Result<Self, ConfigError> {
        Ok(Self {
            port: read_port(env, "PORT", DEFAULT_PORT)?,
            metrics_port: read_port(env, "METRICS_PORT", DEFAULT_METRICS_PORT)?,
        })
    }
}

fn read_port(env: &dyn EnvSource, key: &'static str, default: u16) -> Result<u16, ConfigError> {
    match env.var(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::StaticEnv;

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_env(&StaticEnv::new()).expect("should load");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.metrics_port, 9090);
    }

    #[test]
    fn test_ports_from_env() {
        let env = StaticEnv::new()
            .with("PORT", "3000")
            .with("METRICS_PORT", " 9100 ");

        let config = AppConfig::from_env(&env).expect("should load");

        assert_eq!(config.port, 3000);
        assert_eq!(config.metrics_port, 9100);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let env = StaticEnv::new().with("METRICS_PORT", "70000");

        let err = AppConfig::from_env(&env).expect_err("should reject");

        assert!(matches!(
            err,
            ConfigError::InvalidPort { key: "METRICS_PORT", .. }
        ));
        assert!(err.to_string().contains("70000"));
    }
}
