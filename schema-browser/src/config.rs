//! Environment configuration
//!
//! Store settings are required and read once at startup. A missing value is a
//! startup error, never a per-request one.

use std::fmt;
use std::net::SocketAddr;
use thiserror::Error;

pub const MYSQL_HOST: &str = "MYSQL_HOST";
pub const MYSQL_PORT: &str = "MYSQL_PORT";
pub const MYSQL_DATABASE: &str = "MYSQL_DATABASE";
pub const MYSQL_USER: &str = "MYSQL_USER";
pub const MYSQL_PASSWORD: &str = "MYSQL_PASSWORD";
pub const BIND_ADDRESS: &str = "BROWSER_BIND_ADDRESS";
pub const BASE_PATH: &str = "BROWSER_BASE_PATH";

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for environment variable {name}")]
    Invalid { name: &'static str, value: String },
}

/// Connection settings for the relational store
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    /// Logical database (schema) that every catalog query is scoped to
    pub database: String,
    pub user: String,
    pub password: String,
}

impl StoreConfig {
    /// Read the store settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the store settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let port_value = required(MYSQL_PORT)?;
        let port = port_value
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::Invalid {
                name: MYSQL_PORT,
                value: port_value.clone(),
            })?;

        Ok(Self {
            host: required(MYSQL_HOST)?,
            port,
            database: required(MYSQL_DATABASE)?,
            user: required(MYSQL_USER)?,
            password: required(MYSQL_PASSWORD)?,
        })
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    /// Mount point of the API, empty or starting with `/`, never ending in `/`
    pub base_path: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let address_value = lookup(BIND_ADDRESS).unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = address_value
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid {
                name: BIND_ADDRESS,
                value: address_value.clone(),
            })?;

        let base_path_value = lookup(BASE_PATH).unwrap_or_default();
        let base_path = base_path_value.trim().trim_end_matches('/').to_string();
        if !base_path.is_empty() && !base_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                name: BASE_PATH,
                value: base_path_value,
            });
        }

        Ok(Self {
            bind_address,
            base_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let variables: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        move |name: &str| variables.get(name).cloned()
    }

    fn complete_store_variables() -> Vec<(&'static str, &'static str)> {
        vec![
            (MYSQL_HOST, "db.internal"),
            (MYSQL_PORT, "3310"),
            (MYSQL_DATABASE, "shop"),
            (MYSQL_USER, "reader"),
            (MYSQL_PASSWORD, "secret"),
        ]
    }

    #[test]
    fn test_store_config_from_lookup() {
        let config = StoreConfig::from_lookup(lookup_from(&complete_store_variables())).unwrap();
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 3310);
        assert_eq!(config.database, "shop");
        assert_eq!(config.user, "reader");
        assert_eq!(config.password, "secret");
    }

    #[test]
    fn test_store_config_missing_variable() {
        for missing in [MYSQL_HOST, MYSQL_PORT, MYSQL_DATABASE, MYSQL_USER, MYSQL_PASSWORD] {
            let variables: Vec<_> = complete_store_variables()
                .into_iter()
                .filter(|(name, _)| *name != missing)
                .collect();
            assert_eq!(
                StoreConfig::from_lookup(lookup_from(&variables)),
                Err(ConfigError::Missing(missing))
            );
        }
    }

    #[test]
    fn test_store_config_empty_password_is_allowed() {
        let mut variables = complete_store_variables();
        variables.retain(|(name, _)| *name != MYSQL_PASSWORD);
        variables.push((MYSQL_PASSWORD, ""));
        let config = StoreConfig::from_lookup(lookup_from(&variables)).unwrap();
        assert_eq!(config.password, "");
    }

    #[test]
    fn test_store_config_invalid_port() {
        let mut variables = complete_store_variables();
        variables.retain(|(name, _)| *name != MYSQL_PORT);
        variables.push((MYSQL_PORT, "not-a-port"));
        assert_eq!(
            StoreConfig::from_lookup(lookup_from(&variables)),
            Err(ConfigError::Invalid {
                name: MYSQL_PORT,
                value: "not-a-port".to_string()
            })
        );
    }

    #[test]
    fn test_store_config_debug_redacts_password() {
        let config = StoreConfig::from_lookup(lookup_from(&complete_store_variables())).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_path, "");
    }

    #[test]
    fn test_server_config_base_path() {
        let config = ServerConfig::from_lookup(lookup_from(&[(BASE_PATH, "/browser/")])).unwrap();
        assert_eq!(config.base_path, "/browser");

        assert!(matches!(
            ServerConfig::from_lookup(lookup_from(&[(BASE_PATH, "browser")])),
            Err(ConfigError::Invalid { name: BASE_PATH, .. })
        ));
    }
}
