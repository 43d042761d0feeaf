//! Sales report configuration module.
//!
//! Configuration is loaded from environment variables (after an optional
//! `.env` file) with fallback to defaults.

use std::env;

use tally_db::{StoreBackend, StoreConfig};

/// Default number of records the report prints.
pub const DEFAULT_LIMIT: usize = 20;

/// Sales report configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Store connection settings
    pub store: StoreConfig,

    /// Records shown by the report
    pub limit: usize,

    /// Exit non-zero when the store cannot be read
    pub strict: bool,
}

impl ReportConfig {
    /// Load configuration from `.env` and environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside development.
        let _ = dotenvy::dotenv();

        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let backend: StoreBackend = var("TALLY_DB_BACKEND", "mysql")
            .parse()
            .map_err(|_| ConfigError::InvalidValue("TALLY_DB_BACKEND".to_string()))?;

        let database = var("TALLY_DB_NAME", "ventas").trim().to_string();
        if database.is_empty() {
            return Err(ConfigError::MissingRequired("TALLY_DB_NAME".to_string()));
        }

        let store = match backend {
            StoreBackend::Sqlite => StoreConfig::sqlite(database),
            StoreBackend::MySql => {
                let (host, port) = split_host(&var("TALLY_DB_HOST", "127.0.0.1:3306"))?;
                let store = StoreConfig::mysql(
                    host,
                    database,
                    var("TALLY_DB_USER", "tally"),
                    var("TALLY_DB_PASSWORD", "tally"),
                );
                match port {
                    Some(port) => store.port(port),
                    None => store,
                }
            }
        };

        let limit = var("TALLY_REPORT_LIMIT", "20")
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("TALLY_REPORT_LIMIT".to_string()))?;

        let strict = parse_flag(&var("TALLY_STRICT", "false"))
            .ok_or_else(|| ConfigError::InvalidValue("TALLY_STRICT".to_string()))?;

        Ok(ReportConfig {
            store,
            limit,
            strict,
        })
    }
}

/// Splits `host[:port]`.
///
/// IPv6 addresses take a port only in brackets (`[::1]:3306`); a bare
/// address with several colons (`::1`) is a host without a port.
fn split_host(raw: &str) -> Result<(String, Option<u16>), ConfigError> {
    let raw = raw.trim();
    let invalid = || ConfigError::InvalidValue("TALLY_DB_HOST".to_string());

    let (host, port) = if let Some(rest) = raw.strip_prefix('[') {
        let (host, after) = rest.split_once(']').ok_or_else(invalid)?;
        match after {
            "" => (host, None),
            _ => {
                let port = after.strip_prefix(':').ok_or_else(invalid)?;
                (host, Some(port.parse::<u16>().map_err(|_| invalid())?))
            }
        }
    } else {
        match raw.split_once(':') {
            Some((host, port)) if !port.contains(':') => {
                (host, Some(port.parse::<u16>().map_err(|_| invalid())?))
            }
            _ => (raw, None),
        }
    };

    if host.is_empty() {
        return Err(ConfigError::MissingRequired("TALLY_DB_HOST".to_string()));
    }

    Ok((host.to_string(), port))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Configuration error types.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ReportConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ReportConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.store.backend, StoreBackend::MySql);
        assert_eq!(config.store.host, "127.0.0.1");
        assert_eq!(config.store.port, Some(3306));
        assert_eq!(config.store.database, "ventas");
        assert_eq!(config.store.username, "tally");
        assert_eq!(config.limit, DEFAULT_LIMIT);
        assert!(!config.strict);
    }

    #[test]
    fn test_host_without_port() {
        let config = load(&[("TALLY_DB_HOST", "db.internal")]).unwrap();

        assert_eq!(config.store.host, "db.internal");
        assert_eq!(config.store.port, None);
    }

    #[test]
    fn test_ipv6_hosts() {
        let bare = load(&[("TALLY_DB_HOST", "::1")]).unwrap();
        assert_eq!(bare.store.host, "::1");
        assert_eq!(bare.store.port, None);

        let bracketed = load(&[("TALLY_DB_HOST", "[::1]:3307")]).unwrap();
        assert_eq!(bracketed.store.host, "::1");
        assert_eq!(bracketed.store.port, Some(3307));

        let no_port = load(&[("TALLY_DB_HOST", "[fe80::1]")]).unwrap();
        assert_eq!(no_port.store.host, "fe80::1");
        assert_eq!(no_port.store.port, None);

        assert_eq!(
            load(&[("TALLY_DB_HOST", "[::1")]),
            Err(ConfigError::InvalidValue("TALLY_DB_HOST".to_string()))
        );
        assert_eq!(
            load(&[("TALLY_DB_HOST", "[::1]3306")]),
            Err(ConfigError::InvalidValue("TALLY_DB_HOST".to_string()))
        );
    }

    #[test]
    fn test_sqlite_backend_ignores_host() {
        let config = load(&[
            ("TALLY_DB_BACKEND", "sqlite"),
            ("TALLY_DB_NAME", "./ventas_dev.db"),
            ("TALLY_DB_HOST", ""),
        ])
        .unwrap();

        assert_eq!(config.store, StoreConfig::sqlite("./ventas_dev.db"));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            load(&[("TALLY_REPORT_LIMIT", "many")]),
            Err(ConfigError::InvalidValue("TALLY_REPORT_LIMIT".to_string()))
        );
        assert_eq!(
            load(&[("TALLY_DB_BACKEND", "mssql")]),
            Err(ConfigError::InvalidValue("TALLY_DB_BACKEND".to_string()))
        );
        assert_eq!(
            load(&[("TALLY_DB_HOST", "db:port")]),
            Err(ConfigError::InvalidValue("TALLY_DB_HOST".to_string()))
        );
        assert_eq!(
            load(&[("TALLY_STRICT", "maybe")]),
            Err(ConfigError::InvalidValue("TALLY_STRICT".to_string()))
        );
    }

    #[test]
    fn test_missing_required() {
        assert_eq!(
            load(&[("TALLY_DB_HOST", "")]),
            Err(ConfigError::MissingRequired("TALLY_DB_HOST".to_string()))
        );
        assert_eq!(
            load(&[("TALLY_DB_NAME", "  ")]),
            Err(ConfigError::MissingRequired("TALLY_DB_NAME".to_string()))
        );
    }

    #[test]
    fn test_strict_flag() {
        assert!(load(&[("TALLY_STRICT", "TRUE")]).unwrap().strict);
        assert!(load(&[("TALLY_STRICT", "1")]).unwrap().strict);
        assert!(!load(&[("TALLY_STRICT", "no")]).unwrap().strict);
    }
}
