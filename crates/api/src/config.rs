//! Process configuration, read once at startup.

use std::net::SocketAddr;

use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "TODOAPI_BIND_ADDR";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const MAX_CONNECTIONS_VAR: &str = "TODOAPI_DB_MAX_CONNECTIONS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid value: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Startup configuration.
///
/// Built once in `main` and only ever borrowed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Postgres connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source (tests pass a closure over a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: BIND_ADDR_VAR,
                value: bind_addr.clone(),
                reason: e.to_string(),
            })?;

        let database_url = lookup(DATABASE_URL_VAR).filter(|url| !url.trim().is_empty());

        let db_max_connections = match lookup(MAX_CONNECTIONS_VAR) {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(raw) => match raw.parse::<u32>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        var: MAX_CONNECTIONS_VAR,
                        value: raw,
                        reason: "must be at least 1".to_string(),
                    });
                }
                Ok(n) => n,
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: MAX_CONNECTIONS_VAR,
                        value: raw,
                        reason: e.to_string(),
                    });
                }
            },
        };

        Ok(Self {
            bind_addr,
            database_url,
            db_max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.db_max_connections, 5);
    }

    #[test]
    fn reads_every_variable() {
        let cfg = config_from(&[
            (BIND_ADDR_VAR, "127.0.0.1:3000"),
            (DATABASE_URL_VAR, "postgres://localhost/todos"),
            (MAX_CONNECTIONS_VAR, "12"),
        ])
        .unwrap();

        assert_eq!(cfg.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/todos"));
        assert_eq!(cfg.db_max_connections, 12);
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let cfg = config_from(&[(DATABASE_URL_VAR, "  ")]).unwrap();
        assert_eq!(cfg.database_url, None);
    }

    #[test]
    fn rejects_malformed_bind_addr() {
        let err = config_from(&[(BIND_ADDR_VAR, "not-an-addr")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var, .. } if var == BIND_ADDR_VAR));
    }

    #[test]
    fn rejects_zero_or_non_numeric_pool_size() {
        for raw in ["0", "many"] {
            let err = config_from(&[(MAX_CONNECTIONS_VAR, raw)]).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { var, .. } if var == MAX_CONNECTIONS_VAR));
        }
    }
}
