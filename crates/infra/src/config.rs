//! Process configuration read from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `ORDERDESK_BIND_ADDR` | `0.0.0.0:8080` |
//! | `USE_PERSISTENT_STORES` | `false` |
//! | `DATABASE_URL` | required when persistent stores are enabled |
//! | `ORDERDESK_STRICT_TRANSITIONS` | `false` |

use std::net::SocketAddr;

use thiserror::Error;

use orderdesk_orders::TransitionPolicy;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must be set when USE_PERSISTENT_STORES is enabled")]
    Missing(&'static str),
}

/// Which order store backs the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    InMemory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub transition_policy: TransitionPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store: StoreBackend::InMemory,
            transition_policy: TransitionPolicy::Baseline,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("ORDERDESK_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "ORDERDESK_BIND_ADDR",
                value: raw_addr.clone(),
                reason: e.to_string(),
            })?;

        let store = if parse_flag("USE_PERSISTENT_STORES", lookup("USE_PERSISTENT_STORES"))? {
            let database_url = lookup("DATABASE_URL")
                .filter(|url| !url.trim().is_empty())
                .ok_or(ConfigError::Missing("DATABASE_URL"))?;
            StoreBackend::Postgres { database_url }
        } else {
            StoreBackend::InMemory
        };

        let transition_policy = if parse_flag(
            "ORDERDESK_STRICT_TRANSITIONS",
            lookup("ORDERDESK_STRICT_TRANSITIONS"),
        )? {
            TransitionPolicy::Strict
        } else {
            TransitionPolicy::Baseline
        };

        Ok(Self {
            bind_addr,
            store,
            transition_policy,
        })
    }
}

fn parse_flag(var: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(false);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config(&[]).unwrap(), AppConfig::default());
    }

    #[test]
    fn persistent_stores_need_a_database_url() {
        assert_eq!(
            config(&[("USE_PERSISTENT_STORES", "true")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        );

        let cfg = config(&[
            ("USE_PERSISTENT_STORES", "TRUE"),
            ("DATABASE_URL", "postgres://orderdesk@localhost/orderdesk"),
        ])
        .unwrap();
        assert_eq!(
            cfg.store,
            StoreBackend::Postgres {
                database_url: "postgres://orderdesk@localhost/orderdesk".to_string()
            }
        );
    }

    #[test]
    fn strict_transitions_flag() {
        let cfg = config(&[("ORDERDESK_STRICT_TRANSITIONS", "1")]).unwrap();
        assert_eq!(cfg.transition_policy, TransitionPolicy::Strict);

        let cfg = config(&[("ORDERDESK_STRICT_TRANSITIONS", "off")]).unwrap();
        assert_eq!(cfg.transition_policy, TransitionPolicy::Baseline);
    }

    #[test]
    fn bad_values_are_reported() {
        let err = config(&[("ORDERDESK_BIND_ADDR", "not-an-addr")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "ORDERDESK_BIND_ADDR",
                ..
            }
        ));

        let err = config(&[("ORDERDESK_STRICT_TRANSITIONS", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("ORDERDESK_STRICT_TRANSITIONS"));
    }

    #[test]
    fn custom_bind_address() {
        let cfg = config(&[("ORDERDESK_BIND_ADDR", "127.0.0.1:3000")]).unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
    }
}
