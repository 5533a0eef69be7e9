//! Server configuration for Aurum.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `AURUM_*` environment variables.

use std::net::SocketAddr;

use aurum_core::params::{DEFAULT_ANNUAL_INTEREST_RATE, DEFAULT_LOAN_TO_VALUE_RATIO};

/// Default listen port.
const DEFAULT_PORT: u16 = 8300;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Storage backend type.
    pub storage_backend: StorageBackendType,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Loan-to-value ratio seeded into an empty store.
    pub seed_loan_to_value_ratio: f64,
    /// Annual interest rate seeded into an empty store.
    pub seed_interest_rate: f64,
    /// Token required to change rate parameters. Writes are disabled when unset.
    pub admin_token: Option<String>,
}

/// Supported storage backend types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendType {
    /// In-memory (development only, data lost on restart).
    Memory,
    /// Redb persistent storage.
    Redb { path: String },
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: port to bind on, binds to `0.0.0.0`
    /// - `AURUM_BIND_ADDR`: full bind address (overrides `PORT`, default: `127.0.0.1:8300`)
    /// - `AURUM_STORAGE`: `memory` or `redb` (default: `memory`)
    /// - `AURUM_STORAGE_PATH`: path for the redb file (default: `./data/aurum.redb`)
    /// - `AURUM_LOG_LEVEL`: log filter (default: `info`)
    /// - `AURUM_LTV_RATIO`: loan-to-value ratio seeded on first start (default: `0.7`)
    /// - `AURUM_INTEREST_RATE`: annual interest rate seeded on first start (default: `0.05`)
    /// - `AURUM_ADMIN_TOKEN`: token for `PUT /v1/loan/params/{key}` (optional)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        // Priority: AURUM_BIND_ADDR > PORT > default 127.0.0.1:8300
        let bind_addr = if let Some(addr) = var("AURUM_BIND_ADDR") {
            addr.parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)))
        } else if let Some(port_str) = var("PORT") {
            let port: u16 = port_str.parse().unwrap_or(DEFAULT_PORT);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT))
        };

        let storage_backend = match var("AURUM_STORAGE")
            .unwrap_or_else(|| "memory".to_owned())
            .to_lowercase()
            .as_str()
        {
            "redb" => StorageBackendType::Redb {
                path: var("AURUM_STORAGE_PATH").unwrap_or_else(|| "./data/aurum.redb".to_owned()),
            },
            _ => StorageBackendType::Memory,
        };

        let log_level = var("AURUM_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let seed_loan_to_value_ratio = var("AURUM_LTV_RATIO")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_LOAN_TO_VALUE_RATIO);

        let seed_interest_rate = var("AURUM_INTEREST_RATE")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_ANNUAL_INTEREST_RATE);

        let admin_token = var("AURUM_ADMIN_TOKEN").filter(|t| !t.is_empty());

        Self {
            bind_addr,
            storage_backend,
            log_level,
            seed_loan_to_value_ratio,
            seed_interest_rate,
            admin_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = config(&[]);
        assert_eq!(cfg.bind_addr, SocketAddr::from(([127, 0, 0, 1], 8300)));
        assert_eq!(cfg.storage_backend, StorageBackendType::Memory);
        assert_eq!(cfg.log_level, "info");
        assert!((cfg.seed_loan_to_value_ratio - 0.7).abs() < f64::EPSILON);
        assert!((cfg.seed_interest_rate - 0.05).abs() < f64::EPSILON);
        assert!(cfg.admin_token.is_none());
    }

    #[test]
    fn port_binds_all_interfaces() {
        let cfg = config(&[("PORT", "9000")]);
        assert_eq!(cfg.bind_addr, SocketAddr::from(([0, 0, 0, 0], 9000)));
    }

    #[test]
    fn bind_addr_beats_port() {
        let cfg = config(&[("PORT", "9000"), ("AURUM_BIND_ADDR", "10.0.0.1:7000")]);
        assert_eq!(cfg.bind_addr, SocketAddr::from(([10, 0, 0, 1], 7000)));
    }

    #[test]
    fn redb_storage_uses_path() {
        let cfg = config(&[("AURUM_STORAGE", "REDB"), ("AURUM_STORAGE_PATH", "/tmp/r.redb")]);
        assert_eq!(
            cfg.storage_backend,
            StorageBackendType::Redb {
                path: "/tmp/r.redb".to_owned()
            }
        );
    }

    #[test]
    fn unparsable_rates_use_defaults() {
        let cfg = config(&[("AURUM_LTV_RATIO", "seventy"), ("AURUM_INTEREST_RATE", "0.08")]);
        assert!((cfg.seed_loan_to_value_ratio - 0.7).abs() < f64::EPSILON);
        assert!((cfg.seed_interest_rate - 0.08).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_admin_token_disables_writes() {
        let cfg = config(&[("AURUM_ADMIN_TOKEN", "")]);
        assert!(cfg.admin_token.is_none());
    }
}
