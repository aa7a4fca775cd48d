//! Application configuration loaded from environment variables.
//!
//! | Variable             | Default                               |
//! |----------------------|---------------------------------------|
//! | `RPC_URL`            | `https://soroban-testnet.stellar.org` |
//! | `CONTRACT_ID`        | *(required)*                          |
//! | `DATABASE_URL`       | `sqlite:./governance_events.db`       |
//! | `API_PORT`           | `3001`                                |
//! | `POLL_INTERVAL_SECS` | `5`                                   |
//! | `EVENTS_PER_PAGE`    | `100`                                 |
//! | `START_LEDGER`       | `0`                                   |

use std::str::FromStr;

use crate::errors::{IndexerError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Soroban RPC endpoint (e.g. https://soroban-testnet.stellar.org)
    pub rpc_url: String,
    /// The governance ledger contract address (Strkey format)
    pub contract_id: String,
    /// Path to the SQLite database file
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// How often (in seconds) to poll the RPC for new events
    pub poll_interval_secs: u64,
    /// Maximum number of events to fetch per RPC request
    pub events_per_page: u32,
    /// Ledger to start from if no cursor is saved
    pub start_ledger: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config {
            rpc_url: lookup("RPC_URL")
                .unwrap_or_else(|| "https://soroban-testnet.stellar.org".to_string()),
            contract_id: lookup("CONTRACT_ID").ok_or_else(|| {
                IndexerError::Config("CONTRACT_ID environment variable is required".to_string())
            })?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite:./governance_events.db".to_string()),
            api_port: parse_or(&lookup, "API_PORT", 3001)?,
            poll_interval_secs: parse_or(&lookup, "POLL_INTERVAL_SECS", 5)?,
            events_per_page: parse_or(&lookup, "EVENTS_PER_PAGE", 100)?,
            start_ledger: parse_or(&lookup, "START_LEDGER", 0)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the indexer misbehave at runtime.
    pub fn validate(&self) -> Result<()> {
        if !self.contract_id.starts_with('C') {
            return Err(IndexerError::Config(
                "CONTRACT_ID must be a Stellar contract address (starts with 'C')".to_string(),
            ));
        }
        if !self.rpc_url.starts_with("http") {
            return Err(IndexerError::Config(
                "RPC_URL must be a valid HTTP(S) URL".to_string(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(IndexerError::Config(
                "POLL_INTERVAL_SECS must be at least 1".to_string(),
            ));
        }
        if self.events_per_page == 0 {
            return Err(IndexerError::Config(
                "EVENTS_PER_PAGE must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| IndexerError::Config(format!("Invalid {key}: {raw:?}"))),
    }
}
