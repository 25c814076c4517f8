//! Application configuration loaded from environment variables.

use std::str::FromStr;

use crate::errors::{IndexerError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Soroban RPC endpoint (e.g. https://soroban-testnet.stellar.org)
    pub rpc_url: String,
    /// The crowdfund contract address (Strkey format)
    pub contract_id: String,
    /// SQLite database URL or file path
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// Seconds between RPC polls
    pub poll_interval_secs: u64,
    /// Maximum number of events per RPC request
    pub events_per_page: u32,
    /// Ledger to start from when no cursor is saved
    pub start_ledger: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            rpc_url: env_or("RPC_URL", "https://soroban-testnet.stellar.org"),
            contract_id: std::env::var("CONTRACT_ID").map_err(|_| {
                IndexerError::Config("CONTRACT_ID environment variable is required".to_string())
            })?,
            database_url: env_or("DATABASE_URL", "sqlite:./campaign_events.db"),
            api_port: parse_env("API_PORT", 3001)?,
            poll_interval_secs: parse_env("POLL_INTERVAL_SECS", 5)?,
            events_per_page: parse_env("EVENTS_PER_PAGE", 100)?,
            start_ledger: parse_env("START_LEDGER", 0)?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| IndexerError::Config(format!("Invalid {key}: {raw}"))),
        Err(_) => Ok(default),
    }
}
