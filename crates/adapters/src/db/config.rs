// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External database ledger settings

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Address that selects the in-process store instead of a network client
pub const MOCK_ADDRESS: &str = "mock";

const ENV_URL: &str = "ImmuUrl";
const ENV_PORT: &str = "ImmuPort";
const ENV_USER: &str = "ImmuUsrName";
const ENV_PASSWORD: &str = "ImmuPasswd";

/// Errors reading database settings from the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("environment variable {0} must be set and non-empty")]
    Missing(&'static str),
    #[error("invalid port in {var}: {value}")]
    InvalidPort { var: &'static str, value: String },
}

/// Backoff schedule for write-behind retries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Wait before the first retry
    #[serde(with = "humantime_serde")]
    pub initial_delay: Duration,
    /// Growth factor applied to the wait after every failed round
    pub multiplier: u32,
    /// Retries attempted before giving up
    pub max_rounds: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            multiplier: 2,
            max_rounds: 12,
        }
    }
}

impl RetryPolicy {
    /// Wait before retry `round` (zero based): `initial_delay * multiplier^round`
    pub fn delay(&self, round: u32) -> Duration {
        self.initial_delay
            .saturating_mul(self.multiplier.saturating_pow(round))
    }
}

/// Connection, timeout and retry settings for the database ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub address: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database the session token is routed to
    pub database: String,
    /// Bound on a single remote write
    #[serde(with = "humantime_serde")]
    pub write_timeout: Duration,
    /// Bound on login, logout and remote reads
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// How long a reader waits for the worker to answer
    #[serde(with = "humantime_serde")]
    pub reply_timeout: Duration,
    /// Token age after which the worker logs in again
    #[serde(with = "humantime_serde")]
    pub refresh_after: Duration,
    pub retry: RetryPolicy,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            address: MOCK_ADDRESS.to_string(),
            port: 3322,
            user: "immudb".to_string(),
            password: "immudb".to_string(),
            database: "defaultdb".to_string(),
            write_timeout: Duration::from_secs(3),
            request_timeout: Duration::from_secs(10),
            reply_timeout: Duration::from_secs(30),
            refresh_after: Duration::from_secs(50 * 60),
            retry: RetryPolicy::default(),
        }
    }
}

impl DbConfig {
    /// Settings from `ImmuUrl`, `ImmuPort`, `ImmuUsrName` and `ImmuPasswd`.
    ///
    /// Without `ImmuUrl` the mock configuration is returned.
    pub fn from_env() -> Result<Self, EnvError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EnvError> {
        let Some(address) = lookup(ENV_URL) else {
            tracing::debug!("no {} set, using mock database config", ENV_URL);
            return Ok(Self::default());
        };

        let required = |var: &'static str| {
            lookup(var)
                .filter(|value| !value.is_empty())
                .ok_or(EnvError::Missing(var))
        };

        if address.is_empty() {
            return Err(EnvError::Missing(ENV_URL));
        }
        let port_str = required(ENV_PORT)?;
        let port = port_str
            .parse::<u16>()
            .ok()
            .filter(|port| *port != 0)
            .ok_or(EnvError::InvalidPort {
                var: ENV_PORT,
                value: port_str.clone(),
            })?;

        Ok(Self {
            address,
            port,
            user: required(ENV_USER)?,
            password: required(ENV_PASSWORD)?,
            ..Self::default()
        })
    }

    pub fn is_mock(&self) -> bool {
        self.address == MOCK_ADDRESS
    }

    /// Base URL of the database's HTTP gateway, with trailing slash
    pub fn endpoint(&self) -> String {
        let address = self.address.trim_end_matches('/');
        if address.starts_with("http://") || address.starts_with("https://") {
            format!("{}:{}/", address, self.port)
        } else {
            format!("http://{}:{}/", address, self.port)
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
