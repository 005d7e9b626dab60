// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pool configuration file and built-in plugin registration

use crate::registry::Registry;
use lm_adapters::{
    ApiConfig, ApiLedger, DbConfig, DbLedger, EchoLedger, FileLedger, MemLedger, TracedLedger,
};
use lm_core::names;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading the pool configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("no home directory for the file ledger, set [file] dir")]
    NoFileDir,
}

/// One plugin to open, with its open argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSpec {
    pub plugin: String,
    #[serde(default)]
    pub arg: String,
}

/// File ledger settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Directory holding `<name>.json` files, `~/.indy_client` if unset
    pub dir: Option<PathBuf>,
}

impl FileConfig {
    pub fn resolve_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => FileLedger::default_dir().ok_or(ConfigError::NoFileDir),
        }
    }
}

/// Everything needed to build a registry and open a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Plugins to open, in order. The first is authoritative, the second
    /// its cache.
    pub ledgers: Vec<LedgerSpec>,
    pub db: DbConfig,
    pub api: ApiConfig,
    pub file: FileConfig,
}

impl PoolConfig {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), ledgers = config.ledgers.len(), "loaded pool config");
        Ok(config)
    }

    /// Flat `name, arg, ...` list for [`LedgerSession::open_ledger`]
    ///
    /// [`LedgerSession::open_ledger`]: crate::LedgerSession::open_ledger
    pub fn open_args(&self) -> Vec<&str> {
        self.ledgers
            .iter()
            .flat_map(|spec| [spec.plugin.as_str(), spec.arg.as_str()])
            .collect()
    }
}

/// Register the in-process plugins, each wrapped for tracing.
///
/// The native distributed ledger behind `FINDY_LEDGER` is not built in; its
/// owner registers it.
pub fn register_builtin(registry: &mut Registry, config: &PoolConfig) -> Result<(), ConfigError> {
    registry.register(
        names::FINDY_MEM_LEDGER,
        TracedLedger::new(names::FINDY_MEM_LEDGER, MemLedger::new()),
    );
    registry.register(
        names::FINDY_ECHO_LEDGER,
        TracedLedger::new(names::FINDY_ECHO_LEDGER, EchoLedger::new()),
    );
    registry.register(
        names::FINDY_FILE_LEDGER,
        TracedLedger::new(
            names::FINDY_FILE_LEDGER,
            FileLedger::new(config.file.resolve_dir()?),
        ),
    );
    registry.register(
        names::FINDY_API_LEDGER,
        TracedLedger::new(names::FINDY_API_LEDGER, ApiLedger::new(config.api.clone())),
    );
    registry.register(
        names::FINDY_IMMUDB_LEDGER,
        TracedLedger::new(
            names::FINDY_IMMUDB_LEDGER,
            DbLedger::from_config(config.db.clone()),
        ),
    );
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
