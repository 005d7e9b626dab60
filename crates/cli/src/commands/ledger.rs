// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lm write` / `lm read` - Record access through a ledger session

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use lm_adapters::{ApiConfig, DbConfig};
use lm_core::{TxInfo, TxType};
use lm_pool::{register_builtin, Handle, LedgerSession, PoolConfig, Registry};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TxKind {
    Did,
    Schema,
    CredDef,
}

impl From<TxKind> for TxType {
    fn from(kind: TxKind) -> Self {
        match kind {
            TxKind::Did => TxType::Did,
            TxKind::Schema => TxType::Schema,
            TxKind::CredDef => TxType::CredDef,
        }
    }
}

#[derive(Args)]
pub struct TxArgs {
    /// Kind of record
    #[arg(long = "tx", value_enum, default_value = "did")]
    pub kind: TxKind,

    /// Submitter DID
    #[arg(long)]
    pub submitter: Option<String>,
}

impl TxArgs {
    fn tx_info(&self) -> TxInfo {
        let tx = TxInfo::new(self.kind.into());
        match &self.submitter {
            Some(did) => tx.with_submitter(did),
            None => tx,
        }
    }
}

#[derive(Args)]
pub struct WriteArgs {
    /// Record id
    pub id: String,

    /// Record data
    pub data: String,

    #[command(flatten)]
    pub tx: TxArgs,
}

#[derive(Args)]
pub struct ReadArgs {
    /// Record id
    pub id: String,

    #[command(flatten)]
    pub tx: TxArgs,
}

/// Configuration from `path`, or from the environment when no file is given
pub fn load_config(path: Option<&Path>) -> Result<PoolConfig> {
    match path {
        Some(path) => PoolConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(PoolConfig {
            db: DbConfig::from_env()?,
            api: ApiConfig::from_env(),
            ..PoolConfig::default()
        }),
    }
}

async fn open_session(
    config: &PoolConfig,
    ledgers: Option<&str>,
) -> Result<(LedgerSession, Handle)> {
    let mut registry = Registry::new();
    register_builtin(&mut registry, config)?;
    let session = LedgerSession::new(Arc::new(registry));

    let args = match ledgers {
        Some(ledgers) => vec![ledgers],
        None => config.open_args(),
    };
    if args.is_empty() {
        bail!("no ledgers configured, pass --ledgers or list them in the config file");
    }

    let handle = session.open_ledger(&args).await?;
    if handle == Handle::NONE {
        bail!("none of the requested ledger plugins could be opened");
    }
    Ok((session, handle))
}

pub async fn write(config: &PoolConfig, ledgers: Option<&str>, args: WriteArgs) -> Result<()> {
    let (session, handle) = open_session(config, ledgers).await?;

    let result = session.write(&args.tx.tx_info(), &args.id, &args.data).await;
    session.close_ledger(handle).await;

    result?;
    println!("Written: {}", args.id);
    Ok(())
}

pub async fn read(config: &PoolConfig, ledgers: Option<&str>, args: ReadArgs) -> Result<()> {
    let (session, handle) = open_session(config, ledgers).await?;

    let result = session.read(&args.tx.tx_info(), &args.id).await;
    session.close_ledger(handle).await;

    let record = result?;
    println!("{}", record.value);
    Ok(())
}
