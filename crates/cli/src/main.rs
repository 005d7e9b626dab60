// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! lm - ledger multiplexer CLI

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{ledger, plugins};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lm",
    version,
    about = "Ledger multiplexer - read and write through a pool of ledger plugins"
)]
struct Cli {
    /// Pool configuration file (TOML)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Plugins to open, as `NAME,ARG[,NAME,ARG]` or a bare pool name.
    /// Overrides the configured ledgers.
    #[arg(long, global = true)]
    ledgers: Option<String>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered ledger plugins
    Plugins,
    /// Write a record to every open ledger
    Write(ledger::WriteArgs),
    /// Read a record, preferring the cache ledger when one is open
    Read(ledger::ReadArgs),
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ledger::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Plugins => plugins::list(&config),
        Commands::Write(args) => ledger::write(&config, cli.ledgers.as_deref(), args).await,
        Commands::Read(args) => ledger::read(&config, cli.ledgers.as_deref(), args).await,
    }
}
