// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Ledger pool: opens several ledger plugins under one handle, writes to all
//! of them and reads through an authoritative ledger and its cache.

pub mod args;
pub mod config;
mod handle;
mod reader;
mod registry;
mod session;
mod writer;

pub use args::ArgsError;
pub use config::{register_builtin, ConfigError, FileConfig, LedgerSpec, PoolConfig};
pub use handle::Handle;
pub use reader::{race_read, ReadSources};
pub use registry::Registry;
pub use session::{LedgerSession, OpenPlugin};
pub use writer::fan_out_write;
