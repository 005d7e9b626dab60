// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lm plugins` - List registered ledger plugins

use anyhow::Result;
use lm_pool::{register_builtin, PoolConfig, Registry};

pub fn list(config: &PoolConfig) -> Result<()> {
    let mut registry = Registry::new();
    register_builtin(&mut registry, config)?;

    for name in registry.list_plugins() {
        println!("{}", name);
    }
    Ok(())
}
