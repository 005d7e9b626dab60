// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Name to plugin mapping, filled once at startup

use lm_core::{Ledger, LedgerRef};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registered ledger plugins by name
#[derive(Clone, Default)]
pub struct Registry {
    plugins: BTreeMap<String, LedgerRef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `ledger` under `name`. A later registration under the same
    /// name replaces the earlier one.
    pub fn register<L: Ledger>(&mut self, name: impl Into<String>, ledger: L) {
        self.register_shared(name, Arc::new(ledger));
    }

    pub fn register_shared(&mut self, name: impl Into<String>, ledger: LedgerRef) {
        let name = name.into();
        if self.plugins.insert(name.clone(), ledger).is_some() {
            tracing::warn!(plugin = %name, "plugin registered twice, keeping the latest");
        } else {
            tracing::debug!(plugin = %name, "plugin registered");
        }
    }

    pub fn get(&self, name: &str) -> Option<LedgerRef> {
        self.plugins.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Registered names, sorted
    pub fn list_plugins(&self) -> Vec<String> {
        self.plugins.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
