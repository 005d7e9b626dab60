// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ledger session: the set of plugins opened under one pool handle

use crate::args::{self, ArgsError};
use crate::handle::Handle;
use crate::reader::{race_read, ReadSources};
use crate::registry::Registry;
use crate::writer::fan_out_write;
use lm_core::{Ledger, LedgerError, LedgerRef, Record, TxInfo};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A plugin opened in the session
#[derive(Clone)]
pub struct OpenPlugin {
    pub handle: Handle,
    pub name: String,
    pub ledger: LedgerRef,
}

/// Open plugins in allocation order
struct OpenTable {
    plugins: Vec<OpenPlugin>,
    next: Handle,
}

impl Default for OpenTable {
    fn default() -> Self {
        Self {
            plugins: Vec::new(),
            next: Handle::FIRST_PLUGIN,
        }
    }
}

impl OpenTable {
    fn allocate(&mut self, name: &str, ledger: LedgerRef) -> Handle {
        let handle = self.next;
        self.next = handle.next();
        self.plugins.push(OpenPlugin {
            handle,
            name: name.to_string(),
            ledger,
        });
        handle
    }

    /// Most recently allocated handle, or `NONE`
    fn last(&self) -> Handle {
        self.plugins
            .last()
            .map(|plugin| plugin.handle)
            .unwrap_or(Handle::NONE)
    }
}

/// Multiplexes reads and writes over the plugins opened under one handle
pub struct LedgerSession {
    registry: Arc<Registry>,
    table: Mutex<OpenTable>,
}

impl LedgerSession {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            table: Mutex::new(OpenTable::default()),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Open plugins named by `args` and return the last allocated handle.
    ///
    /// Unknown plugins and plugins whose open fails are logged and skipped
    /// without using up a handle. Returns `Handle::NONE` if nothing opened.
    pub async fn open_ledger(&self, args: &[&str]) -> Result<Handle, ArgsError> {
        let pairs = args::normalize(args, &self.registry)?;
        let mut table = self.table.lock().await;

        for (name, arg) in pairs {
            let Some(ledger) = self.registry.get(&name) else {
                tracing::warn!(plugin = %name, arg = %arg, "plugin not registered");
                continue;
            };
            match ledger.open(&arg).await {
                Ok(()) => {
                    let handle = table.allocate(&name, ledger);
                    tracing::info!(plugin = %name, arg = %arg, %handle, "plugin opened");
                }
                Err(e) => {
                    tracing::warn!(plugin = %name, arg = %arg, error = %e, "plugin open failed");
                }
            }
        }

        Ok(table.last())
    }

    /// Close every open plugin and reset handle allocation.
    ///
    /// Native ledger handles are owned elsewhere and only logged here.
    pub async fn close_ledger(&self, handle: Handle) {
        let closing = std::mem::take(&mut *self.table.lock().await);
        for plugin in &closing.plugins {
            plugin.ledger.close().await;
            tracing::debug!(plugin = %plugin.name, handle = %plugin.handle, "plugin closed");
        }
        if handle.is_native() {
            tracing::debug!(%handle, "native ledger handle left to its owner");
        }
        tracing::info!(count = closing.plugins.len(), "ledger session closed");
    }

    /// Write `data` to every open plugin concurrently
    pub async fn write(&self, tx: &TxInfo, id: &str, data: &str) -> Result<(), LedgerError> {
        let plugins = self.open_plugins().await;
        fan_out_write(&plugins, tx, id, data).await
    }

    /// Read `id` from the first opened plugin, racing it against the second
    /// one as a cache when two are open
    pub async fn read(&self, tx: &TxInfo, id: &str) -> Result<Record, LedgerError> {
        let plugins = self.open_plugins().await;
        let sources = match plugins.as_slice() {
            [] => {
                tracing::error!(%id, "read with no ledger plugins open");
                return Err(LedgerError::NoLedgerOpen);
            }
            [only] => ReadSources::single(only.clone()),
            [authoritative, cache] => ReadSources::with_cache(authoritative.clone(), cache.clone()),
            many => {
                tracing::error!(%id, count = many.len(), "read with too many ledger plugins open");
                return Err(LedgerError::UnsupportedLedgerCount(many.len()));
            }
        };
        race_read(sources, tx, id).await
    }

    /// Snapshot of the open plugins in allocation order
    pub async fn open_plugins(&self) -> Vec<OpenPlugin> {
        self.table.lock().await.plugins.clone()
    }

    pub async fn is_open(&self) -> bool {
        !self.table.lock().await.plugins.is_empty()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
