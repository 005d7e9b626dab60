// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrent write to every open plugin

use crate::session::OpenPlugin;
use lm_core::{Ledger, LedgerError, TxInfo, WriteErrors};

/// Write to all `plugins` at once and wait for every one of them.
///
/// A failing plugin never stops the others; all failures are collected
/// into one [`LedgerError::WriteFailed`].
pub async fn fan_out_write(
    plugins: &[OpenPlugin],
    tx: &TxInfo,
    id: &str,
    data: &str,
) -> Result<(), LedgerError> {
    let tasks: Vec<_> = plugins
        .iter()
        .map(|plugin| {
            let ledger = plugin.ledger.clone();
            let tx = tx.clone();
            let id = id.to_string();
            let data = data.to_string();
            let task = tokio::spawn(async move { ledger.write(&tx, &id, &data).await });
            (plugin.name.clone(), task)
        })
        .collect();

    let mut errors = WriteErrors::new();
    for (name, task) in tasks {
        let result = match task.await {
            Ok(result) => result,
            Err(e) => Err(LedgerError::Task(e.to_string())),
        };
        if let Err(e) = result {
            tracing::error!(ledger = %name, %id, %tx, error = %e, "plugin write failed");
            errors.push(name, e);
        }
    }
    errors.into_result()
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
