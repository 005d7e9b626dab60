// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced ledger wrapper for consistent observability

use async_trait::async_trait;
use lm_core::{Ledger, LedgerError, Record, TxInfo};
use tracing::Instrument;

/// Wrapper that adds tracing to any Ledger
#[derive(Clone)]
pub struct TracedLedger<L> {
    name: String,
    inner: L,
}

impl<L> TracedLedger<L> {
    pub fn new(name: impl Into<String>, inner: L) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

#[async_trait]
impl<L: Ledger> Ledger for TracedLedger<L> {
    async fn open(&self, arg: &str) -> Result<(), LedgerError> {
        let span = tracing::info_span!("ledger.open", ledger = %self.name, arg);
        async {
            tracing::info!("opening");

            let start = std::time::Instant::now();
            let result = self.inner.open(arg).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "opened"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "open failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn close(&self) {
        let span = tracing::info_span!("ledger.close", ledger = %self.name);
        async {
            self.inner.close().await;
            tracing::info!("closed");
        }
        .instrument(span)
        .await
    }

    async fn write(&self, tx: &TxInfo, id: &str, data: &str) -> Result<(), LedgerError> {
        let span = tracing::info_span!("ledger.write", ledger = %self.name, id, tx = %tx);
        async {
            tracing::debug!(data_len = data.len(), "writing");

            let start = std::time::Instant::now();
            let result = self.inner.write(tx, id, data).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "written"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "write failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn read(&self, tx: &TxInfo, id: &str) -> Result<Record, LedgerError> {
        let span = tracing::info_span!("ledger.read", ledger = %self.name, id, tx = %tx);
        async {
            let start = std::time::Instant::now();
            let result = self.inner.read(tx, id).await;
            let elapsed = start.elapsed();

            // A miss is ordinary control flow for caches
            match &result {
                Ok(record) => tracing::debug!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    value_len = record.value.len(),
                    "read"
                ),
                Err(e) if e.is_not_found() => {
                    tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "not found")
                }
                Err(e) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "read failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
