// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ledger that logs every read and write it serves

use async_trait::async_trait;
use lm_core::{Ledger, LedgerError, Record, TxInfo};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory ledger that echoes its traffic to the log
#[derive(Debug, Clone, Default)]
pub struct EchoLedger {
    store: Arc<RwLock<HashMap<String, String>>>,
}

impl EchoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&self) {
        self.store
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

#[async_trait]
impl Ledger for EchoLedger {
    async fn open(&self, arg: &str) -> Result<(), LedgerError> {
        tracing::info!(arg, "opening echo ledger");
        self.reset();
        Ok(())
    }

    async fn close(&self) {
        tracing::info!("closing echo ledger");
        self.reset();
    }

    async fn write(&self, tx: &TxInfo, id: &str, data: &str) -> Result<(), LedgerError> {
        tracing::info!(%tx, id, data, "ledger WRITE");
        self.store
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.to_string(), data.to_string());
        Ok(())
    }

    async fn read(&self, tx: &TxInfo, id: &str) -> Result<Record, LedgerError> {
        let value = self
            .store
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned();
        tracing::info!(%tx, id, value = ?value, "ledger READ");
        value
            .map(|value| Record::new(id, value))
            .ok_or_else(|| LedgerError::not_found(id))
    }
}
