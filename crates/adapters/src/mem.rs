// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transient in-memory ledger
//!
//! Convenient for unit tests and development, and usable as the cache half
//! of a two-ledger session.

use async_trait::async_trait;
use lm_core::{Ledger, LedgerError, Record, TxInfo};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A freshly installed ledger hands out sequence numbers from about here
const INITIAL_SEQ_NO: u64 = 4;

const UNRESOLVED_SEQ_NO: &str = "null";

#[derive(Debug)]
struct MemState {
    store: HashMap<String, String>,
    seq_no: u64,
    cache_mode: bool,
}

impl Default for MemState {
    fn default() -> Self {
        Self {
            store: HashMap::new(),
            seq_no: INITIAL_SEQ_NO,
            cache_mode: false,
        }
    }
}

/// In-memory ledger. Clones share the same store.
///
/// Opened with a non-empty argument it runs in cache mode: a schema whose
/// sequence number is still unresolved reads as not found, so the
/// authoritative ledger gets asked instead.
#[derive(Debug, Clone, Default)]
pub struct MemLedger {
    state: Arc<Mutex<MemState>>,
}

impl MemLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current sequence number
    pub fn seq_no(&self) -> u64 {
        self.lock().seq_no
    }

    pub fn is_cache_mode(&self) -> bool {
        self.lock().cache_mode
    }

    /// Raw stored value, bypassing ledger read semantics
    pub fn get(&self, id: &str) -> Option<String> {
        self.lock().store.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().store.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Ledger for MemLedger {
    async fn open(&self, arg: &str) -> Result<(), LedgerError> {
        let mut state = self.lock();
        state.store.clear();
        state.seq_no += 1;
        state.cache_mode = !arg.is_empty();
        tracing::debug!(cache_mode = state.cache_mode, "mem ledger reset");
        Ok(())
    }

    async fn close(&self) {
        self.lock().store.clear();
    }

    async fn write(&self, _tx: &TxInfo, id: &str, data: &str) -> Result<(), LedgerError> {
        let mut state = self.lock();
        state.seq_no += 1;
        state.store.insert(id.to_string(), data.to_string());
        Ok(())
    }

    async fn read(&self, tx: &TxInfo, id: &str) -> Result<Record, LedgerError> {
        let mut state = self.lock();
        let seq_no = state.seq_no;
        let cache_mode = state.cache_mode;

        let Some(value) = state.store.get_mut(id) else {
            return Err(LedgerError::not_found(id));
        };

        // First read of a schema assigns its sequence number, like the real ledger
        if tx.is_schema() && value.contains(UNRESOLVED_SEQ_NO) {
            if cache_mode {
                return Err(LedgerError::not_found(id));
            }
            *value = value.replacen(UNRESOLVED_SEQ_NO, &seq_no.to_string(), 1);
        }

        Ok(Record::new(id, value.clone()))
    }
}

#[cfg(test)]
#[path = "mem_tests.rs"]
mod tests;
