// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake ledger for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use async_trait::async_trait;
use lm_core::{Ledger, LedgerError, Record, TxInfo};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded ledger call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    Open { arg: String },
    Close,
    Write { tx: TxInfo, id: String, data: String },
    Read { tx: TxInfo, id: String },
}

#[derive(Debug, Default)]
struct FakeState {
    store: HashMap<String, String>,
    calls: Vec<LedgerCall>,
    open: bool,
    read_delay: Duration,
    write_delay: Duration,
    open_error: Option<String>,
    read_error: Option<String>,
    write_error: Option<String>,
    record_id: Option<String>,
}

/// Fake ledger for testing. Clones share the same state.
///
/// Missing keys read as not found; reads and writes can be delayed or made
/// to fail with a remote error.
#[derive(Debug, Clone, Default)]
pub struct FakeLedger {
    state: Arc<Mutex<FakeState>>,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored value
    pub fn with_value(self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_value(id, value);
        self
    }

    pub fn set_value(&self, id: impl Into<String>, value: impl Into<String>) {
        self.lock().store.insert(id.into(), value.into());
    }

    /// Delay every read by `delay` before answering
    pub fn set_read_delay(&self, delay: Duration) {
        self.lock().read_delay = delay;
    }

    /// Delay every write by `delay` before applying it
    pub fn set_write_delay(&self, delay: Duration) {
        self.lock().write_delay = delay;
    }

    /// Answer every hit under `id` instead of the requested id
    pub fn set_record_id(&self, id: impl Into<String>) {
        self.lock().record_id = Some(id.into());
    }

    /// Make every following write fail with a remote error
    pub fn fail_writes(&self, message: impl Into<String>) {
        self.lock().write_error = Some(message.into());
    }

    /// Make every following read fail with a remote error
    pub fn fail_reads(&self, message: impl Into<String>) {
        self.lock().read_error = Some(message.into());
    }

    /// Make every following open fail
    pub fn fail_open(&self, message: impl Into<String>) {
        self.lock().open_error = Some(message.into());
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.lock().calls.clone()
    }

    /// Recorded writes as `(tx, id, data)`
    pub fn writes(&self) -> Vec<(TxInfo, String, String)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                LedgerCall::Write { tx, id, data } => Some((tx.clone(), id.clone(), data.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.count(|call| matches!(call, LedgerCall::Write { .. }))
    }

    pub fn read_count(&self) -> usize {
        self.count(|call| matches!(call, LedgerCall::Read { .. }))
    }

    /// Stored value for `id`
    pub fn value(&self, id: &str) -> Option<String> {
        self.lock().store.get(id).cloned()
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    fn count(&self, pred: impl Fn(&LedgerCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|call| pred(call)).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Ledger for FakeLedger {
    async fn open(&self, arg: &str) -> Result<(), LedgerError> {
        let mut state = self.lock();
        state.calls.push(LedgerCall::Open {
            arg: arg.to_string(),
        });
        if let Some(message) = &state.open_error {
            return Err(LedgerError::OpenFailed(message.clone()));
        }
        state.open = true;
        Ok(())
    }

    async fn close(&self) {
        let mut state = self.lock();
        state.calls.push(LedgerCall::Close);
        state.open = false;
    }

    async fn write(&self, tx: &TxInfo, id: &str, data: &str) -> Result<(), LedgerError> {
        let delay = {
            let mut state = self.lock();
            state.calls.push(LedgerCall::Write {
                tx: tx.clone(),
                id: id.to_string(),
                data: data.to_string(),
            });
            state.write_delay
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.lock();
        if let Some(message) = &state.write_error {
            return Err(LedgerError::Remote(message.clone()));
        }
        state.store.insert(id.to_string(), data.to_string());
        Ok(())
    }

    async fn read(&self, tx: &TxInfo, id: &str) -> Result<Record, LedgerError> {
        let delay = {
            let mut state = self.lock();
            state.calls.push(LedgerCall::Read {
                tx: tx.clone(),
                id: id.to_string(),
            });
            state.read_delay
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let state = self.lock();
        if let Some(message) = &state.read_error {
            return Err(LedgerError::Remote(message.clone()));
        }
        state
            .store
            .get(id)
            .map(|value| Record::new(state.record_id.as_deref().unwrap_or(id), value.clone()))
            .ok_or_else(|| LedgerError::not_found(id))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
