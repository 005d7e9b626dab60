// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared by every ledger backend and the multiplexer

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors from ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The key is absent. Distinct from a present key holding an empty value.
    #[error("not found: {0}")]
    NotFound(String),
    #[error("remote error: {0}")]
    Remote(String),
    #[error("{op} timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ledger is closed: {0}")]
    Closed(String),
    #[error("open failed: {0}")]
    OpenFailed(String),
    /// One or more plugins failed during a fan-out write
    #[error("plugin write error: {0}")]
    WriteFailed(WriteErrors),
    /// A backend task panicked or was cancelled
    #[error("ledger task failed: {0}")]
    Task(String),
    #[error("no ledger plugins open")]
    NoLedgerOpen,
    #[error("unsupported number of open ledger plugins: {0}")]
    UnsupportedLedgerCount(usize),
}

impl LedgerError {
    pub fn not_found(id: impl Into<String>) -> Self {
        LedgerError::NotFound(id.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound(_))
    }

    /// Programmer error in wiring the session, not a runtime condition
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            LedgerError::NoLedgerOpen | LedgerError::UnsupportedLedgerCount(_)
        )
    }

    /// Worth retrying later (network, timeout, remote-side failure)
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LedgerError::Remote(_) | LedgerError::Timeout { .. } | LedgerError::Io(_)
        )
    }
}

/// A single plugin's failure inside a fan-out write
#[derive(Debug)]
pub struct WriteFailure {
    pub ledger: String,
    pub error: LedgerError,
}

/// Every failure collected during one fan-out write
#[derive(Debug, Default)]
pub struct WriteErrors {
    failures: Vec<WriteFailure>,
}

impl WriteErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ledger: impl Into<String>, error: LedgerError) {
        self.failures.push(WriteFailure {
            ledger: ledger.into(),
            error,
        });
    }

    pub fn failures(&self) -> &[WriteFailure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Ok` only when nothing failed
    pub fn into_result(self) -> Result<(), LedgerError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::WriteFailed(self))
        }
    }
}

impl fmt::Display for WriteErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", failure.ledger, failure.error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
