// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The plugin contract every ledger backend implements

use crate::error::LedgerError;
use crate::tx::TxInfo;
use async_trait::async_trait;
use std::sync::Arc;

/// Well-known plugin names
pub mod names {
    /// The real distributed ledger. Bare legacy pool names resolve to it.
    pub const FINDY_LEDGER: &str = "FINDY_LEDGER";
    pub const FINDY_MEM_LEDGER: &str = "FINDY_MEM_LEDGER";
    pub const FINDY_FILE_LEDGER: &str = "FINDY_FILE_LEDGER";
    pub const FINDY_ECHO_LEDGER: &str = "FINDY_ECHO_LEDGER";
    pub const FINDY_API_LEDGER: &str = "FINDY_API_LEDGER";
    pub const FINDY_IMMUDB_LEDGER: &str = "FINDY_IMMUDB_LEDGER";
}

/// A value read from a ledger, keyed by the transaction id it was stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub value: String,
}

impl Record {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// Shared handle to a registered backend
pub type LedgerRef = Arc<dyn Ledger>;

/// Storage backend that can be opened under a session.
///
/// Implementations must tolerate concurrent `read`/`write` calls on the same
/// instance and guard their own state.
#[async_trait]
pub trait Ledger: Send + Sync + 'static {
    /// Prepare to serve `arg`. Called on every session open, not only the
    /// first, and expected to reset stale state such as caches.
    async fn open(&self, arg: &str) -> Result<(), LedgerError>;

    /// Release resources. Failures are logged by the backend, never returned.
    async fn close(&self);

    /// Upsert `data` under `id`
    async fn write(&self, tx: &TxInfo, id: &str, data: &str) -> Result<(), LedgerError>;

    /// Fetch the value stored under `id`.
    ///
    /// An absent key is reported as [`LedgerError::NotFound`], never as an
    /// empty value.
    async fn read(&self, tx: &TxInfo, id: &str) -> Result<Record, LedgerError>;
}

#[async_trait]
impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    async fn open(&self, arg: &str) -> Result<(), LedgerError> {
        (**self).open(arg).await
    }

    async fn close(&self) {
        (**self).close().await
    }

    async fn write(&self, tx: &TxInfo, id: &str, data: &str) -> Result<(), LedgerError> {
        (**self).write(tx, id, data).await
    }

    async fn read(&self, tx: &TxInfo, id: &str) -> Result<Record, LedgerError> {
        (**self).read(tx, id).await
    }
}
