// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Ledger backends that plug into a session

pub mod api;
pub mod db;
pub mod echo;
pub mod file;
pub mod mem;
pub mod traced;

pub use api::{ApiConfig, ApiLedger};
pub use db::{
    Credentials, DbConfig, DbLedger, EnvError, HttpRemoteStore, LocalRemoteStore, LocalStoreStats,
    RemoteBackend, RemoteError, RemoteStore, RetryPolicy,
};
pub use echo::EchoLedger;
pub use file::FileLedger;
pub use mem::MemLedger;
pub use traced::TracedLedger;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLedger, LedgerCall};
