// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lm-core: shared vocabulary for the ledger multiplexer
//!
//! This crate provides:
//! - The [`Ledger`] plugin contract every backend implements
//! - [`TxInfo`], the per-call description of a ledger record
//! - [`LedgerError`], including the distinguished not-found sentinel
//! - A [`Clock`] abstraction for token ages and other testable time

pub mod clock;
pub mod error;
pub mod ledger;
pub mod tx;

pub use clock::{Clock, FakeClock, SystemClock};
pub use error::{LedgerError, WriteErrors, WriteFailure};
pub use ledger::{names, Ledger, LedgerRef, Record};
pub use tx::{TxInfo, TxType};
