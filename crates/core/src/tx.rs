// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transaction descriptors passed along with every ledger read and write

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic kind of a ledger record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxType {
    /// Identity (NYM) record
    Did,
    Schema,
    /// Credential definition record
    CredDef,
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxType::Did => write!(f, "DID"),
            TxType::Schema => write!(f, "SCHEMA"),
            TxType::CredDef => write!(f, "CRED_DEF"),
        }
    }
}

/// Describes the record a read or write is about.
///
/// Built per call by the caller and never persisted. Backends may ignore any
/// field that does not matter to their storage model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInfo {
    pub tx_type: TxType,
    pub submitter_did: String,
    pub ver_key: Option<String>,
    pub alias: Option<String>,
    pub role: Option<String>,
    /// Set when the write refills a cache from an authoritative read
    /// rather than publishing a new record.
    #[serde(default)]
    pub update: bool,
}

impl TxInfo {
    pub fn new(tx_type: TxType) -> Self {
        Self {
            tx_type,
            submitter_did: String::new(),
            ver_key: None,
            alias: None,
            role: None,
            update: false,
        }
    }

    pub fn did() -> Self {
        Self::new(TxType::Did)
    }

    pub fn schema() -> Self {
        Self::new(TxType::Schema)
    }

    pub fn cred_def() -> Self {
        Self::new(TxType::CredDef)
    }

    pub fn with_submitter(mut self, did: impl Into<String>) -> Self {
        self.submitter_did = did.into();
        self
    }

    pub fn with_ver_key(mut self, ver_key: impl Into<String>) -> Self {
        self.ver_key = Some(ver_key.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Copy of this descriptor marked as a cache refill
    pub fn as_update(&self) -> Self {
        Self {
            update: true,
            ..self.clone()
        }
    }

    pub fn is_schema(&self) -> bool {
        self.tx_type == TxType::Schema
    }
}

impl fmt::Display for TxInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tx_type)?;
        if !self.submitter_did.is_empty() {
            write!(f, " by {}", self.submitter_did)?;
        }
        if self.update {
            write!(f, " (update)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tx_tests.rs"]
mod tests;
