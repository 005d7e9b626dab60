// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-file-backed ledger
//!
//! Keeps every record in memory and rewrites `<dir>/<name>.json` on each
//! write. The file is loaded again on open, so data survives process restarts.

use async_trait::async_trait;
use lm_core::{names, Ledger, LedgerError, Record, TxInfo};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct FileState {
    path: Option<PathBuf>,
    store: BTreeMap<String, String>,
}

/// Ledger persisted as one JSON object per ledger name
#[derive(Debug, Clone)]
pub struct FileLedger {
    dir: PathBuf,
    state: Arc<Mutex<FileState>>,
}

impl FileLedger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            state: Arc::new(Mutex::new(FileState::default())),
        }
    }

    /// `~/.indy_client`, where the native SDK keeps its own client files
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".indy_client"))
    }

    /// Path of the currently open ledger file
    pub fn path(&self) -> Option<PathBuf> {
        self.lock().path.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FileState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn file_for(&self, arg: &str) -> PathBuf {
        let name = if arg.is_empty() {
            names::FINDY_FILE_LEDGER
        } else {
            arg
        };
        self.dir.join(format!("{}.json", name))
    }
}

fn load(path: &Path) -> Result<BTreeMap<String, String>, LedgerError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn save(path: &Path, store: &BTreeMap<String, String>) -> Result<(), LedgerError> {
    let json = serde_json::to_string_pretty(store)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[async_trait]
impl Ledger for FileLedger {
    async fn open(&self, arg: &str) -> Result<(), LedgerError> {
        let path = self.file_for(arg);
        std::fs::create_dir_all(&self.dir)?;
        let store = load(&path)?;

        tracing::debug!(path = %path.display(), records = store.len(), "file ledger loaded");

        let mut state = self.lock();
        state.store = store;
        state.path = Some(path);
        Ok(())
    }

    async fn close(&self) {
        let mut state = self.lock();
        state.path = None;
        state.store.clear();
    }

    async fn write(&self, _tx: &TxInfo, id: &str, data: &str) -> Result<(), LedgerError> {
        let mut state = self.lock();
        let Some(path) = state.path.clone() else {
            return Err(LedgerError::Closed(names::FINDY_FILE_LEDGER.to_string()));
        };
        state.store.insert(id.to_string(), data.to_string());
        save(&path, &state.store)
    }

    async fn read(&self, _tx: &TxInfo, id: &str) -> Result<Record, LedgerError> {
        let state = self.lock();
        state
            .store
            .get(id)
            .map(|value| Record::new(id, value.clone()))
            .ok_or_else(|| LedgerError::not_found(id))
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
