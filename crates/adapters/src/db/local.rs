// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process remote store
//!
//! Selected by the `mock` database address, and used by tests to inject
//! failures and count remote attempts.

use super::remote::{Credentials, RemoteError, RemoteStore};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Per-method call counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalStoreStats {
    pub login_attempts: u32,
    pub logins_ok: u32,
    pub set_attempts: u32,
    pub sets_ok: u32,
    pub get_attempts: u32,
    pub gets_ok: u32,
    pub logout_attempts: u32,
    pub logouts_ok: u32,
}

#[derive(Debug, Default)]
struct LocalState {
    store: HashMap<String, String>,
    tokens: HashSet<String>,
    issued: u64,
    fail_logins: u32,
    fail_sets: u32,
    fail_gets: u32,
    fail_logouts: u32,
    stats: LocalStoreStats,
}

/// Take one injected failure from `counter` if any are pending
fn take_failure(counter: &mut u32) -> bool {
    if *counter > 0 {
        *counter -= 1;
        true
    } else {
        false
    }
}

/// Key-value store living in this process. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct LocalRemoteStore {
    state: Arc<Mutex<LocalState>>,
}

impl LocalRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LocalState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make the next `n` logins fail
    pub fn fail_next_logins(&self, n: u32) {
        self.lock().fail_logins = n;
    }

    /// Make the next `n` sets fail
    pub fn fail_next_sets(&self, n: u32) {
        self.lock().fail_sets = n;
    }

    /// Make the next `n` gets fail
    pub fn fail_next_gets(&self, n: u32) {
        self.lock().fail_gets = n;
    }

    /// Make the next `n` logouts fail
    pub fn fail_next_logouts(&self, n: u32) {
        self.lock().fail_logouts = n;
    }

    pub fn stats(&self) -> LocalStoreStats {
        self.lock().stats
    }

    /// Stored value, bypassing authentication
    pub fn value(&self, key: &str) -> Option<String> {
        self.lock().store.get(key).cloned()
    }

    /// Seed a value, bypassing authentication
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.lock().store.insert(key.into(), value.into());
    }

    pub fn is_token_valid(&self, token: &str) -> bool {
        self.lock().tokens.contains(token)
    }

    fn check_token(state: &LocalState, token: &str) -> Result<(), RemoteError> {
        if state.tokens.contains(token) {
            Ok(())
        } else {
            Err(RemoteError::Unauthorized(format!("unknown token {}", token)))
        }
    }
}

#[async_trait]
impl RemoteStore for LocalRemoteStore {
    async fn login(&self, credentials: &Credentials) -> Result<String, RemoteError> {
        let mut state = self.lock();
        state.stats.login_attempts += 1;
        if take_failure(&mut state.fail_logins) {
            return Err(RemoteError::Connect("injected login failure".to_string()));
        }
        state.issued += 1;
        let token = format!("LOCAL_TOKEN_{}_{}", credentials.database, state.issued);
        state.tokens.insert(token.clone());
        state.stats.logins_ok += 1;
        tracing::trace!(user = %credentials.user, "local store login");
        Ok(token)
    }

    async fn set(&self, token: &str, key: &str, value: &str) -> Result<(), RemoteError> {
        let mut state = self.lock();
        state.stats.set_attempts += 1;
        if take_failure(&mut state.fail_sets) {
            return Err(RemoteError::Request("injected set failure".to_string()));
        }
        Self::check_token(&state, token)?;
        state.store.insert(key.to_string(), value.to_string());
        state.stats.sets_ok += 1;
        Ok(())
    }

    async fn get(&self, token: &str, key: &str) -> Result<Option<String>, RemoteError> {
        let mut state = self.lock();
        state.stats.get_attempts += 1;
        if take_failure(&mut state.fail_gets) {
            return Err(RemoteError::Request("injected get failure".to_string()));
        }
        Self::check_token(&state, token)?;
        state.stats.gets_ok += 1;
        Ok(state.store.get(key).cloned())
    }

    async fn logout(&self, token: &str) -> Result<(), RemoteError> {
        let mut state = self.lock();
        state.stats.logout_attempts += 1;
        if take_failure(&mut state.fail_logouts) {
            return Err(RemoteError::Request("injected logout failure".to_string()));
        }
        Self::check_token(&state, token)?;
        state.tokens.remove(token);
        state.stats.logouts_ok += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
