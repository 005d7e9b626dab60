// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ledger backed by an external key-value database
//!
//! Keeps a local mirror of everything written or read. Remote calls run on
//! a background worker that owns the session token and logs in again once
//! the token gets old. A rejected write is reported as success and retried
//! in the background with exponential backoff until the ledger is closed.

mod config;
mod http;
mod local;
mod remote;
mod retry;
mod worker;

pub use config::{DbConfig, EnvError, RetryPolicy, MOCK_ADDRESS};
pub use http::HttpRemoteStore;
pub use local::{LocalRemoteStore, LocalStoreStats};
pub use remote::{Credentials, RemoteBackend, RemoteError, RemoteStore};

use async_trait::async_trait;
use lm_core::{Clock, Ledger, LedgerError, Record, SystemClock, TxInfo};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tokio::task::JoinHandle;
use retry::{Generations, PendingWrite};
use worker::{WorkerClient, WorkerHandle};

struct Shared<R, C> {
    remote: R,
    clock: C,
    config: DbConfig,
    cache: RwLock<HashMap<String, String>>,
    worker: tokio::sync::Mutex<Option<WorkerHandle>>,
    retries: Mutex<Vec<JoinHandle<bool>>>,
    generations: Generations,
}

/// Database ledger. Clones share the same cache and worker.
pub struct DbLedger<R: RemoteStore, C: Clock = SystemClock> {
    shared: Arc<Shared<R, C>>,
}

impl<R: RemoteStore, C: Clock> Clone for DbLedger<R, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl DbLedger<RemoteBackend> {
    /// Ledger talking to the store `config` points at
    pub fn from_config(config: DbConfig) -> Self {
        Self::new(RemoteBackend::from_config(&config), config)
    }
}

impl<R: RemoteStore> DbLedger<R> {
    pub fn new(remote: R, config: DbConfig) -> Self {
        Self::with_clock(remote, config, SystemClock)
    }
}

impl<R: RemoteStore, C: Clock> DbLedger<R, C> {
    pub fn with_clock(remote: R, config: DbConfig, clock: C) -> Self {
        Self {
            shared: Arc::new(Shared {
                remote,
                clock,
                config,
                cache: RwLock::new(HashMap::new()),
                worker: tokio::sync::Mutex::new(None),
                retries: Mutex::new(Vec::new()),
                generations: Generations::default(),
            }),
        }
    }

    pub fn config(&self) -> &DbConfig {
        &self.shared.config
    }

    /// Drop every locally mirrored value
    pub fn reset_mem_cache(&self) {
        self.shared
            .cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Locally mirrored value for `id`
    pub fn cached(&self, id: &str) -> Option<String> {
        self.shared
            .cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    /// Write-behind retries that have not finished yet
    pub fn pending_retries(&self) -> usize {
        let mut retries = self.retries();
        retries.retain(|task| !task.is_finished());
        retries.len()
    }

    fn retries(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<bool>>> {
        self.shared
            .retries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn cache_insert(&self, id: &str, value: &str) {
        self.shared
            .cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.to_string(), value.to_string());
    }

    async fn client(&self) -> Result<WorkerClient, LedgerError> {
        self.shared
            .worker
            .lock()
            .await
            .as_ref()
            .map(WorkerHandle::client)
            .ok_or_else(|| LedgerError::Closed("database ledger is not open".to_string()))
    }

    /// Stop the worker, wait out cancelled retries and end the session
    async fn shutdown(&self, handle: WorkerHandle) {
        let session = handle.stop().await;

        let retries: Vec<_> = self.retries().drain(..).collect();
        for task in retries {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "write-behind task ended abnormally");
            }
        }

        let Some(session) = session else {
            return;
        };
        let config = &self.shared.config;
        match worker::bounded(
            "logout",
            config.request_timeout,
            self.shared.remote.logout(&session.token),
        )
        .await
        {
            Ok(()) => tracing::debug!("database session closed"),
            Err(e) => tracing::warn!(error = %e, "database logout failed"),
        }
    }
}

#[async_trait]
impl<R: RemoteStore, C: Clock> Ledger for DbLedger<R, C> {
    async fn open(&self, arg: &str) -> Result<(), LedgerError> {
        let mut slot = self.shared.worker.lock().await;
        if let Some(previous) = slot.take() {
            tracing::debug!("database ledger reopened, closing previous session");
            self.shutdown(previous).await;
        }
        self.reset_mem_cache();

        let config = &self.shared.config;
        let mut credentials = Credentials::from_config(config);
        if !arg.is_empty() {
            credentials.database = arg.to_string();
        }

        let session = worker::login(&self.shared.remote, &self.shared.clock, config, &credentials)
            .await
            .map_err(|e| LedgerError::OpenFailed(format!("database login: {}", e)))?;
        tracing::info!(database = %credentials.database, "database ledger opened");

        *slot = Some(worker::spawn(
            self.shared.remote.clone(),
            self.shared.clock.clone(),
            config.clone(),
            credentials,
            session,
        ));
        Ok(())
    }

    async fn close(&self) {
        let handle = self.shared.worker.lock().await.take();
        if let Some(handle) = handle {
            self.shutdown(handle).await;
        }
    }

    async fn write(&self, _tx: &TxInfo, id: &str, data: &str) -> Result<(), LedgerError> {
        let client = self.client().await?;
        let (generation, latest) = self.shared.generations.bump(id).await;
        self.cache_insert(id, data);

        let result = client.set(id, data).await;
        drop(latest);
        if let Err(e) = result {
            tracing::warn!(%id, error = %e, "remote write failed, retrying in background");
            let task = retry::spawn_write_behind(
                client,
                self.shared.config.retry.clone(),
                self.shared.generations.clone(),
                PendingWrite {
                    key: id.to_string(),
                    value: data.to_string(),
                    generation,
                },
            );
            let mut retries = self.retries();
            retries.retain(|task| !task.is_finished());
            retries.push(task);
        }
        Ok(())
    }

    async fn read(&self, _tx: &TxInfo, id: &str) -> Result<Record, LedgerError> {
        if let Some(value) = self.cached(id) {
            return Ok(Record::new(id, value));
        }

        let client = self.client().await?;
        match client.get(id).await? {
            Some(value) => {
                self.cache_insert(id, &value);
                Ok(Record::new(id, value))
            }
            None => Err(LedgerError::not_found(id)),
        }
    }
}
