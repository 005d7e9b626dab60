// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background worker owning the remote session
//!
//! Every remote read and write goes through one task, so at most one remote
//! call is in flight and the token refresh check needs no lock.

use super::config::DbConfig;
use super::remote::{Credentials, RemoteStore};
use lm_core::{Clock, LedgerError};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

const QUEUE_DEPTH: usize = 64;

/// Authenticated remote session
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) token: String,
    pub(crate) logged_in_at: Instant,
}

pub(crate) struct ReadRequest {
    key: String,
    reply: oneshot::Sender<Result<Option<String>, LedgerError>>,
}

pub(crate) struct WriteRequest {
    key: String,
    value: String,
    reply: oneshot::Sender<Result<(), LedgerError>>,
}

/// Sending side of the worker's channels, cheap to clone into retry tasks
#[derive(Clone)]
pub(crate) struct WorkerClient {
    reads: mpsc::Sender<ReadRequest>,
    writes: mpsc::Sender<WriteRequest>,
    shutdown: watch::Receiver<bool>,
    reply_timeout: Duration,
}

impl WorkerClient {
    /// Remote read through the worker; `Ok(None)` if the key is absent
    pub(crate) async fn get(&self, key: &str) -> Result<Option<String>, LedgerError> {
        let (reply, rx) = oneshot::channel();
        let request = ReadRequest {
            key: key.to_string(),
            reply,
        };
        self.reads
            .send(request)
            .await
            .map_err(|_| LedgerError::Closed("database worker stopped".to_string()))?;
        match tokio::time::timeout(self.reply_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(LedgerError::Closed(
                "database worker dropped the request".to_string(),
            )),
            Err(_) => Err(LedgerError::Timeout {
                op: "read",
                after: self.reply_timeout,
            }),
        }
    }

    /// Remote write through the worker
    pub(crate) async fn set(&self, key: &str, value: &str) -> Result<(), LedgerError> {
        let (reply, rx) = oneshot::channel();
        let request = WriteRequest {
            key: key.to_string(),
            value: value.to_string(),
            reply,
        };
        self.writes
            .send(request)
            .await
            .map_err(|_| LedgerError::Closed("database worker stopped".to_string()))?;
        rx.await.map_err(|_| {
            LedgerError::Closed("database worker dropped the request".to_string())
        })?
    }

    /// Resolves once the worker has been told to stop
    pub(crate) async fn stopped(&mut self) {
        // An error means the sender is gone, which also means stopped
        let _ = self.shutdown.wait_for(|stopped| *stopped).await;
    }
}

/// Owner's side of a running worker
pub(crate) struct WorkerHandle {
    client: WorkerClient,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<Session>,
}

impl WorkerHandle {
    pub(crate) fn client(&self) -> WorkerClient {
        self.client.clone()
    }

    /// Stop the worker and hand back its session for logout
    pub(crate) async fn stop(self) -> Option<Session> {
        let _ = self.shutdown.send(true);
        match self.task.await {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::error!(error = %e, "database worker ended abnormally");
                None
            }
        }
    }
}

/// Run `fut` with a deadline, naming `op` in the timeout error
pub(crate) async fn bounded<T, E>(
    op: &'static str,
    after: Duration,
    fut: impl Future<Output = Result<T, E>>,
) -> Result<T, LedgerError>
where
    LedgerError: From<E>,
{
    match tokio::time::timeout(after, fut).await {
        Ok(result) => result.map_err(LedgerError::from),
        Err(_) => Err(LedgerError::Timeout { op, after }),
    }
}

/// Log in with the configured credentials
pub(crate) async fn login<R: RemoteStore, C: Clock>(
    remote: &R,
    clock: &C,
    config: &DbConfig,
    credentials: &Credentials,
) -> Result<Session, LedgerError> {
    let token = bounded("login", config.request_timeout, remote.login(credentials)).await?;
    Ok(Session {
        token,
        logged_in_at: clock.now(),
    })
}

struct Worker<R, C> {
    remote: R,
    clock: C,
    config: DbConfig,
    credentials: Credentials,
    session: Session,
}

impl<R: RemoteStore, C: Clock> Worker<R, C> {
    async fn refresh_token(&mut self) {
        if self.clock.elapsed_since(self.session.logged_in_at) < self.config.refresh_after {
            return;
        }
        tracing::debug!("session token expired, logging in again");
        match login(&self.remote, &self.clock, &self.config, &self.credentials).await {
            Ok(session) => self.session = session,
            Err(e) => tracing::error!(error = %e, "token refresh failed"),
        }
    }

    async fn read(&mut self, request: ReadRequest) {
        self.refresh_token().await;
        let result = bounded(
            "get",
            self.config.request_timeout,
            self.remote.get(&self.session.token, &request.key),
        )
        .await;
        if let Err(e) = &result {
            tracing::warn!(key = %request.key, error = %e, "remote read failed");
        }
        let _ = request.reply.send(result);
    }

    async fn write(&mut self, request: WriteRequest) {
        self.refresh_token().await;
        let result = bounded(
            "set",
            self.config.write_timeout,
            self.remote
                .set(&self.session.token, &request.key, &request.value),
        )
        .await;
        let _ = request.reply.send(result);
    }

    async fn run(
        mut self,
        mut reads: mpsc::Receiver<ReadRequest>,
        mut writes: mpsc::Receiver<WriteRequest>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Session {
        tracing::debug!("database worker started");
        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                Some(request) = reads.recv() => self.read(request).await,
                Some(request) = writes.recv() => self.write(request).await,
                else => break,
            }
        }
        tracing::debug!("database worker stopped");
        self.session
    }
}

/// Spawn the worker for an authenticated session
pub(crate) fn spawn<R: RemoteStore, C: Clock>(
    remote: R,
    clock: C,
    config: DbConfig,
    credentials: Credentials,
    session: Session,
) -> WorkerHandle {
    let (reads_tx, reads_rx) = mpsc::channel(QUEUE_DEPTH);
    let (writes_tx, writes_rx) = mpsc::channel(QUEUE_DEPTH);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let client = WorkerClient {
        reads: reads_tx,
        writes: writes_tx,
        shutdown: shutdown_rx.clone(),
        reply_timeout: config.reply_timeout,
    };
    let worker = Worker {
        remote,
        clock,
        config,
        credentials,
        session,
    };
    let task = tokio::spawn(worker.run(reads_rx, writes_rx, shutdown_rx));

    WorkerHandle {
        client,
        shutdown: shutdown_tx,
        task,
    }
}
