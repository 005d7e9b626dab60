// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-behind retry for writes the database rejected

use super::config::RetryPolicy;
use super::worker::WorkerClient;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;

/// Latest write generation per key.
///
/// The lock is held across a remote set, so sets of one key reach the
/// store in the order the writes were made.
#[derive(Clone, Default)]
pub(crate) struct Generations(Arc<Mutex<HashMap<String, u64>>>);

impl Generations {
    /// Start a new generation of `key`. The guard keeps it the latest.
    pub(crate) async fn bump(&self, key: &str) -> (u64, MutexGuard<'_, HashMap<String, u64>>) {
        let mut latest = self.0.lock().await;
        let generation = latest
            .get(key)
            .map(|g| g.wrapping_add(1))
            .unwrap_or_default();
        latest.insert(key.to_string(), generation);
        (generation, latest)
    }
}

/// A write the database rejected, waiting to be retried
pub(crate) struct PendingWrite {
    pub key: String,
    pub value: String,
    pub generation: u64,
}

/// Retry a write in the background until it sticks, a newer write of the
/// same key supersedes it, the policy runs out, or the worker is stopped.
///
/// Waits `policy.delay(round)` before each attempt. Returns `true` if the
/// write eventually succeeded.
pub(crate) fn spawn_write_behind(
    mut client: WorkerClient,
    policy: RetryPolicy,
    generations: Generations,
    write: PendingWrite,
) -> JoinHandle<bool> {
    let PendingWrite {
        key,
        value,
        generation,
    } = write;
    tokio::spawn(async move {
        for round in 0..policy.max_rounds {
            let delay = policy.delay(round);
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = client.stopped() => {
                    tracing::debug!(%key, round, "write-behind cancelled");
                    return false;
                }
            }

            let latest = generations.0.lock().await;
            if latest.get(&key) != Some(&generation) {
                tracing::debug!(%key, generation, "write-behind superseded by a newer write");
                return false;
            }
            match client.set(&key, &value).await {
                Ok(()) => {
                    tracing::info!(%key, attempt = round + 1, "write-behind succeeded");
                    return true;
                }
                Err(e) => {
                    tracing::warn!(%key, attempt = round + 1, error = %e, "write-behind failed");
                }
            }
        }
        tracing::error!(%key, rounds = policy.max_rounds, "write-behind giving up");
        false
    })
}
