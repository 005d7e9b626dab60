// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Race read between an authoritative ledger and its cache
//!
//! Both ledgers are asked at once. A cache hit answers immediately. A cache
//! miss, or any cache error, falls through to the authoritative ledger,
//! whose answer is final. When the authoritative answer arrives after the
//! cache missed, the value is written back into the cache flagged as an
//! update.

use crate::session::OpenPlugin;
use lm_core::{Ledger, LedgerError, Record, TxInfo};
use tokio::task::JoinSet;

/// Ledgers a read is served from
#[derive(Clone)]
pub struct ReadSources {
    pub authoritative: OpenPlugin,
    pub cache: Option<OpenPlugin>,
}

impl ReadSources {
    pub fn single(authoritative: OpenPlugin) -> Self {
        Self {
            authoritative,
            cache: None,
        }
    }

    pub fn with_cache(authoritative: OpenPlugin, cache: OpenPlugin) -> Self {
        Self {
            authoritative,
            cache: Some(cache),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Authoritative,
    Cache,
}

fn spawn_read(
    reads: &mut JoinSet<(Slot, Result<Record, LedgerError>)>,
    slot: Slot,
    plugin: &OpenPlugin,
    tx: &TxInfo,
    id: &str,
) {
    let ledger = plugin.ledger.clone();
    let tx = tx.clone();
    let id = id.to_string();
    reads.spawn(async move { (slot, ledger.read(&tx, &id).await) });
}

/// Read `id`, preferring a cache hit over waiting for the authoritative ledger
pub async fn race_read(sources: ReadSources, tx: &TxInfo, id: &str) -> Result<Record, LedgerError> {
    let ReadSources {
        authoritative,
        cache,
    } = sources;
    let Some(cache) = cache else {
        return authoritative.ledger.read(tx, id).await;
    };

    // Dropping the set aborts whichever read is still running
    let mut reads = JoinSet::new();
    spawn_read(&mut reads, Slot::Authoritative, &authoritative, tx, id);
    spawn_read(&mut reads, Slot::Cache, &cache, tx, id);

    let mut cache_missed = false;
    while let Some(joined) = reads.join_next().await {
        let (slot, result) = match joined {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!(%id, error = %e, "ledger read task failed");
                continue;
            }
        };

        match slot {
            Slot::Cache => match result {
                Ok(record) => {
                    tracing::debug!(%id, cache = %cache.name, "cache hit");
                    return Ok(record);
                }
                Err(e) => {
                    if !e.is_not_found() {
                        tracing::warn!(%id, cache = %cache.name, error = %e, "cache read failed");
                    }
                    tracing::debug!(%id, cache = %cache.name, "cache miss");
                    cache_missed = true;
                }
            },
            Slot::Authoritative => {
                tracing::debug!(%id, ledger = %authoritative.name, cache_missed, "authoritative answer");
                if let (true, Ok(record)) = (cache_missed, &result) {
                    backfill(&cache, tx, id, &record.value).await;
                }
                return result;
            }
        }
    }

    Err(LedgerError::Task(format!("no ledger answered the read of {}", id)))
}

/// Refill the cache from an authoritative hit. Failures only get logged.
async fn backfill(cache: &OpenPlugin, tx: &TxInfo, id: &str, value: &str) {
    let update = tx.as_update();
    match cache.ledger.write(&update, id, value).await {
        Ok(()) => tracing::debug!(%id, cache = %cache.name, "cache backfilled"),
        Err(e) => {
            tracing::warn!(%id, cache = %cache.name, error = %e, "cache backfill failed")
        }
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
