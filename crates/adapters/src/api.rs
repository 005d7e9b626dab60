// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ledger backed by an HTTP ledger API
//!
//! Writes go to the local cache first and are then POSTed to the API. Reads
//! are served from the cache when possible and fetched from the API otherwise.

use async_trait::async_trait;
use lm_core::{Ledger, LedgerError, Record, TxInfo};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

const STORE_PATH: &str = "store";
const NYM_PATH: &str = "nym/";
const SCHEMA_PATH: &str = "schema/";
const CRED_DEF_PATH: &str = "cred_def/";

const ENV_AUTH_TOKEN: &str = "AuthToken";
const ENV_BASE_ADDRESS: &str = "BaseAddress";

/// HTTP ledger API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, including the trailing slash
    pub base_address: String,
    pub auth_token: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_address: "http://localhost:3000/dev/".to_string(),
            auth_token: String::new(),
            timeout: Duration::from_secs(5),
        }
    }
}

impl ApiConfig {
    /// Defaults overridden by `AuthToken` / `BaseAddress` when set
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(token) = lookup(ENV_AUTH_TOKEN) {
            config.auth_token = token;
        }
        if let Some(base) = lookup(ENV_BASE_ADDRESS) {
            config.base_address = base;
        }
        config
    }
}

/// Wire shape of an identity record
#[derive(Debug, Serialize, Deserialize)]
struct NymTransaction {
    id: String,
    data: String,
}

/// API path serving a record id: NYM ids have no colons, schema ids have
/// exactly three and credential definitions have more.
pub(crate) fn route_for(id: &str) -> &'static str {
    match id.matches(':').count() {
        0 => NYM_PATH,
        3 => SCHEMA_PATH,
        _ => CRED_DEF_PATH,
    }
}

/// Read URL for `id` under `route`. Reserved characters are escaped.
pub(crate) fn read_url(base: &str, route: &str, id: &str) -> String {
    format!("{}{}{}", base, route, urlencoding::encode(id))
}

/// Drop line breaks and tabs that pretty-printed payloads carry
pub(crate) fn clean_data(data: &str) -> String {
    data.chars().filter(|c| *c != '\n' && *c != '\t').collect()
}

/// JSON documents (schemas, credential definitions) are sent as a JSON
/// string; anything else is a NYM and gets wrapped with its id.
pub(crate) fn encode_payload(id: &str, data: &str) -> Result<String, LedgerError> {
    let is_json_object =
        serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(data).is_ok();
    if is_json_object {
        Ok(serde_json::to_string(data)?)
    } else {
        Ok(serde_json::to_string(&NymTransaction {
            id: id.to_string(),
            data: data.to_string(),
        })?)
    }
}

pub(crate) fn decode_response(route: &str, body: &str) -> Result<String, LedgerError> {
    if route == NYM_PATH {
        let nym: NymTransaction = serde_json::from_str(body)?;
        Ok(nym.data)
    } else {
        Ok(body.to_string())
    }
}

/// HTTP-API ledger with a local read cache
#[derive(Clone)]
pub struct ApiLedger {
    config: ApiConfig,
    agent: ureq::Agent,
    cache: Arc<RwLock<HashMap<String, String>>>,
}

impl ApiLedger {
    pub fn new(config: ApiConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .build()
            .into();
        Self {
            config,
            agent,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn cached(&self, id: &str) -> Option<String> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    fn remember(&self, id: &str, value: &str) {
        self.cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.to_string(), value.to_string());
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.auth_token)
    }

    async fn post(&self, body: String) -> Result<(), LedgerError> {
        let url = format!("{}{}", self.config.base_address, STORE_PATH);
        let agent = self.agent.clone();
        let bearer = self.bearer();
        tokio::task::spawn_blocking(move || {
            agent
                .post(&url)
                .header("Authorization", &bearer)
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .send(body)
                .map(|_| ())
                .map_err(|e| LedgerError::Remote(format!("POST {} failed: {}", url, e)))
        })
        .await
        .map_err(|e| LedgerError::Remote(e.to_string()))?
    }

    async fn get(&self, id: &str, route: &'static str) -> Result<String, LedgerError> {
        let url = read_url(&self.config.base_address, route, id);
        let agent = self.agent.clone();
        let bearer = self.bearer();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let mut response = match agent
                .get(&url)
                .header("Authorization", &bearer)
                .header("Accept", "application/json")
                .call()
            {
                Ok(response) => response,
                Err(ureq::Error::StatusCode(404)) => return Err(LedgerError::NotFound(id)),
                Err(e) => {
                    return Err(LedgerError::Remote(format!("GET {} failed: {}", url, e)));
                }
            };
            response
                .body_mut()
                .read_to_string()
                .map_err(|e| LedgerError::Remote(format!("failed to read response: {}", e)))
        })
        .await
        .map_err(|e| LedgerError::Remote(e.to_string()))?
    }
}

#[async_trait]
impl Ledger for ApiLedger {
    async fn open(&self, _arg: &str) -> Result<(), LedgerError> {
        self.cache.write().unwrap_or_else(|e| e.into_inner()).clear();
        Ok(())
    }

    async fn close(&self) {}

    async fn write(&self, _tx: &TxInfo, id: &str, data: &str) -> Result<(), LedgerError> {
        let data = clean_data(data);
        self.remember(id, &data);
        let body = encode_payload(id, &data)?;
        self.post(body).await
    }

    async fn read(&self, _tx: &TxInfo, id: &str) -> Result<Record, LedgerError> {
        if let Some(value) = self.cached(id) {
            return Ok(Record::new(id, value));
        }

        let route = route_for(id);
        let body = self.get(id, route).await?;
        let value = decode_response(route, &body)?;
        self.remember(id, &value);
        Ok(Record::new(id, value))
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
