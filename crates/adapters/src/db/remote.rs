// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client seam towards the external key-value database

use super::config::DbConfig;
use super::http::HttpRemoteStore;
use super::local::LocalRemoteStore;
use async_trait::async_trait;
use lm_core::LedgerError;
use thiserror::Error;

/// Errors from the remote database client
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<RemoteError> for LedgerError {
    fn from(err: RemoteError) -> Self {
        LedgerError::Remote(err.to_string())
    }
}

/// Login material. The database name is routed through the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Credentials {
    pub fn from_config(config: &DbConfig) -> Self {
        Self {
            user: config.user.clone(),
            password: config.password.clone(),
            database: config.database.clone(),
        }
    }
}

/// Token-authenticated key-value store
#[async_trait]
pub trait RemoteStore: Clone + Send + Sync + 'static {
    /// Start a session, returning its token
    async fn login(&self, credentials: &Credentials) -> Result<String, RemoteError>;

    async fn set(&self, token: &str, key: &str, value: &str) -> Result<(), RemoteError>;

    /// `Ok(None)` when the key does not exist
    async fn get(&self, token: &str, key: &str) -> Result<Option<String>, RemoteError>;

    async fn logout(&self, token: &str) -> Result<(), RemoteError>;
}

/// Store selected by configuration: the network client, or the in-process
/// store when the configured address is `mock`.
#[derive(Clone)]
pub enum RemoteBackend {
    Http(HttpRemoteStore),
    Local(LocalRemoteStore),
}

impl RemoteBackend {
    pub fn from_config(config: &DbConfig) -> Self {
        if config.is_mock() {
            RemoteBackend::Local(LocalRemoteStore::new())
        } else {
            RemoteBackend::Http(HttpRemoteStore::new(config.endpoint(), config.request_timeout))
        }
    }
}

#[async_trait]
impl RemoteStore for RemoteBackend {
    async fn login(&self, credentials: &Credentials) -> Result<String, RemoteError> {
        match self {
            RemoteBackend::Http(store) => store.login(credentials).await,
            RemoteBackend::Local(store) => store.login(credentials).await,
        }
    }

    async fn set(&self, token: &str, key: &str, value: &str) -> Result<(), RemoteError> {
        match self {
            RemoteBackend::Http(store) => store.set(token, key, value).await,
            RemoteBackend::Local(store) => store.set(token, key, value).await,
        }
    }

    async fn get(&self, token: &str, key: &str) -> Result<Option<String>, RemoteError> {
        match self {
            RemoteBackend::Http(store) => store.get(token, key).await,
            RemoteBackend::Local(store) => store.get(token, key).await,
        }
    }

    async fn logout(&self, token: &str) -> Result<(), RemoteError> {
        match self {
            RemoteBackend::Http(store) => store.logout(token).await,
            RemoteBackend::Local(store) => store.logout(token).await,
        }
    }
}
