// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote store client speaking to the database's HTTP gateway

use super::remote::{Credentials, RemoteError, RemoteStore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct LoginRequest<'a> {
    user: &'a str,
    password: &'a str,
    database: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Serialize)]
struct SetRequest<'a> {
    key: &'a str,
    value: &'a str,
}

#[derive(Deserialize)]
struct Entry {
    value: String,
}

/// Blocking HTTP client run on the blocking thread pool
#[derive(Clone)]
pub struct HttpRemoteStore {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpRemoteStore {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            endpoint: endpoint.into(),
            agent,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Lookup URL for `key`, escaped so it stays one path segment
    fn get_url(&self, key: &str) -> String {
        self.url(&format!("get/{}", urlencoding::encode(key)))
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, RemoteError>
    where
        T: Send + 'static,
        F: FnOnce(ureq::Agent) -> Result<T, RemoteError> + Send + 'static,
    {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || f(agent))
            .await
            .map_err(|e| RemoteError::Request(e.to_string()))?
    }
}

fn map_ureq(err: ureq::Error) -> RemoteError {
    match err {
        ureq::Error::StatusCode(401) | ureq::Error::StatusCode(403) => {
            RemoteError::Unauthorized(err.to_string())
        }
        ureq::Error::StatusCode(_) => RemoteError::Request(err.to_string()),
        other => RemoteError::Connect(other.to_string()),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, RemoteError> {
    serde_json::to_string(value).map_err(|e| RemoteError::Request(e.to_string()))
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn login(&self, credentials: &Credentials) -> Result<String, RemoteError> {
        let url = self.url("login");
        let body = to_json(&LoginRequest {
            user: &credentials.user,
            password: &credentials.password,
            database: &credentials.database,
        })?;
        self.blocking(move |agent| {
            let mut response = agent
                .post(&url)
                .header("Content-Type", "application/json")
                .send(body)
                .map_err(map_ureq)?;
            let text = response
                .body_mut()
                .read_to_string()
                .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
            let login: LoginResponse = serde_json::from_str(&text)
                .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
            Ok(login.token)
        })
        .await
    }

    async fn set(&self, token: &str, key: &str, value: &str) -> Result<(), RemoteError> {
        let url = self.url("set");
        let token = token.to_string();
        let body = to_json(&SetRequest { key, value })?;
        self.blocking(move |agent| {
            agent
                .post(&url)
                .header("Authorization", &token)
                .header("Content-Type", "application/json")
                .send(body)
                .map(|_| ())
                .map_err(map_ureq)
        })
        .await
    }

    async fn get(&self, token: &str, key: &str) -> Result<Option<String>, RemoteError> {
        let url = self.get_url(key);
        let token = token.to_string();
        self.blocking(move |agent| {
            let mut response = match agent.get(&url).header("Authorization", &token).call() {
                Ok(response) => response,
                Err(ureq::Error::StatusCode(404)) => return Ok(None),
                Err(e) => return Err(map_ureq(e)),
            };
            let text = response
                .body_mut()
                .read_to_string()
                .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
            let entry: Entry = serde_json::from_str(&text)
                .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
            Ok(Some(entry.value))
        })
        .await
    }

    async fn logout(&self, token: &str) -> Result<(), RemoteError> {
        let url = self.url("logout");
        let token = token.to_string();
        self.blocking(move |agent| {
            agent
                .post(&url)
                .header("Authorization", &token)
                .send_empty()
                .map(|_| ())
                .map_err(map_ureq)
        })
        .await
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
