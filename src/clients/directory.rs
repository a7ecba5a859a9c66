// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Companion directory client.
//!
//! The directory keeps a cross-application, address-keyed user record for
//! discovery. It is strictly best-effort: when the endpoint or API key is
//! absent the client simply does not exist (see
//! [`DirectorySyncClient::is_configured`]), and every failure is absorbed
//! by the sync worker rather than surfaced to callers.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{env_optional, REQUEST_TIMEOUT};
use crate::config::{DIRECTORY_API_BASE_URL_ENV, DIRECTORY_API_KEY_ENV};
use crate::models::SyncUserData;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory configuration missing: {0}")]
    MissingConfig(String),

    #[error("directory request failed: {0}")]
    Request(String),

    #[error("directory response was invalid: {0}")]
    InvalidResponse(String),
}

/// Result of one upsert. The directory decides whether the record was
/// newly created or updated.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// The directory's view of the record after the upsert.
    pub user: Value,
    /// True when the upsert created the record.
    pub created: bool,
}

/// Seam over the directory so the sync worker can be tested against a
/// recording stub.
#[async_trait]
pub trait DirectoryUpsert: Send + Sync {
    async fn sync_user(&self, data: &SyncUserData) -> Result<SyncOutcome, DirectoryError>;
}

#[derive(Debug, Clone)]
pub struct DirectorySyncClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl DirectorySyncClient {
    pub fn is_configured() -> bool {
        env_optional(DIRECTORY_API_BASE_URL_ENV).is_some()
            && env_optional(DIRECTORY_API_KEY_ENV).is_some()
    }

    pub fn from_env() -> Result<Self, DirectoryError> {
        let base_url = env_optional(DIRECTORY_API_BASE_URL_ENV)
            .ok_or_else(|| DirectoryError::MissingConfig(DIRECTORY_API_BASE_URL_ENV.to_string()))?;
        let api_key = env_optional(DIRECTORY_API_KEY_ENV)
            .ok_or_else(|| DirectoryError::MissingConfig(DIRECTORY_API_KEY_ENV.to_string()))?;
        url::Url::parse(&base_url).map_err(|e| {
            DirectoryError::MissingConfig(format!(
                "{DIRECTORY_API_BASE_URL_ENV} is not a valid URL: {e}"
            ))
        })?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DirectoryError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            api_key,
            http,
        })
    }
}

#[async_trait]
impl DirectoryUpsert for DirectorySyncClient {
    /// One upsert keyed on `publicAddress`, single attempt.
    async fn sync_user(&self, data: &SyncUserData) -> Result<SyncOutcome, DirectoryError> {
        let response = self
            .http
            .post(format!(
                "{}/api/users/sync",
                self.base_url.trim_end_matches('/')
            ))
            .header("x-api-key", &self.api_key)
            .json(data)
            .send()
            .await
            .map_err(|e| DirectoryError::Request(format!("POST /api/users/sync failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Request(format!(
                "POST /api/users/sync returned {status}: {body}"
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            DirectoryError::InvalidResponse(format!("POST /api/users/sync invalid JSON: {e}"))
        })?;

        let user = body
            .get("user")
            .cloned()
            .ok_or_else(|| DirectoryError::InvalidResponse("missing user in response".to_string()))?;
        let created = body
            .get("created")
            .and_then(Value::as_bool)
            .ok_or_else(|| {
                DirectoryError::InvalidResponse("missing created flag in response".to_string())
            })?;

        Ok(SyncOutcome { user, created })
    }
}
