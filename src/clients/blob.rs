// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blob store client for avatar images.
//!
//! Avatars arrive from the client as base64 data URLs
//! (`data:image/png;base64,...`). The payload is decoded locally and the
//! raw bytes are PUT to the blob store, which answers with the public
//! URL that ends up in the user record.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

use super::{env_optional, REQUEST_TIMEOUT};
use crate::config::{BLOB_STORE_BASE_URL_ENV, BLOB_STORE_TOKEN_ENV};

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("blob store configuration missing: {0}")]
    MissingConfig(String),

    #[error("invalid avatar payload: {0}")]
    InvalidPayload(String),

    #[error("blob store request failed: {0}")]
    Request(String),

    #[error("blob store response was invalid: {0}")]
    InvalidResponse(String),
}

/// Seam over the blob store so profile-update tests can record calls and
/// script failures.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist an avatar payload and return its public URL.
    async fn put_avatar(&self, user_id: &str, payload: &str) -> Result<String, BlobError>;
}

/// Success body shape: `{url}`.
#[derive(Debug, Deserialize)]
struct BlobUploadResponse {
    url: String,
}

#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    base_url: String,
    token: String,
    http: Client,
}

impl HttpBlobStore {
    pub fn is_configured() -> bool {
        env_optional(BLOB_STORE_BASE_URL_ENV).is_some()
            && env_optional(BLOB_STORE_TOKEN_ENV).is_some()
    }

    pub fn from_env() -> Result<Self, BlobError> {
        let base_url = env_optional(BLOB_STORE_BASE_URL_ENV)
            .ok_or_else(|| BlobError::MissingConfig(BLOB_STORE_BASE_URL_ENV.to_string()))?;
        let token = env_optional(BLOB_STORE_TOKEN_ENV)
            .ok_or_else(|| BlobError::MissingConfig(BLOB_STORE_TOKEN_ENV.to_string()))?;
        url::Url::parse(&base_url).map_err(|e| {
            BlobError::MissingConfig(format!("{BLOB_STORE_BASE_URL_ENV} is not a valid URL: {e}"))
        })?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BlobError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            token,
            http,
        })
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put_avatar(&self, user_id: &str, payload: &str) -> Result<String, BlobError> {
        let decoded = DecodedAvatar::parse(payload)?;
        let object_key = format!("avatars/{user_id}-{}.{}", Uuid::new_v4(), decoded.extension);

        let response = self
            .http
            .put(format!(
                "{}/{object_key}",
                self.base_url.trim_end_matches('/')
            ))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", decoded.content_type)
            .body(decoded.bytes)
            .send()
            .await
            .map_err(|e| BlobError::Request(format!("PUT {object_key} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BlobError::Request(format!(
                "PUT {object_key} returned {status}: {body}"
            )));
        }

        let body: BlobUploadResponse = response.json().await.map_err(|e| {
            BlobError::InvalidResponse(format!("PUT {object_key} invalid JSON: {e}"))
        })?;

        Ok(body.url)
    }
}

/// Stand-in used when the blob store is unconfigured: the server boots,
/// avatar uploads fail with a clear message, everything else works.
pub struct DisabledBlobStore;

#[async_trait]
impl BlobStore for DisabledBlobStore {
    async fn put_avatar(&self, _user_id: &str, _payload: &str) -> Result<String, BlobError> {
        Err(BlobError::MissingConfig(
            "blob store is not configured".to_string(),
        ))
    }
}

/// A decoded data-URL avatar payload.
struct DecodedAvatar {
    bytes: Vec<u8>,
    content_type: String,
    extension: &'static str,
}

impl DecodedAvatar {
    /// Parse a `data:<image mime>;base64,<data>` payload.
    fn parse(payload: &str) -> Result<Self, BlobError> {
        let rest = payload
            .strip_prefix("data:")
            .ok_or_else(|| BlobError::InvalidPayload("expected a data URL".to_string()))?;
        let (content_type, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| BlobError::InvalidPayload("expected base64 data".to_string()))?;

        let extension = match content_type {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            other => {
                return Err(BlobError::InvalidPayload(format!(
                    "unsupported content type: {other}"
                )))
            }
        };

        let bytes = BASE64
            .decode(data)
            .map_err(|e| BlobError::InvalidPayload(format!("base64 decode failed: {e}")))?;
        if bytes.is_empty() {
            return Err(BlobError::InvalidPayload("empty image data".to_string()));
        }

        Ok(Self {
            bytes,
            content_type: content_type.to_string(),
            extension,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_png_data_url() {
        let decoded = DecodedAvatar::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(decoded.content_type, "image/png");
        assert_eq!(decoded.extension, "png");
        assert!(!decoded.bytes.is_empty());
    }

    #[test]
    fn parse_maps_jpeg_to_jpg_extension() {
        let decoded = DecodedAvatar::parse("data:image/jpeg;base64,AAAA").unwrap();
        assert_eq!(decoded.extension, "jpg");
    }

    #[test]
    fn parse_rejects_non_data_urls() {
        assert!(matches!(
            DecodedAvatar::parse("https://example.com/a.png"),
            Err(BlobError::InvalidPayload(_))
        ));
    }

    #[test]
    fn parse_rejects_unsupported_content_types() {
        assert!(matches!(
            DecodedAvatar::parse("data:application/pdf;base64,AAAA"),
            Err(BlobError::InvalidPayload(_))
        ));
    }

    #[test]
    fn parse_rejects_bad_base64_and_empty_data() {
        assert!(matches!(
            DecodedAvatar::parse("data:image/png;base64,@@@"),
            Err(BlobError::InvalidPayload(_))
        ));
        assert!(matches!(
            DecodedAvatar::parse("data:image/png;base64,"),
            Err(BlobError::InvalidPayload(_))
        ));
    }

    #[tokio::test]
    async fn disabled_store_reports_missing_config() {
        let result = DisabledBlobStore
            .put_avatar("user-1", "data:image/png;base64,AAAA")
            .await;
        assert!(matches!(result, Err(BlobError::MissingConfig(_))));
    }
}
