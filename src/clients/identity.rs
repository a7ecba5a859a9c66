// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity authority client.
//!
//! The authority is the system of record for usernames, phone numbers,
//! and OTP issuance. This client proxies registration and OTP dispatch
//! and translates the authority's machine-readable failure vocabulary
//! into [`AuthorityErrorCode`], a closed enumeration with an `Unknown`
//! fallback so new upstream codes degrade to generic errors instead of
//! silent mismatches.
//!
//! Calls are single-attempt. Registration in particular must not be
//! replayed blindly: a retried create could double-submit an account.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{env_optional, REQUEST_TIMEOUT};
use crate::config::AUTH_API_BASE_URL_ENV;
use crate::models::CreateAccountRequest;

/// Known authority failure codes, plus a fallback for anything new.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorityErrorCode {
    UsernameTaken,
    PhoneTaken,
    EmailTaken,
    UserNotFound,
    RateLimited,
    Unknown(String),
}

impl AuthorityErrorCode {
    /// Map a raw code string onto the closed enumeration.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "USERNAME_TAKEN" => Self::UsernameTaken,
            "PHONE_TAKEN" => Self::PhoneTaken,
            "EMAIL_TAKEN" => Self::EmailTaken,
            "USER_NOT_FOUND" => Self::UserNotFound,
            "RATE_LIMITED" => Self::RateLimited,
            other => Self::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthorityError {
    #[error("identity authority configuration missing: {0}")]
    MissingConfig(String),

    /// The authority processed the request and rejected it with a
    /// machine-readable code.
    #[error("identity authority rejected the request: {message}")]
    Rejected {
        code: AuthorityErrorCode,
        message: String,
    },

    #[error("identity authority request failed: {0}")]
    Request(String),

    #[error("identity authority response was invalid: {0}")]
    InvalidResponse(String),
}

/// Seam over the authority so handlers can be tested against recording
/// stubs instead of a live endpoint.
#[async_trait]
pub trait IdentityAuthority: Send + Sync {
    /// Register a new account. On success the authority has dispatched an
    /// OTP to the request's phone number.
    async fn register(&self, request: &CreateAccountRequest) -> Result<(), AuthorityError>;

    /// Dispatch a sign-in OTP to an existing account's phone number.
    async fn send_otp(&self, phone: &str) -> Result<(), AuthorityError>;
}

/// Failure body shape: `{code, message}`.
#[derive(Debug, Deserialize)]
struct AuthorityFailureBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpIdentityAuthority {
    base_url: String,
    http: Client,
}

impl HttpIdentityAuthority {
    pub fn is_configured() -> bool {
        env_optional(AUTH_API_BASE_URL_ENV).is_some()
    }

    pub fn from_env() -> Result<Self, AuthorityError> {
        let base_url = env_optional(AUTH_API_BASE_URL_ENV)
            .ok_or_else(|| AuthorityError::MissingConfig(AUTH_API_BASE_URL_ENV.to_string()))?;
        url::Url::parse(&base_url).map_err(|e| {
            AuthorityError::MissingConfig(format!("{AUTH_API_BASE_URL_ENV} is not a valid URL: {e}"))
        })?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AuthorityError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, http })
    }

    /// Single-attempt POST; non-success responses are translated into
    /// `Rejected` when the body carries a `{code, message}` pair.
    async fn post_json(&self, path: &str, payload: &serde_json::Value) -> Result<(), AuthorityError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url.trim_end_matches('/'), path))
            .json(payload)
            .send()
            .await
            .map_err(|e| AuthorityError::Request(format!("POST {path} failed: {e}")))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match serde_json::from_str::<AuthorityFailureBody>(&body) {
            Ok(AuthorityFailureBody {
                code: Some(code),
                message,
            }) => {
                let code = AuthorityErrorCode::parse(&code);
                let message =
                    message.unwrap_or_else(|| format!("request was rejected ({status})"));
                Err(AuthorityError::Rejected { code, message })
            }
            _ => Err(AuthorityError::Request(format!(
                "POST {path} returned {status}: {body}"
            ))),
        }
    }
}

#[async_trait]
impl IdentityAuthority for HttpIdentityAuthority {
    async fn register(&self, request: &CreateAccountRequest) -> Result<(), AuthorityError> {
        let mut payload = json!({
            "username": request.username,
            "displayName": request.display_name,
            "phone": request.phone,
        });
        if let Some(email) = &request.email {
            payload["email"] = json!(email);
        }

        self.post_json("/v1/auth/register", &payload).await
    }

    async fn send_otp(&self, phone: &str) -> Result<(), AuthorityError> {
        self.post_json("/v1/auth/send-otp", &json!({ "phone": phone }))
            .await
    }
}
