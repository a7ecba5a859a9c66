// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session resolution errors.
//!
//! A missing cookie, a malformed cookie, and a cookie pointing at a user
//! that does not exist all produce the same response. A stale or forged
//! credential must not be distinguishable from an absent one, otherwise
//! the endpoint becomes an account-enumeration oracle. The cause is kept
//! on the variant for tracing only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Session resolution error type.
#[derive(Debug)]
pub enum AuthError {
    /// No session cookie in the request.
    MissingCredential,
    /// A cookie header was present but could not be parsed.
    MalformedCredential,
    /// The cookie's user id does not resolve to a stored user.
    UnknownUser,
    /// The user lookup itself failed.
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
}

impl AuthError {
    /// Internal label for log lines; never serialized into a response.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::MalformedCredential => "malformed_credential",
            AuthError::UnknownUser => "unknown_user",
            AuthError::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential
            | AuthError::MalformedCredential
            | AuthError::UnknownUser => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Internal(msg) => write!(f, "session lookup failed: {msg}"),
            _ => write!(f, "unauthenticated: {}", self.reason()),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // One fixed message per status class; the variant never leaks.
        let message = match status {
            StatusCode::UNAUTHORIZED => "Authentication required",
            _ => "Internal server error",
        };
        let body = Json(AuthErrorBody {
            error: message.to_string(),
        });
        (status, body).into_response()
    }
}
