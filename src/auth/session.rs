// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the session user.
//!
//! Use the `Session` extractor in handlers that require an authenticated
//! user:
//!
//! ```rust,ignore
//! async fn my_handler(Session(user): Session) -> impl IntoResponse {
//!     // user is the resolved UserAggregate
//! }
//! ```
//!
//! The session credential is an opaque cookie whose value is the user id;
//! its lifecycle is owned by the identity authority, this layer only
//! reads it. Parsing is structural (name/value pairs), producing a typed
//! [`SessionCredential`] rather than pattern-matching the raw header.

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap},
};
use tracing::debug;

use super::AuthError;
use crate::models::UserAggregate;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session_id";

/// Typed result of looking for the session cookie in a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCredential {
    /// The cookie is present with a non-empty value.
    Present(String),
    /// A cookie header exists but the credential is unusable
    /// (unparseable header, or the session cookie has an empty value).
    Malformed,
    /// No session cookie in the request.
    Absent,
}

/// Extract the session credential from the request headers.
pub fn session_credential(headers: &HeaderMap) -> SessionCredential {
    for header in headers.get_all(COOKIE) {
        let Ok(raw) = header.to_str() else {
            return SessionCredential::Malformed;
        };

        for pair in raw.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            if name.trim() == SESSION_COOKIE {
                let value = value.trim();
                if value.is_empty() {
                    return SessionCredential::Malformed;
                }
                return SessionCredential::Present(value.to_string());
            }
        }
    }

    // A cookie header without our cookie is the same as no header at all.
    SessionCredential::Absent
}

/// Extractor for the authenticated session user.
#[derive(Debug)]
pub struct Session(pub UserAggregate);

impl FromRequestParts<AppState> for Session {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let error = match session_credential(&parts.headers) {
            SessionCredential::Present(user_id) => {
                match state.users.get(&user_id) {
                    Ok(Some(user)) => return Ok(Session(user)),
                    Ok(None) => AuthError::UnknownUser,
                    Err(e) => AuthError::Internal(e.to_string()),
                }
            }
            SessionCredential::Malformed => AuthError::MalformedCredential,
            SessionCredential::Absent => AuthError::MissingCredential,
        };

        debug!(reason = error.reason(), "Session resolution failed");
        Err(error)
    }
}
