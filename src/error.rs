// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! API error responses.
//!
//! Two body shapes cross the HTTP boundary:
//!
//! - `{"error": "..."}` for everything that is not field-level validation
//! - `{"errors": {"field": "message", ...}}` for client-fixable input
//!   problems, all failing fields reported together
//!
//! Raw transport errors (reqwest, redb) never reach a response body; they
//! are stringified by the client/storage layers before arriving here.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    /// A single-message failure: `{"error": msg}` with the given status.
    Message {
        status: StatusCode,
        message: String,
    },
    /// Field-level validation failure: 400 `{"errors": {field: msg}}`.
    Validation { errors: BTreeMap<String, String> },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct ValidationBody {
    errors: BTreeMap<String, String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Message {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// An upstream service failed or was unreachable. The message has
    /// already been sanitized by the client layer.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::internal(message)
    }

    /// All field errors from local validation, reported together.
    pub fn validation(errors: BTreeMap<String, String>) -> Self {
        Self::Validation { errors }
    }

    /// A single field error, e.g. a remote uniqueness conflict mapped back
    /// onto the offending field.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(name.into(), message.into());
        Self::Validation { errors }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Message { status, .. } => *status,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Message { status, message } => {
                (status, Json(ErrorBody { error: message })).into_response()
            }
            Self::Validation { errors } => {
                (StatusCode::BAD_REQUEST, Json(ValidationBody { errors })).into_response()
            }
        }
    }
}
