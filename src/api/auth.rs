// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account provisioning and sign-in endpoints.
//!
//! Both endpoints validate locally, then proxy a single call to the
//! identity authority. The authority's machine-readable failure codes are
//! translated here: uniqueness conflicts become field errors on the
//! offending field, sign-in misses become user-readable 404/429
//! responses. Raw codes never reach the client.

use axum::{extract::State, Json};

use crate::clients::{AuthorityError, AuthorityErrorCode};
use crate::error::ApiError;
use crate::models::{phone_format_error, CreateAccountRequest, MessageResponse, SendOtpRequest};
use crate::state::AppState;

const OTP_SENT_MESSAGE: &str = "A verification code has been sent to your phone.";
const NO_ACCOUNT_MESSAGE: &str =
    "No account found for this phone number. Please create an account first.";
const RATE_LIMITED_MESSAGE: &str =
    "Too many verification attempts. Please wait a moment and try again.";

/// Register a new account with the identity authority.
///
/// Validation runs first and reports every failing field at once; nothing
/// is sent upstream until the request is clean. On success the authority
/// has dispatched an OTP to the given phone number; this service does not
/// deliver OTPs itself. The upstream call is made exactly once - a blind
/// retry could double-submit the registration.
#[utoipa::path(
    post,
    path = "/api/auth/create",
    tag = "Auth",
    request_body = CreateAccountRequest,
    responses(
        (status = 200, description = "Account created, OTP dispatched", body = MessageResponse),
        (status = 400, description = "Field validation failed: {errors: {field: message}}"),
        (status = 500, description = "Identity authority failed or unreachable")
    )
)]
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let errors = request.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let normalized = request.normalized();

    match state.authority.register(&normalized).await {
        Ok(()) => Ok(Json(MessageResponse {
            success: true,
            message: format!("Account created. {OTP_SENT_MESSAGE}"),
        })),
        Err(AuthorityError::Rejected { code, message }) => {
            Err(map_registration_rejection(code, message))
        }
        Err(e) => Err(ApiError::upstream(e.to_string())),
    }
}

/// Map an authority registration rejection onto the offending field, or
/// fall through to a generic upstream error for codes outside the known
/// vocabulary.
fn map_registration_rejection(code: AuthorityErrorCode, message: String) -> ApiError {
    match code {
        AuthorityErrorCode::UsernameTaken => {
            ApiError::field("username", "This username is already taken.")
        }
        AuthorityErrorCode::PhoneTaken => {
            ApiError::field("phone", "An account already exists for this phone number.")
        }
        AuthorityErrorCode::EmailTaken => ApiError::field("email", "This email is already in use."),
        AuthorityErrorCode::UserNotFound
        | AuthorityErrorCode::RateLimited
        | AuthorityErrorCode::Unknown(_) => ApiError::upstream(message),
    }
}

/// Dispatch a sign-in OTP to a returning user's phone.
///
/// OTP verification itself is an exchange between the client and the
/// identity authority; this endpoint only triggers the dispatch.
#[utoipa::path(
    post,
    path = "/api/auth/send-otp",
    tag = "Auth",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "OTP dispatched", body = MessageResponse),
        (status = 400, description = "Phone number format is invalid"),
        (status = 404, description = "No account for this phone number"),
        (status = 429, description = "Too many attempts"),
        (status = 500, description = "Identity authority failed or unreachable")
    )
)]
pub async fn send_otp(
    State(state): State<AppState>,
    Json(request): Json<SendOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if let Some(message) = phone_format_error(&request.phone) {
        return Err(ApiError::bad_request(message));
    }

    let phone = request.phone.trim();

    match state.authority.send_otp(phone).await {
        Ok(()) => Ok(Json(MessageResponse {
            success: true,
            message: OTP_SENT_MESSAGE.to_string(),
        })),
        Err(AuthorityError::Rejected { code, message }) => Err(match code {
            AuthorityErrorCode::UserNotFound => ApiError::not_found(NO_ACCOUNT_MESSAGE),
            AuthorityErrorCode::RateLimited => ApiError::rate_limited(RATE_LIMITED_MESSAGE),
            _ => ApiError::upstream(message),
        }),
        Err(e) => Err(ApiError::upstream(e.to_string())),
    }
}
