// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Resolution Module
//!
//! Resolves the mini-app session cookie to a local user record.
//!
//! ## Session Flow
//!
//! 1. The identity authority verifies the OTP and sets the session cookie
//! 2. The client sends `Cookie: session_id=<user id>` on every request
//! 3. This service:
//!    - Parses the cookie into a typed [`session::SessionCredential`]
//!    - Loads the [`crate::models::UserAggregate`] from the local store
//!
//! ## Security
//!
//! - The cookie's lifecycle (issuance, expiry, revocation) is owned by
//!   the identity authority; this layer only reads it
//! - Missing, malformed, and stale credentials produce one identical
//!   401 response, so the endpoint cannot be used to probe which user
//!   ids exist

pub mod error;
pub mod session;

pub use error::AuthError;
pub use session::{Session, SESSION_COOKIE};
