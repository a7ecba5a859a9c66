// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Upstream Service Clients
//!
//! HTTP clients for the three external collaborators:
//!
//! - `identity` - the identity authority (registration, OTP dispatch)
//! - `directory` - the companion user directory (best-effort upsert)
//! - `blob` - the blob store holding avatar images
//!
//! Each client follows the same pattern: `is_configured()` checks the
//! environment, `from_env()` builds the client or reports the missing
//! key, every call is a single attempt with a bounded timeout, and errors
//! are stringified into a client-specific thiserror enum so raw transport
//! errors never cross the API boundary. The traits exist so tests can
//! substitute recording stubs.

use std::time::Duration;

pub mod blob;
pub mod directory;
pub mod identity;

pub use blob::{BlobError, BlobStore, DisabledBlobStore, HttpBlobStore};
pub use directory::{DirectoryError, DirectorySyncClient, DirectoryUpsert, SyncOutcome};
pub use identity::{AuthorityError, AuthorityErrorCode, HttpIdentityAuthority, IdentityAuthority};

/// Bounded timeout applied to every outbound call.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Read an environment variable, treating blank values as unset.
pub(crate) fn env_optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}
