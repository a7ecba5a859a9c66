// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::clients::{BlobStore, IdentityAuthority};
use crate::storage::{UserRepository, WalletKeyStore};
use crate::sync::DirectorySync;

/// Shared application state, cloned into every handler.
///
/// Every collaborator sits behind an `Arc` (and the upstream ones behind
/// a trait), so tests can assemble a state from temp-dir stores and
/// recording stubs.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserRepository>,
    pub keystore: Arc<WalletKeyStore>,
    pub authority: Arc<dyn IdentityAuthority>,
    pub blob: Arc<dyn BlobStore>,
    pub directory: DirectorySync,
}

impl AppState {
    pub fn new(
        users: Arc<UserRepository>,
        keystore: Arc<WalletKeyStore>,
        authority: Arc<dyn IdentityAuthority>,
        blob: Arc<dyn BlobStore>,
        directory: DirectorySync,
    ) -> Self {
        Self {
            users,
            keystore,
            authority,
            blob,
            directory,
        }
    }
}
