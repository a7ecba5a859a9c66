// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Device wallet endpoints.
//!
//! The device wallet exists before any session does (it is the device's
//! identity, not the account's), so these endpoints are deliberately
//! unauthenticated. The private key never leaves the store; only the
//! derived address is exposed.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{MessageResponse, WalletAddress};
use crate::state::AppState;

/// Response for the device wallet address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeviceWalletResponse {
    /// The device wallet address.
    pub address: WalletAddress,
    /// True when this call generated the key pair.
    pub created: bool,
}

/// Get the device wallet address, generating the key pair on first use.
///
/// Idempotent: repeated calls return the same address until the wallet
/// is explicitly cleared.
#[utoipa::path(
    get,
    path = "/api/wallet",
    tag = "Wallet",
    responses(
        (status = 200, description = "Device wallet address", body = DeviceWalletResponse),
        (status = 503, description = "No persistent local store on this platform"),
        (status = 500, description = "Key generation or storage failed")
    )
)]
pub async fn get_wallet(
    State(state): State<AppState>,
) -> Result<Json<DeviceWalletResponse>, ApiError> {
    match state.keystore.get_or_create() {
        Ok(Some((record, created))) => {
            if created {
                tracing::info!(address = %record.address, "Generated device wallet");
            }
            Ok(Json(DeviceWalletResponse {
                address: record.address,
                created,
            }))
        }
        Ok(None) => Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Device wallet storage is not available on this platform.",
        )),
        Err(e) => Err(ApiError::internal(format!(
            "Failed to provision device wallet: {e}"
        ))),
    }
}

/// Clear the device wallet (explicit sign-out).
///
/// The next `GET /api/wallet` generates a fresh key pair; the cleared
/// key material is not recoverable.
#[utoipa::path(
    delete,
    path = "/api/wallet",
    tag = "Wallet",
    responses(
        (status = 200, description = "Wallet cleared (or nothing to clear)", body = MessageResponse),
        (status = 500, description = "Storage failed")
    )
)]
pub async fn clear_wallet(State(state): State<AppState>) -> Result<Json<MessageResponse>, ApiError> {
    match state.keystore.clear() {
        Ok(existed) => Ok(Json(MessageResponse {
            success: true,
            message: if existed {
                "Device wallet cleared.".to_string()
            } else {
                "No device wallet to clear.".to_string()
            },
        })),
        Err(e) => Err(ApiError::internal(format!(
            "Failed to clear device wallet: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::clients::{AuthorityError, BlobError, BlobStore, IdentityAuthority};
    use crate::models::CreateAccountRequest;
    use crate::storage::{UserRepository, WalletKeyStore};
    use crate::sync::DirectorySync;

    struct NoopAuthority;

    #[async_trait]
    impl IdentityAuthority for NoopAuthority {
        async fn register(&self, _request: &CreateAccountRequest) -> Result<(), AuthorityError> {
            Ok(())
        }
        async fn send_otp(&self, _phone: &str) -> Result<(), AuthorityError> {
            Ok(())
        }
    }

    struct NoopBlob;

    #[async_trait]
    impl BlobStore for NoopBlob {
        async fn put_avatar(&self, _user_id: &str, _payload: &str) -> Result<String, BlobError> {
            Ok("https://blob.example.com/noop.png".to_string())
        }
    }

    fn state_with_keystore(keystore: WalletKeyStore) -> (AppState, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let users = UserRepository::open(&dir.path().join("users.redb")).expect("open repo");
        let state = AppState::new(
            Arc::new(users),
            Arc::new(keystore),
            Arc::new(NoopAuthority),
            Arc::new(NoopBlob),
            DirectorySync::disabled(),
        );
        (state, dir)
    }

    #[tokio::test]
    async fn get_wallet_is_idempotent_until_cleared() {
        let dir = TempDir::new().expect("temp dir");
        let keystore = WalletKeyStore::open(&dir.path().join("wallet.redb")).expect("open store");
        let (state, _state_dir) = state_with_keystore(keystore);

        let first = get_wallet(State(state.clone())).await.unwrap().0;
        assert!(first.created);

        let second = get_wallet(State(state.clone())).await.unwrap().0;
        assert!(!second.created);
        assert_eq!(second.address, first.address);

        let cleared = clear_wallet(State(state.clone())).await.unwrap().0;
        assert!(cleared.success);

        let third = get_wallet(State(state)).await.unwrap().0;
        assert!(third.created);
        assert_ne!(third.address, first.address);
    }

    #[tokio::test]
    async fn disabled_keystore_reports_service_unavailable() {
        let (state, _dir) = state_with_keystore(WalletKeyStore::disabled());

        let error = get_wallet(State(state.clone())).await.unwrap_err();
        assert_eq!(error.status(), StatusCode::SERVICE_UNAVAILABLE);

        // clearing a disabled store is still a success, nothing to clear
        let cleared = clear_wallet(State(state)).await.unwrap().0;
        assert!(cleared.success);
    }
}
