// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User profile endpoints.
//!
//! Updates are atomic per call: the avatar upload (if any) runs first,
//! and the mutation object is applied to the local store only after
//! every sub-upload has succeeded. A blob-store failure therefore leaves
//! the whole record untouched, including a display-name change carried
//! in the same request.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Session;
use crate::error::ApiError;
use crate::models::{SyncUserData, UpdateProfileRequest, UserProfileResponse};
use crate::state::AppState;

/// Envelope for profile views: `{user: {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// The post-mutation profile view.
    pub user: UserProfileResponse,
}

/// The resolved avatar instruction for one update call.
enum AvatarChange {
    Keep,
    Clear,
    Set(String),
}

/// Get the current session user's profile.
#[utoipa::path(
    get,
    path = "/api/user/me",
    tag = "User",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn get_current_user(Session(user): Session) -> Json<UserResponse> {
    Json(UserResponse { user: user.into() })
}

/// Update the session user's profile.
///
/// Both fields are tri-state: omitted leaves the stored value untouched,
/// an empty `displayName` (or a null/empty `profilePicture`) clears the
/// field, and a non-empty value replaces it. A non-empty
/// `profilePicture` is a base64 data URL persisted to the blob store.
#[utoipa::path(
    put,
    path = "/api/user/update",
    tag = "User",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Avatar upload failed or payload invalid"),
        (status = 401, description = "Unauthenticated"),
        (status = 500, description = "Failed to store the update")
    )
)]
pub async fn update_profile(
    Session(user): Session,
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    // Uploads first; the record is not touched until they all succeed.
    let avatar = match request.profile_picture.as_ref() {
        None => AvatarChange::Keep,
        Some(None) => AvatarChange::Clear,
        Some(Some(payload)) if payload.is_empty() => AvatarChange::Clear,
        Some(Some(payload)) => {
            let url = state
                .blob
                .put_avatar(&user.id, payload)
                .await
                .map_err(|e| {
                    ApiError::bad_request(format!("Failed to upload profile picture: {e}"))
                })?;
            AvatarChange::Set(url)
        }
    };

    let mut updated = user;
    if let Some(name) = request.display_name.as_ref() {
        updated.display_name = if name.is_empty() {
            None
        } else {
            Some(name.clone())
        };
    }
    match avatar {
        AvatarChange::Keep => {}
        AvatarChange::Clear => updated.avatar_url = None,
        AvatarChange::Set(url) => updated.avatar_url = Some(url),
    }

    state
        .users
        .put(&updated)
        .map_err(|e| ApiError::internal(format!("Failed to store profile update: {e}")))?;

    // Opportunistic directory sync, keyed on the device wallet address.
    // Never awaited, never able to fail this request.
    match state.keystore.load() {
        Ok(Some(wallet)) => {
            state
                .directory
                .dispatch(SyncUserData::from_user(&updated, wallet.address));
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Skipping directory sync; wallet slot unreadable");
        }
    }

    Ok(Json(UserResponse {
        user: updated.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::http::StatusCode;
    use tempfile::TempDir;
    use tokio_util::sync::CancellationToken;

    use crate::clients::{
        AuthorityError, BlobError, BlobStore, DirectoryError, DirectoryUpsert, IdentityAuthority,
        SyncOutcome,
    };
    use crate::models::{CreateAccountRequest, UserAggregate};
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

    /// Blob stub recording calls; fails every call when `failing`.
    struct RecordingBlob {
        calls: AtomicUsize,
        failing: bool,
    }

    impl RecordingBlob {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                failing: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                failing: true,
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BlobStore for RecordingBlob {
        async fn put_avatar(&self, user_id: &str, _payload: &str) -> Result<String, BlobError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing {
                Err(BlobError::Request("scripted upload failure".to_string()))
            } else {
                Ok(format!("https://blob.example.com/avatars/{user_id}.png"))
            }
        }
    }

    struct RecordingDirectory {
        records: std::sync::Mutex<Vec<SyncUserData>>,
    }

    #[async_trait]
    impl DirectoryUpsert for RecordingDirectory {
        async fn sync_user(&self, data: &SyncUserData) -> Result<SyncOutcome, DirectoryError> {
            self.records.lock().unwrap().push(data.clone());
            Ok(SyncOutcome {
                user: serde_json::json!({}),
                created: true,
            })
        }
    }

    fn test_state(blob: Arc<RecordingBlob>) -> (AppState, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let users = UserRepository::open(&dir.path().join("users.redb")).expect("open repo");
        let state = AppState::new(
            Arc::new(users),
            Arc::new(WalletKeyStore::disabled()),
            Arc::new(NoopAuthority),
            blob,
            DirectorySync::disabled(),
        );
        (state, dir)
    }

    fn seed_user(state: &AppState) -> UserAggregate {
        let user = UserAggregate {
            id: "user-1".to_string(),
            fid: 77,
            username: Some("alice".to_string()),
            display_name: Some("Alice".to_string()),
            avatar_url: Some("https://blob.example.com/avatars/old.png".to_string()),
        };
        state.users.put(&user).unwrap();
        user
    }

    fn request(body: &str) -> UpdateProfileRequest {
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn empty_display_name_clears_the_field() {
        let blob = RecordingBlob::ok();
        let (state, _dir) = test_state(blob.clone());
        let user = seed_user(&state);

        let response = update_profile(
            Session(user),
            State(state.clone()),
            Json(request(r#"{"displayName":""}"#)),
        )
        .await
        .unwrap();

        assert_eq!(response.0.user.display_name, None);
        // avatar untouched, no blob call
        let stored = state.users.get("user-1").unwrap().unwrap();
        assert_eq!(stored.display_name, None);
        assert_eq!(
            stored.avatar_url,
            Some("https://blob.example.com/avatars/old.png".to_string())
        );
        assert_eq!(blob.call_count(), 0);
    }

    #[tokio::test]
    async fn omitted_fields_leave_the_record_untouched() {
        let blob = RecordingBlob::ok();
        let (state, _dir) = test_state(blob.clone());
        let user = seed_user(&state);

        let response = update_profile(Session(user), State(state.clone()), Json(request("{}")))
            .await
            .unwrap();

        assert_eq!(response.0.user.display_name, Some("Alice".to_string()));
        let stored = state.users.get("user-1").unwrap().unwrap();
        assert_eq!(stored.display_name, Some("Alice".to_string()));
        assert_eq!(
            stored.avatar_url,
            Some("https://blob.example.com/avatars/old.png".to_string())
        );
        assert_eq!(blob.call_count(), 0);
    }

    #[tokio::test]
    async fn null_profile_picture_clears_the_avatar_without_an_upload() {
        let blob = RecordingBlob::ok();
        let (state, _dir) = test_state(blob.clone());
        let user = seed_user(&state);

        let response = update_profile(
            Session(user),
            State(state.clone()),
            Json(request(r#"{"profilePicture":null}"#)),
        )
        .await
        .unwrap();

        assert_eq!(response.0.user.pfp_url, None);
        assert_eq!(blob.call_count(), 0);

        // empty string behaves the same as null
        let user = state.users.get("user-1").unwrap().unwrap();
        let response = update_profile(
            Session(user),
            State(state.clone()),
            Json(request(r#"{"profilePicture":""}"#)),
        )
        .await
        .unwrap();
        assert_eq!(response.0.user.pfp_url, None);
        assert_eq!(blob.call_count(), 0);
    }

    #[tokio::test]
    async fn new_avatar_is_uploaded_and_stored() {
        let blob = RecordingBlob::ok();
        let (state, _dir) = test_state(blob.clone());
        let user = seed_user(&state);

        let response = update_profile(
            Session(user),
            State(state.clone()),
            Json(request(
                r#"{"profilePicture":"data:image/png;base64,AAAA"}"#,
            )),
        )
        .await
        .unwrap();

        assert_eq!(
            response.0.user.pfp_url,
            Some("https://blob.example.com/avatars/user-1.png".to_string())
        );
        assert_eq!(blob.call_count(), 1);
    }

    #[tokio::test]
    async fn blob_failure_aborts_the_whole_update() {
        let blob = RecordingBlob::failing();
        let (state, _dir) = test_state(blob.clone());
        let user = seed_user(&state);

        let error = update_profile(
            Session(user),
            State(state.clone()),
            Json(request(
                r#"{"displayName":"New Name","profilePicture":"data:image/png;base64,AAAA"}"#,
            )),
        )
        .await
        .unwrap_err();

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(blob.call_count(), 1);

        // nothing was applied: display name and avatar keep pre-call values
        let stored = state.users.get("user-1").unwrap().unwrap();
        assert_eq!(stored.display_name, Some("Alice".to_string()));
        assert_eq!(
            stored.avatar_url,
            Some("https://blob.example.com/avatars/old.png".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn successful_update_dispatches_directory_sync() {
        let dir = TempDir::new().expect("temp dir");
        let users = UserRepository::open(&dir.path().join("users.redb")).expect("open repo");
        let keystore = WalletKeyStore::open(&dir.path().join("wallet.redb")).expect("open store");
        let (wallet, _) = keystore.get_or_create().unwrap().unwrap();

        let directory = Arc::new(RecordingDirectory {
            records: std::sync::Mutex::new(Vec::new()),
        });
        let (sync, worker) = DirectorySync::channel(directory.clone());
        let shutdown = CancellationToken::new();
        let worker_handle = tokio::spawn(worker.run(shutdown.clone()));

        let state = AppState::new(
            Arc::new(users),
            Arc::new(keystore),
            Arc::new(NoopAuthority),
            RecordingBlob::ok(),
            sync,
        );
        let user = seed_user(&state);

        update_profile(
            Session(user),
            State(state.clone()),
            Json(request(r#"{"displayName":"Renamed"}"#)),
        )
        .await
        .unwrap();

        // dropping the state drops the last sync handle; the worker
        // drains the queue and exits on channel close
        drop(state);
        worker_handle.await.unwrap();
        drop(shutdown);

        let records = directory.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].public_address, wallet.address);
        assert_eq!(records[0].display_name, Some("Renamed".to_string()));
        assert_eq!(records[0].farcaster_id, Some(77));
    }
}
