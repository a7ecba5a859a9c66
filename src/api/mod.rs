// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        CreateAccountRequest, MessageResponse, SendOtpRequest, SyncUserData,
        UpdateProfileRequest, UserProfileResponse, WalletAddress,
    },
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod user;
pub mod wallet;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/auth/create", post(auth::create_account))
        .route("/auth/send-otp", post(auth::send_otp))
        .route(
            "/user/update",
            put(user::update_profile).patch(user::update_profile),
        )
        .route("/user/me", get(user::get_current_user))
        .route(
            "/wallet",
            get(wallet::get_wallet).delete(wallet::clear_wallet),
        );

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::create_account,
        auth::send_otp,
        user::get_current_user,
        user::update_profile,
        wallet::get_wallet,
        wallet::clear_wallet,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            CreateAccountRequest,
            SendOtpRequest,
            MessageResponse,
            UpdateProfileRequest,
            UserProfileResponse,
            SyncUserData,
            WalletAddress,
            user::UserResponse,
            wallet::DeviceWalletResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Registration and sign-in OTP dispatch"),
        (name = "User", description = "Session user profile"),
        (name = "Wallet", description = "Device wallet key pair"),
        (name = "Health", description = "Probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::clients::{AuthorityError, BlobError, BlobStore, IdentityAuthority};
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

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let dir = TempDir::new().expect("temp dir");
        let users = UserRepository::open(&dir.path().join("users.redb")).expect("open repo");
        let state = AppState::new(
            Arc::new(users),
            Arc::new(WalletKeyStore::disabled()),
            Arc::new(NoopAuthority),
            Arc::new(NoopBlob),
            DirectorySync::disabled(),
        );

        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}
