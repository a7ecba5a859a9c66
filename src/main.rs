// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use relational_identity_server::{
    api::router,
    clients::{
        BlobStore, DirectorySyncClient, DisabledBlobStore, HttpBlobStore, HttpIdentityAuthority,
    },
    config::{DATA_DIR_ENV, DEFAULT_DATA_DIR},
    state::AppState,
    storage::{UserRepository, WalletKeyStore},
    sync::DirectorySync,
};

#[tokio::main]
async fn main() {
    init_tracing();

    let data_dir = PathBuf::from(
        env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
    );

    // The user view is mandatory; the wallet slot degrades to a no-op
    // store on platforms without writable local storage.
    let users = UserRepository::open(&data_dir.join("users.redb"))
        .expect("Failed to open user repository");

    let keystore = match WalletKeyStore::open(&data_dir.join("wallet.redb")) {
        Ok(store) => store,
        Err(e) => {
            warn!(error = %e, "No persistent local store; device wallet disabled");
            WalletKeyStore::disabled()
        }
    };

    let authority = HttpIdentityAuthority::from_env()
        .expect("Identity authority configuration is required (AUTH_API_BASE_URL)");

    let blob: Arc<dyn BlobStore> = if HttpBlobStore::is_configured() {
        Arc::new(HttpBlobStore::from_env().expect("Blob store configuration is invalid"))
    } else {
        warn!("Blob store not configured; avatar uploads will fail");
        Arc::new(DisabledBlobStore)
    };

    let shutdown = CancellationToken::new();

    let directory = if DirectorySyncClient::is_configured() {
        let client =
            DirectorySyncClient::from_env().expect("Directory configuration is invalid");
        let (handle, worker) = DirectorySync::channel(Arc::new(client));
        tokio::spawn(worker.run(shutdown.clone()));
        handle
    } else {
        info!("Directory service not configured; sync disabled");
        DirectorySync::disabled()
    };

    let state = AppState::new(
        Arc::new(users),
        Arc::new(keystore),
        Arc::new(authority),
        blob,
        directory,
    );
    let app = router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");

    info!("Relational Identity server listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .expect("HTTP server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    match env::var("LOG_FORMAT").as_deref() {
        Ok("json") => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// Wait for ctrl-c, then cancel background tasks so the sync worker
/// drains before the process exits.
async fn shutdown_signal(shutdown: CancellationToken) {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
    shutdown.cancel();
}
