// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Probe endpoints.
//!
//! Liveness only proves the process is up; readiness additionally reports
//! the state of the local stores and the directory sync worker. A
//! disabled wallet store or sync worker is a degraded-but-serving state,
//! not a failure: registration and sign-in still work without either.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Readiness report.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// `ok` when every component is up, `degraded` otherwise.
    pub status: String,
    pub checks: HealthChecks,
}

/// Per-component readiness.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// The HTTP service itself.
    pub service: String,
    /// Device wallet slot store: `ok` or `disabled`.
    pub wallet_store: String,
    /// Directory sync worker: `enabled` or `disabled`. Disabled simply
    /// means the companion directory is unconfigured.
    pub directory_sync: String,
}

/// Liveness report.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

fn ready_report(state: &AppState) -> ReadyResponse {
    let wallet_store = if state.keystore.is_available() {
        "ok"
    } else {
        "disabled"
    };
    let directory_sync = if state.directory.is_enabled() {
        "enabled"
    } else {
        "disabled"
    };

    let degraded = !state.keystore.is_available();
    ReadyResponse {
        status: if degraded { "degraded" } else { "ok" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            wallet_store: wallet_store.to_string(),
            directory_sync: directory_sync.to_string(),
        },
    }
}

/// Combined health summary.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Component status summary", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<ReadyResponse> {
    Json(ready_report(&state))
}

/// Liveness probe. Always 200 while the process runs; says nothing about
/// dependencies.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe. The user store is opened at startup or the process
/// exits, so a serving process is ready; degraded states still serve
/// traffic and report 200 with the detail in the body.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Ready, possibly degraded", body = ReadyResponse)
    )
)]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    (StatusCode::OK, Json(ready_report(&state)))
}
