// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Directory Sync Worker
//!
//! Background task that pushes local user records into the companion
//! directory service. Handlers call [`DirectorySync::dispatch`] after an
//! identity change; the record crosses an mpsc channel and the worker
//! performs the upsert off the caller's critical path.
//!
//! ## Strategy
//!
//! - `dispatch` never blocks and never fails the caller: a full queue or
//!   a disabled handle just drops the record with a log line.
//! - The worker makes up to [`MAX_ATTEMPTS`] attempts per record with a
//!   short capped backoff between them, then gives up with a warning.
//!   Success and failure are both logged so the eventual outcome stays
//!   observable.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown,
//! same pattern as the rest of the background tasks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::clients::DirectoryUpsert;
use crate::models::SyncUserData;

/// Records queued but not yet upserted. Beyond this, new records are
/// dropped (the directory is eventually consistent; the next identity
/// change re-enqueues current state).
const SYNC_QUEUE_DEPTH: usize = 64;

/// Attempts per record, including the first.
const MAX_ATTEMPTS: u32 = 3;

/// Delay before the second and third attempts.
const BACKOFF: [Duration; 2] = [Duration::from_secs(1), Duration::from_secs(5)];

/// Cheap handle carried in application state.
///
/// When the directory service is unconfigured the handle is disabled and
/// `dispatch` is a logged no-op, which is not an error condition.
#[derive(Clone)]
pub struct DirectorySync {
    tx: Option<mpsc::Sender<SyncUserData>>,
}

impl DirectorySync {
    /// A handle with no worker behind it; every dispatch is dropped.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Build a connected handle plus the worker that drains it.
    pub fn channel(client: Arc<dyn DirectoryUpsert>) -> (Self, DirectorySyncWorker) {
        let (tx, rx) = mpsc::channel(SYNC_QUEUE_DEPTH);
        (Self { tx: Some(tx) }, DirectorySyncWorker { client, rx })
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Queue a record for upsert. Never blocks, never fails the caller.
    pub fn dispatch(&self, data: SyncUserData) {
        let Some(tx) = &self.tx else {
            debug!(
                address = %data.public_address,
                "Directory sync disabled; dropping record"
            );
            return;
        };
        if let Err(e) = tx.try_send(data) {
            warn!(error = %e, "Directory sync queue full; dropping record");
        }
    }
}

/// Background worker that drains the sync queue.
pub struct DirectorySyncWorker {
    client: Arc<dyn DirectoryUpsert>,
    rx: mpsc::Receiver<SyncUserData>,
}

impl DirectorySyncWorker {
    /// Run until the cancellation token fires or every handle is dropped.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(worker.run(shutdown.clone()));
    /// ```
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!("Directory sync worker starting");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Directory sync worker shutting down");
                    return;
                }
                item = self.rx.recv() => {
                    match item {
                        Some(data) => self.sync_with_retry(data).await,
                        None => {
                            info!("Directory sync channel closed; worker stopping");
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Upsert one record with bounded retry.
    async fn sync_with_retry(&self, data: SyncUserData) {
        for attempt in 1..=MAX_ATTEMPTS {
            match self.client.sync_user(&data).await {
                Ok(outcome) => {
                    info!(
                        address = %data.public_address,
                        created = outcome.created,
                        "Directory sync: upserted user record"
                    );
                    return;
                }
                Err(e) if attempt < MAX_ATTEMPTS => {
                    warn!(
                        address = %data.public_address,
                        attempt,
                        error = %e,
                        "Directory sync attempt failed; retrying"
                    );
                    tokio::time::sleep(BACKOFF[(attempt - 1) as usize]).await;
                }
                Err(e) => {
                    warn!(
                        address = %data.public_address,
                        error = %e,
                        "Directory sync failed; giving up"
                    );
                }
            }
        }
    }
}
