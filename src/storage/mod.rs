// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Local Storage Module
//!
//! Persistent local state lives in embedded redb databases (pure Rust,
//! ACID) under the configured data directory:
//!
//! ```text
//! {DATA_DIR}/
//!   users.redb    # users: user_id → serialized UserAggregate
//!   wallet.redb   # device_wallet: single slot → serialized WalletRecord
//! ```
//!
//! Values are JSON bytes; redb provides atomicity and durability, the
//! models provide the schema. Both stores are injected through
//! [`crate::state::AppState`] so tests can substitute temp-dir instances,
//! and so the wallet slot's backend can be swapped (e.g. for an
//! encrypting store) without touching callers.

pub mod keystore;
pub mod users;

pub use keystore::{WalletKeyStore, WalletRecord};
pub use users::UserRepository;

/// Storage error type shared by the repositories.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("key generation failed: {0}")]
    KeyGeneration(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
