// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the
//! environment at startup; the upstream clients each read their own keys
//! via `from_env`.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for local redb storage | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH_API_BASE_URL` | Identity authority base URL | Required |
//! | `DIRECTORY_API_BASE_URL` | Companion directory base URL | Optional (absence disables sync) |
//! | `DIRECTORY_API_KEY` | Companion directory API key | Optional (absence disables sync) |
//! | `BLOB_STORE_BASE_URL` | Blob store base URL for avatar uploads | Optional |
//! | `BLOB_STORE_TOKEN` | Blob store bearer token | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the local data directory path.
///
/// Holds the redb databases for the user view and the device wallet
/// slot. When the directory cannot be created the wallet key store runs
/// disabled (every operation a no-op) rather than failing startup.
///
/// # Default
/// `/data`
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default data directory when `DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "/data";

/// Identity authority base URL. Registration and OTP dispatch are
/// proxied here; the service refuses to start without it.
pub const AUTH_API_BASE_URL_ENV: &str = "AUTH_API_BASE_URL";

/// Companion directory base URL. Absence (of this or the API key)
/// silently disables directory sync; that is not an error.
pub const DIRECTORY_API_BASE_URL_ENV: &str = "DIRECTORY_API_BASE_URL";

/// Companion directory API key, sent as `x-api-key`.
pub const DIRECTORY_API_KEY_ENV: &str = "DIRECTORY_API_KEY";

/// Blob store base URL for avatar uploads. Absent means avatar updates
/// fail with an upstream error; the rest of the service is unaffected.
pub const BLOB_STORE_BASE_URL_ENV: &str = "BLOB_STORE_BASE_URL";

/// Blob store bearer token.
pub const BLOB_STORE_TOKEN_ENV: &str = "BLOB_STORE_TOKEN";
