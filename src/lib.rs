// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Identity Server - Mini-App Identity & Session Service
//!
//! This crate provisions and authenticates end-user identities for the
//! Relational mini-app: it manages the device-bound wallet key pair,
//! proxies phone-OTP registration and sign-in to the identity authority,
//! resolves session cookies to local user records, and keeps the
//! companion user directory eventually consistent.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Session cookie resolution
//! - `clients` - Identity authority, directory, and blob store clients
//! - `storage` - Local redb stores (user view, device wallet slot)
//! - `sync` - Background directory sync worker

pub mod api;
pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod sync;
