// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures used by the REST API, plus the
//! field validation that runs before any call leaves the process. All
//! types derive `Serialize`, `Deserialize`, and `ToSchema` for automatic
//! JSON handling and OpenAPI documentation.
//!
//! ## Wallet Address Type
//!
//! The [`WalletAddress`] newtype wraps Ethereum-style addresses
//! (0x-prefixed, 40 hex characters). It provides type safety and clear
//! semantics.
//!
//! ## Validation
//!
//! [`CreateAccountRequest::validate`] collects every failing field into
//! one map so the client can render all problems at once; nothing is sent
//! to the identity authority until the map is empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Ethereum-compatible wallet address wrapper.
///
/// Provides type safety for the device wallet address throughout the API.
/// Format: `0x` followed by 40 hexadecimal characters (20 bytes).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletAddress(pub String);

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress(value)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.to_string())
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// =============================================================================
// User Aggregate
// =============================================================================

/// The local view of a user record.
///
/// The identity authority owns the account; this service holds a
/// read/mutate-by-proxy view keyed by the session-resolved id.
/// `display_name` and `avatar_url` are independently clearable.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserAggregate {
    /// Unique user identifier (also the session cookie value).
    pub id: String,
    /// Farcaster id assigned by the identity authority.
    pub fid: i64,
    /// Handle chosen at registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Display name; `None` when cleared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Avatar URL in the blob store; `None` when cleared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Profile view returned by the user endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    /// Unique user identifier.
    pub id: String,
    /// Farcaster id.
    pub fid: i64,
    /// Handle chosen at registration.
    pub username: Option<String>,
    /// Display name, null when cleared.
    pub display_name: Option<String>,
    /// Avatar URL, null when cleared.
    pub pfp_url: Option<String>,
}

impl From<UserAggregate> for UserProfileResponse {
    fn from(user: UserAggregate) -> Self {
        Self {
            id: user.id,
            fid: user.fid,
            username: user.username,
            display_name: user.display_name,
            pfp_url: user.avatar_url,
        }
    }
}

// =============================================================================
// Registration / OTP Models
// =============================================================================

/// Request to create a new account with the identity authority.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    /// Desired handle. Letters, digits, and underscores; at least 3 chars.
    pub username: String,
    /// Display name shown to other users. At least 2 chars after trim.
    #[serde(rename = "name")]
    pub display_name: String,
    /// Phone number the OTP is dispatched to. Exactly 10 decimal digits.
    pub phone: String,
    /// Optional contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CreateAccountRequest {
    /// Validate every field and collect all failures.
    ///
    /// An empty map means the request may be forwarded to the identity
    /// authority; a non-empty map must be returned to the client without
    /// any network call.
    pub fn validate(&self) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();

        let username = self.username.trim();
        if username.is_empty() {
            errors.insert("username".to_string(), "Username is required.".to_string());
        } else if username.len() < 3 {
            errors.insert(
                "username".to_string(),
                "Username must be at least 3 characters.".to_string(),
            );
        } else if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            errors.insert(
                "username".to_string(),
                "Username may only contain letters, numbers, and underscores.".to_string(),
            );
        }

        let display_name = self.display_name.trim();
        if display_name.is_empty() {
            errors.insert("name".to_string(), "Display name is required.".to_string());
        } else if display_name.chars().count() < 2 {
            errors.insert(
                "name".to_string(),
                "Display name must be at least 2 characters.".to_string(),
            );
        }

        if let Some(message) = phone_format_error(&self.phone) {
            errors.insert("phone".to_string(), message.to_string());
        }

        if let Some(email) = self.email.as_deref() {
            let email = email.trim();
            if !email.is_empty() && !is_valid_email(email) {
                errors.insert(
                    "email".to_string(),
                    "Enter a valid email address.".to_string(),
                );
            }
        }

        errors
    }

    /// Produce the canonical form forwarded to the identity authority:
    /// trimmed fields, lower-cased username, blank email dropped.
    pub fn normalized(&self) -> Self {
        Self {
            username: self.username.trim().to_lowercase(),
            display_name: self.display_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self
                .email
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string),
        }
    }
}

/// Request to dispatch a sign-in OTP to a returning user's phone.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendOtpRequest {
    /// Phone number of the existing account. Exactly 10 decimal digits.
    pub phone: String,
}

/// Generic success acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Human-readable outcome description.
    pub message: String,
}

// =============================================================================
// Profile Update Models
// =============================================================================

/// Request to update the session user's profile.
///
/// Both fields are tri-state:
/// - omitted: leave the stored value untouched
/// - `displayName: ""` / `profilePicture: null` or `""`: clear the value
/// - non-empty: replace the value (`profilePicture` is a base64 data URL
///   that gets persisted to the blob store)
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New display name; empty string clears the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// New avatar as a data URL; null or empty string clears the avatar.
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub profile_picture: Option<Option<String>>,
}

/// Distinguishes "field absent" from "field present but null".
///
/// serde collapses both to `None` for a plain `Option`; wrapping the
/// present case in `Some` preserves the difference.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// =============================================================================
// Directory Sync Models
// =============================================================================

/// Record upserted into the companion directory service.
///
/// Keyed on `publicAddress`; the directory decides whether the upsert
/// created or updated the record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncUserData {
    /// Device wallet address, the directory's unique key.
    pub public_address: WalletAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farcaster_id: Option<i64>,
}

impl SyncUserData {
    /// Build a directory record from the local user view and the device
    /// wallet address.
    pub fn from_user(user: &UserAggregate, address: WalletAddress) -> Self {
        Self {
            public_address: address,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            avatar_url: user.avatar_url.clone(),
            farcaster_id: Some(user.fid),
        }
    }
}

// =============================================================================
// Validation Helpers
// =============================================================================

/// Check the 10-decimal-digit phone format shared by registration and
/// OTP dispatch. Returns the user-facing message on failure.
pub fn phone_format_error(phone: &str) -> Option<&'static str> {
    let phone = phone.trim();
    if phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit()) {
        None
    } else {
        Some("Phone number must be exactly 10 digits.")
    }
}

/// Basic `local@domain.tld` shape check. Deliverability is the identity
/// authority's problem; this only rejects obvious nonsense.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
