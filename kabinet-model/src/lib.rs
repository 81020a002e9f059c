//! Data model definitions shared across Kabinet crates.
//!
//! Everything here mirrors the account service's wire format: camelCase
//! field names, UTC timestamps, and partial-patch update bodies where
//! omitted fields are left unchanged server-side.

pub mod auth;
pub mod profile;
pub mod user;

pub use auth::{AuthResponse, Credentials};
pub use profile::{Gender, Profile, UpdateProfileRequest};
pub use user::{UpdateUserRequest, User};

use serde::{Deserialize, Serialize};

/// Generic `{message}` response returned by logout, delete and restore
/// endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

/// Response of the avatar upload and refresh-url endpoints.
///
/// The `file` payload is service-internal bookkeeping (storage ids,
/// checksums) that the client never interprets, so it stays untyped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarUploadResponse {
    pub file: serde_json::Value,
    pub url: String,
    pub profile: Profile,
}
