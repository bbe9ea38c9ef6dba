//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use mithai_core::{AdminUserId, Email};

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the logged-in admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: Option<String>,
    /// Admin's avatar URL.
    pub picture: Option<String>,
}

/// OAuth state stored in the session between redirect and callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthState {
    /// Random CSRF token echoed back by Google.
    pub state: String,
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for in-flight Google OAuth state.
    pub const OAUTH_STATE: &str = "oauth_state";
}
