//! Admin user model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use mithai_core::{AdminUserId, Email};

/// An administrator who has signed in via Google at least once.
///
/// Authorization is decided by the configured email allow-list, not by this
/// table; a row here only records who has logged in and when. There are no
/// roles: allow-listed admins all have the same access.
#[derive(Debug, Clone, Serialize)]
pub struct AdminUser {
    /// Database ID.
    pub id: AdminUserId,
    /// Google account subject identifier (stable across email changes).
    pub google_sub: String,
    /// Email address from the Google profile.
    pub email: Email,
    /// Display name from the Google profile.
    pub name: Option<String>,
    /// Avatar URL from the Google profile.
    pub picture: Option<String>,
    /// When the user first signed in.
    pub created_at: DateTime<Utc>,
    /// When the user last signed in.
    pub last_login_at: DateTime<Utc>,
}
