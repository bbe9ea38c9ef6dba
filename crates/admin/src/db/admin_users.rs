//! Admin user repository for database operations.
//!
//! Rows are written on successful allow-listed Google sign-in. The table is
//! a login record, not an access control list; authorization comes from the
//! configured email allow-list.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use mithai_core::{AdminUserId, Email};

use super::RepositoryError;
use crate::models::AdminUser;

/// Internal row type for admin user queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: i32,
    google_sub: String,
    email: String,
    name: Option<String>,
    picture: Option<String>,
    created_at: DateTime<Utc>,
    last_login_at: DateTime<Utc>,
}

impl TryFrom<AdminUserRow> for AdminUser {
    type Error = RepositoryError;

    fn try_from(row: AdminUserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: AdminUserId::new(row.id),
            google_sub: row.google_sub,
            email,
            name: row.name,
            picture: row.picture,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        })
    }
}

/// Profile fields captured from Google on sign-in.
#[derive(Debug)]
pub struct GoogleProfile {
    /// Google account subject identifier.
    pub google_sub: String,
    /// Verified email address.
    pub email: Email,
    /// Display name.
    pub name: Option<String>,
    /// Avatar URL.
    pub picture: Option<String>,
}

/// Repository for admin user database operations.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all admin users, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_all(&self) -> Result<Vec<AdminUser>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminUserRow>(
            r"
            SELECT id, google_sub, email, name, picture, created_at, last_login_at
            FROM admin.admin_user
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an admin user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: AdminUserId) -> Result<Option<AdminUser>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r"
            SELECT id, google_sub, email, name, picture, created_at, last_login_at
            FROM admin.admin_user
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Record a successful Google sign-in, creating the row on first login.
    ///
    /// Keyed by the Google subject so an email change on the Google side
    /// updates the row rather than creating a duplicate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn upsert_on_login(
        &self,
        profile: &GoogleProfile,
    ) -> Result<AdminUser, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r"
            INSERT INTO admin.admin_user (google_sub, email, name, picture)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (google_sub) DO UPDATE
            SET email = EXCLUDED.email,
                name = EXCLUDED.name,
                picture = EXCLUDED.picture,
                last_login_at = NOW()
            RETURNING id, google_sub, email, name, picture, created_at, last_login_at
            ",
        )
        .bind(&profile.google_sub)
        .bind(profile.email.as_str())
        .bind(&profile.name)
        .bind(&profile.picture)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion() {
        let row = AdminUserRow {
            id: 1,
            google_sub: "108234567890".to_string(),
            email: "owner@mithai.shop".to_string(),
            name: Some("Owner".to_string()),
            picture: None,
            created_at: Utc::now(),
            last_login_at: Utc::now(),
        };

        let user = AdminUser::try_from(row).unwrap();
        assert_eq!(user.id, AdminUserId::new(1));
        assert_eq!(user.email.as_str(), "owner@mithai.shop");
    }

    #[test]
    fn test_row_conversion_rejects_invalid_email() {
        let row = AdminUserRow {
            id: 1,
            google_sub: "108234567890".to_string(),
            email: "broken".to_string(),
            name: None,
            picture: None,
            created_at: Utc::now(),
            last_login_at: Utc::now(),
        };

        assert!(matches!(
            AdminUser::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
