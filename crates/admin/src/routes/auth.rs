//! Google sign-in routes.
//!
//! Authentication is Google OAuth; authorization is the configured email
//! allow-list. An authenticated Google account that is not on the list gets
//! 403 and no session.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;

use mithai_core::Email;

use crate::db::{AdminUserRepository, admin_users::GoogleProfile};
use crate::error::AppError;
use crate::middleware::{RequireAdminAuth, clear_current_admin, set_current_admin};
use crate::models::{
    CurrentAdmin,
    session::{OAuthState, keys},
};
use crate::services::GoogleAuthClient;
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/google/login", get(login))
        .route("/auth/google/callback", get(callback))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

/// Start the Google OAuth flow.
///
/// Stores a CSRF state token in the session and redirects to Google.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
async fn login(State(state): State<AppState>, session: Session) -> Result<Redirect, AppError> {
    let csrf_state = GoogleAuthClient::generate_state();

    session
        .insert(
            keys::OAUTH_STATE,
            OAuthState {
                state: csrf_state.clone(),
            },
        )
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    Ok(Redirect::to(&state.google().authorization_url(&csrf_state)))
}

/// Query parameters Google sends to the callback.
#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Complete the Google OAuth flow.
///
/// Verifies the CSRF state, exchanges the code, checks the verified email
/// against the allow-list, records the login, and establishes the session.
///
/// # Errors
///
/// Returns 401 for a missing or mismatched state, 403 for an email that is
/// not on the allow-list, and 502 if Google is unreachable.
async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect, AppError> {
    if let Some(error) = query.error {
        return Err(AppError::Unauthorized(format!("Google sign-in failed: {error}")));
    }

    let code = query
        .code
        .ok_or_else(|| AppError::BadRequest("missing authorization code".to_string()))?;

    // One-shot CSRF check against the state stored at login
    let stored: Option<OAuthState> = session
        .remove(keys::OAUTH_STATE)
        .await
        .map_err(|e| AppError::Internal(format!("session read failed: {e}")))?;
    let stored = stored
        .ok_or_else(|| AppError::Unauthorized("no sign-in in progress".to_string()))?;

    if query.state.as_deref() != Some(stored.state.as_str()) {
        return Err(AppError::Unauthorized("state mismatch".to_string()));
    }

    let tokens = state.google().exchange_code(&code).await?;
    let info = state.google().fetch_userinfo(&tokens.access_token).await?;

    let email = Email::parse(&info.email)
        .map_err(|e| AppError::Internal(format!("Google returned invalid email: {e}")))?;

    if !state.config().is_admin_email(&email) {
        tracing::warn!(email = %email, "Sign-in attempt from email not on the allow-list");
        return Err(AppError::Forbidden(
            "this account is not an administrator".to_string(),
        ));
    }

    let admin = AdminUserRepository::new(state.pool())
        .upsert_on_login(&GoogleProfile {
            google_sub: info.sub,
            email,
            name: info.name,
            picture: info.picture,
        })
        .await?;

    // Rotate the session id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session rotation failed: {e}")))?;

    set_current_admin(
        &session,
        &CurrentAdmin {
            id: admin.id,
            email: admin.email.clone(),
            name: admin.name.clone(),
            picture: admin.picture.clone(),
        },
    )
    .await
    .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    crate::error::set_sentry_user(admin.id.as_i32(), Some(admin.email.as_str()));
    tracing::info!(admin_user_id = %admin.id, "Admin signed in");

    Ok(Redirect::to("/"))
}

/// Log out the current admin.
async fn logout(session: Session) -> Result<StatusCode, AppError> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
    crate::error::clear_sentry_user();

    Ok(StatusCode::NO_CONTENT)
}

/// Return the logged-in admin's identity.
async fn me(RequireAdminAuth(admin): RequireAdminAuth) -> Json<CurrentAdmin> {
    Json(admin)
}
