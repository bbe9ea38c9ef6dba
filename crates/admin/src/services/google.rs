//! Google OAuth 2.0 client for admin sign-in.
//!
//! # OAuth Flow
//!
//! 1. Generate authorization URL with `authorization_url()`
//! 2. Redirect the admin to Google's consent page
//! 3. Google redirects back with an authorization code
//! 4. Exchange the code for tokens with `exchange_code()`
//! 5. Fetch the verified profile with `fetch_userinfo()`
//!
//! Authorization is decided afterwards against the configured email
//! allow-list; this client only establishes who the user is.

use std::sync::Arc;

use rand::Rng;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use crate::config::GoogleConfig;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Errors from the Google OAuth flow.
#[derive(Debug, Error)]
pub enum GoogleAuthError {
    /// HTTP request to Google failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token exchange was rejected.
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// Userinfo endpoint returned an unusable profile.
    #[error("userinfo failed: {0}")]
    Userinfo(String),
}

/// Tokens returned by Google's token endpoint.
#[derive(Debug, Deserialize)]
pub struct GoogleTokens {
    /// Bearer token for Google API calls (userinfo).
    pub access_token: String,
}

/// Profile claims from the OpenID Connect userinfo endpoint.
#[derive(Debug, Deserialize)]
pub struct GoogleUserInfo {
    /// Stable Google account identifier.
    pub sub: String,
    /// Email address.
    pub email: String,
    /// Whether Google has verified the email.
    #[serde(default)]
    pub email_verified: bool,
    /// Display name.
    pub name: Option<String>,
    /// Avatar URL.
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Client for Google's OAuth 2.0 / OpenID Connect endpoints.
#[derive(Clone)]
pub struct GoogleAuthClient {
    inner: Arc<GoogleAuthClientInner>,
}

struct GoogleAuthClientInner {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl GoogleAuthClient {
    /// Create a new Google OAuth client.
    ///
    /// `base_url` is the public admin URL; the OAuth redirect URI is derived
    /// from it and must match the URI registered in the Google console.
    #[must_use]
    pub fn new(config: &GoogleConfig, base_url: &str) -> Self {
        Self {
            inner: Arc::new(GoogleAuthClientInner {
                client: reqwest::Client::new(),
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.expose_secret().to_string(),
                redirect_uri: format!("{}/auth/google/callback", base_url.trim_end_matches('/')),
            }),
        }
    }

    /// Get the OAuth client ID (safe to expose in redirects).
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.inner.client_id
    }

    /// Generate a random state token for CSRF protection.
    #[must_use]
    pub fn generate_state() -> String {
        let bytes: [u8; 32] = rand::rng().random();
        hex::encode(bytes)
    }

    /// Generate the authorization URL for admin login.
    ///
    /// Redirect the admin to this URL to begin the OAuth flow. The `state`
    /// must be stored in the session and checked in the callback.
    #[must_use]
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{AUTH_ENDPOINT}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            urlencoding::encode(&self.inner.client_id),
            urlencoding::encode(&self.inner.redirect_uri),
            urlencoding::encode("openid email profile"),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    ///
    /// Returns `GoogleAuthError::TokenExchange` if Google rejects the code,
    /// or `GoogleAuthError::Http` on transport failure.
    pub async fn exchange_code(&self, code: &str) -> Result<GoogleTokens, GoogleAuthError> {
        let response = self
            .inner
            .client
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("client_id", self.inner.client_id.as_str()),
                ("client_secret", self.inner.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.inner.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let error: TokenErrorResponse = response.json().await.map_err(|e| {
                GoogleAuthError::TokenExchange(format!("unreadable error response: {e}"))
            })?;
            return Err(GoogleAuthError::TokenExchange(format!(
                "{}: {}",
                error.error,
                error.error_description.unwrap_or_default()
            )));
        }

        Ok(response.json().await?)
    }

    /// Fetch the verified profile for an access token.
    ///
    /// # Errors
    ///
    /// Returns `GoogleAuthError::Userinfo` if the profile has no verified
    /// email, or `GoogleAuthError::Http` on transport failure.
    pub async fn fetch_userinfo(
        &self,
        access_token: &str,
    ) -> Result<GoogleUserInfo, GoogleAuthError> {
        let response = self
            .inner
            .client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GoogleAuthError::Userinfo(format!(
                "status {}",
                response.status()
            )));
        }

        let info: GoogleUserInfo = response.json().await?;

        if !info.email_verified {
            return Err(GoogleAuthError::Userinfo(
                "email not verified by Google".to_string(),
            ));
        }

        Ok(info)
    }
}
