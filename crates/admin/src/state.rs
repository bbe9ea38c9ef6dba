//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::services::{CatalogService, GoogleAuthClient, ObjectStorageClient};

/// Shared application state for the admin API.
///
/// Cheap to clone; all fields live behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    google: GoogleAuthClient,
    storage: ObjectStorageClient,
    catalog: CatalogService,
}

impl AppState {
    /// Build application state from configuration and a database pool.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let google = GoogleAuthClient::new(&config.google, &config.base_url);
        let storage = ObjectStorageClient::new(&config.storage);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                google,
                storage,
                catalog: CatalogService::new(),
            }),
        }
    }

    /// Application configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Google OAuth client.
    #[must_use]
    pub fn google(&self) -> &GoogleAuthClient {
        &self.inner.google
    }

    /// Object storage client.
    #[must_use]
    pub fn storage(&self) -> &ObjectStorageClient {
        &self.inner.storage
    }

    /// Cached catalog snapshots.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }
}
