//! Cached catalog snapshots for property resolution.
//!
//! Property resolution walks the whole category tree, so the tree is loaded
//! in one query and cached with `moka` (5-minute TTL). Category CRUD must
//! call [`CatalogService::invalidate`] so the next resolution sees a fresh
//! snapshot.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use mithai_core::Catalog;

use crate::db::{CategoryRepository, RepositoryError};

/// Single cache key; there is only one catalog.
const CATALOG_KEY: u8 = 0;

/// Cache TTL for catalog snapshots.
const CATALOG_TTL: Duration = Duration::from_secs(300);

/// Caching loader for [`Catalog`] snapshots.
#[derive(Clone)]
pub struct CatalogService {
    cache: Cache<u8, Arc<Catalog>>,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(CATALOG_TTL)
                .build(),
        }
    }

    /// Get the current catalog snapshot, loading it from the database on a
    /// cache miss.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the category table cannot be loaded.
    pub async fn snapshot(&self, pool: &PgPool) -> Result<Arc<Catalog>, RepositoryError> {
        if let Some(catalog) = self.cache.get(&CATALOG_KEY).await {
            debug!("Catalog cache hit");
            return Ok(catalog);
        }

        let catalog = Arc::new(CategoryRepository::new(pool).load_catalog().await?);
        self.cache.insert(CATALOG_KEY, Arc::clone(&catalog)).await;

        Ok(catalog)
    }

    /// Drop the cached snapshot after category CRUD.
    pub async fn invalidate(&self) {
        self.cache.invalidate(&CATALOG_KEY).await;
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new()
    }
}
