//! Seed the database with a sample catalog.
//!
//! Intended for local development: creates a small category tree with
//! inherited properties and a few products. Running it twice creates
//! duplicate rows; wipe the tables first if you need a clean slate.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

use mithai_admin::db::{
    self, CategoryRepository, ProductRepository, RepositoryError, categories::CategoryInput,
    products::ProductInput,
};
use mithai_core::PropertyDefinition;

/// Errors from seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Seed sample categories and products.
///
/// # Errors
///
/// Returns `SeedError` if the database URL is missing or any insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| SeedError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    let pool = db::create_pool(&SecretString::from(database_url)).await?;

    let categories = CategoryRepository::new(&pool);

    let sweets = categories
        .create(CategoryInput {
            name: "Sweets".to_string(),
            parent: None,
            properties: vec![PropertyDefinition::new(
                "box",
                vec!["250g".to_string(), "500g".to_string(), "1kg".to_string()],
            )],
        })
        .await?;

    let laddu = categories
        .create(CategoryInput {
            name: "Laddu".to_string(),
            parent: Some(sweets.id),
            properties: vec![PropertyDefinition::new(
                "ghee",
                vec!["pure".to_string(), "regular".to_string()],
            )],
        })
        .await?;

    tracing::info!(parent = %sweets.id, child = %laddu.id, "Seeded categories");

    let products = ProductRepository::new(&pool);

    let mut properties = BTreeMap::new();
    properties.insert("box".to_string(), "500g".to_string());
    properties.insert("ghee".to_string(), "pure".to_string());

    let besan = products
        .create(ProductInput {
            title: "Besan Laddu".to_string(),
            description: Some("Roasted gram flour laddu with pure ghee.".to_string()),
            price: Decimal::new(45000, 2),
            images: vec![],
            category: Some(laddu.id),
            properties,
        })
        .await?;

    let kaju = products
        .create(ProductInput {
            title: "Kaju Katli".to_string(),
            description: Some("Classic cashew diamonds.".to_string()),
            price: Decimal::new(65000, 2),
            images: vec![],
            category: Some(sweets.id),
            properties: BTreeMap::new(),
        })
        .await?;

    tracing::info!(first = %besan.id, second = %kaju.id, "Seeded products");
    tracing::info!("Seed complete!");

    Ok(())
}
