//! Database-backed tests for catalog loading and property resolution.
//!
//! These tests require a `PostgreSQL` database with migrations applied and
//! `ADMIN_DATABASE_URL` set. They create their own categories and clean
//! them up afterwards.
//!
//! Run with: cargo test -p mithai-integration-tests -- --ignored

use secrecy::SecretString;
use sqlx::PgPool;

use mithai_admin::db::{CategoryRepository, categories::CategoryInput};
use mithai_core::{PropertyDefinition, resolve_properties};

async fn connect() -> PgPool {
    dotenvy::dotenv().ok();
    let url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("ADMIN_DATABASE_URL must be set");
    mithai_admin::db::create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to database")
}

#[tokio::test]
#[ignore = "Requires PostgreSQL with migrations applied"]
async fn test_resolution_over_database_loaded_catalog() {
    let pool = connect().await;
    let repo = CategoryRepository::new(&pool);

    let root = repo
        .create(CategoryInput {
            name: "it-sweets".to_string(),
            parent: None,
            properties: vec![PropertyDefinition::new(
                "box",
                vec!["250g".to_string(), "500g".to_string()],
            )],
        })
        .await
        .expect("Failed to create root category");

    let leaf = repo
        .create(CategoryInput {
            name: "it-laddu".to_string(),
            parent: Some(root.id),
            properties: vec![PropertyDefinition::new("ghee", vec!["pure".to_string()])],
        })
        .await
        .expect("Failed to create leaf category");

    let catalog = repo.load_catalog().await.expect("Failed to load catalog");
    let resolved = resolve_properties(&catalog, Some(leaf.id));

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved.first().expect("leaf property").name, "ghee");
    assert_eq!(resolved.last().expect("root property").name, "box");

    repo.delete(leaf.id).await.expect("cleanup leaf");
    repo.delete(root.id).await.expect("cleanup root");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL with migrations applied"]
async fn test_dangling_parent_survives_round_trip() {
    let pool = connect().await;
    let repo = CategoryRepository::new(&pool);

    let orphan = repo
        .create(CategoryInput {
            name: "it-orphan".to_string(),
            parent: Some(mithai_core::CategoryId::new(999_999)),
            properties: vec![PropertyDefinition::new("size", vec!["S".to_string()])],
        })
        .await
        .expect("Failed to create category with dangling parent");

    let catalog = repo.load_catalog().await.expect("Failed to load catalog");
    let resolved = resolve_properties(&catalog, Some(orphan.id));

    // The dangling parent ends the walk after the category's own properties
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved.first().expect("own property").name, "size");

    repo.delete(orphan.id).await.expect("cleanup");
}
