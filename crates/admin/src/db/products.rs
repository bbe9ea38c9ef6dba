//! Product repository for database operations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use mithai_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::Product;

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    title: String,
    description: Option<String>,
    price: Decimal,
    images: Vec<String>,
    category_id: Option<i32>,
    properties: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let properties: BTreeMap<String, String> = serde_json::from_value(row.properties)
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid product properties: {e}"))
            })?;

        Ok(Self {
            id: ProductId::new(row.id),
            title: row.title,
            description: row.description,
            price: row.price,
            images: row.images,
            category: row.category_id.map(CategoryId::new),
            properties,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Parameters for creating or updating a product.
#[derive(Debug)]
pub struct ProductInput {
    /// Product title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Price in the store currency.
    pub price: Decimal,
    /// Image URLs in display order.
    pub images: Vec<String>,
    /// Category assignment.
    pub category: Option<CategoryId>,
    /// Chosen property values keyed by property name.
    pub properties: BTreeMap<String, String>,
}

const PRODUCT_COLUMNS: &str =
    "id, title, description, price, images, category_id, properties, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM admin.product ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM admin.product WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Count products assigned to a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_in_category(&self, category: CategoryId) -> Result<i64, RepositoryError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM admin.product WHERE category_id = $1")
                .bind(category.as_i32())
                .fetch_one(self.pool)
                .await?;

        Ok(count.0)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: ProductInput) -> Result<Product, RepositoryError> {
        let properties = serde_json::to_value(&input.properties)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO admin.product (title, description, price, images, category_id, properties)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.images)
        .bind(input.category.map(|c| c.as_i32()))
        .bind(properties)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Update a product, replacing all editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    pub async fn update(
        &self,
        id: ProductId,
        input: ProductInput,
    ) -> Result<Product, RepositoryError> {
        let properties = serde_json::to_value(&input.properties)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE admin.product
            SET title = $2, description = $3, price = $4, images = $5,
                category_id = $6, properties = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id.as_i32())
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.images)
        .bind(input.category.map(|c| c.as_i32()))
        .bind(properties)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM admin.product WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion_parses_properties() {
        let row = ProductRow {
            id: 7,
            title: "Besan Laddu".to_string(),
            description: None,
            price: Decimal::new(45000, 2),
            images: vec!["https://img.mithai.shop/a.jpg".to_string()],
            category_id: Some(3),
            properties: serde_json::json!({ "size": "M", "ghee": "yes" }),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let product = Product::try_from(row).unwrap();
        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.category, Some(CategoryId::new(3)));
        assert_eq!(product.properties.get("size").unwrap(), "M");
    }

    #[test]
    fn test_row_conversion_rejects_malformed_properties() {
        let row = ProductRow {
            id: 7,
            title: "Besan Laddu".to_string(),
            description: None,
            price: Decimal::ZERO,
            images: vec![],
            category_id: None,
            properties: serde_json::json!(["not", "a", "map"]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(matches!(
            Product::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
