//! Category repository for database operations.
//!
//! Properties are stored as a JSONB array of `{name, values}` objects so the
//! declared order survives the round-trip. Queries use the runtime-checked
//! sqlx API because the schema lives in a separate admin database.

use sqlx::PgPool;

use mithai_core::{Catalog, Category, CategoryId, PropertyDefinition};

use super::RepositoryError;

/// Internal row type for category queries.
#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    parent_id: Option<i32>,
    properties: serde_json::Value,
}

impl TryFrom<CategoryRow> for Category {
    type Error = RepositoryError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        let properties: Vec<PropertyDefinition> = serde_json::from_value(row.properties)
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid category properties: {e}"))
            })?;

        Ok(Self {
            id: CategoryId::new(row.id),
            name: row.name,
            parent: row.parent_id.map(CategoryId::new),
            properties,
        })
    }
}

/// Parameters for creating or updating a category.
#[derive(Debug)]
pub struct CategoryInput {
    /// Display name.
    pub name: String,
    /// Optional parent category.
    pub parent: Option<CategoryId>,
    /// Properties defined directly on this category.
    pub properties: Vec<PropertyDefinition>,
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored properties are invalid.
    pub async fn list_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, parent_id, properties
            FROM admin.category
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Load every category into an in-memory [`Catalog`] snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn load_catalog(&self) -> Result<Catalog, RepositoryError> {
        Ok(self.list_all().await?.into_iter().collect())
    }

    /// Get a category by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, parent_id, properties
            FROM admin.category
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a category.
    ///
    /// The parent reference is not validated against existing rows; a
    /// dangling parent simply ends property resolution at that point.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: CategoryInput) -> Result<Category, RepositoryError> {
        let properties = serde_json::to_value(&input.properties)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            INSERT INTO admin.category (name, parent_id, properties)
            VALUES ($1, $2, $3)
            RETURNING id, name, parent_id, properties
            ",
        )
        .bind(&input.name)
        .bind(input.parent.map(|c| c.as_i32()))
        .bind(properties)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Update a category, replacing its name, parent, and properties.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no category has this id.
    pub async fn update(
        &self,
        id: CategoryId,
        input: CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let properties = serde_json::to_value(&input.properties)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            UPDATE admin.category
            SET name = $2, parent_id = $3, properties = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, parent_id, properties
            ",
        )
        .bind(id.as_i32())
        .bind(&input.name)
        .bind(input.parent.map(|c| c.as_i32()))
        .bind(properties)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a category.
    ///
    /// Child categories keep their parent reference; it becomes dangling,
    /// which resolution treats as the end of the chain.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no category has this id.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM admin.category
            WHERE id = $1
            ",
        )
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
        let row = CategoryRow {
            id: 1,
            name: "laddu".to_string(),
            parent_id: Some(2),
            properties: serde_json::json!([
                { "name": "size", "values": ["S", "M"] }
            ]),
        };

        let category = Category::try_from(row).unwrap();
        assert_eq!(category.id, CategoryId::new(1));
        assert_eq!(category.parent, Some(CategoryId::new(2)));
        assert_eq!(category.properties.len(), 1);
        assert_eq!(category.properties.first().unwrap().name, "size");
    }

    #[test]
    fn test_row_conversion_rejects_malformed_properties() {
        let row = CategoryRow {
            id: 1,
            name: "laddu".to_string(),
            parent_id: None,
            properties: serde_json::json!({ "not": "an array" }),
        };

        assert!(matches!(
            Category::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
