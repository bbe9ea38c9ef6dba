//! Category CRUD and property resolution routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use mithai_core::{Category, CategoryId, PropertyDefinition, resolve_properties};

use crate::db::{CategoryRepository, ProductRepository, RepositoryError, categories::CategoryInput};
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list).post(create))
        .route("/api/categories/{id}", axum::routing::put(update).delete(delete))
        .route("/api/categories/{id}/properties", get(properties))
}

/// Request body for creating or updating a category.
#[derive(Debug, Deserialize)]
struct CategoryRequest {
    name: String,
    parent: Option<CategoryId>,
    #[serde(default)]
    properties: Vec<PropertyDefinition>,
}

impl CategoryRequest {
    fn into_input(self) -> Result<CategoryInput, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("category name is required".to_string()));
        }

        for property in &self.properties {
            if property.name.trim().is_empty() {
                return Err(AppError::BadRequest(
                    "property names must not be empty".to_string(),
                ));
            }
        }

        Ok(CategoryInput {
            name,
            parent: self.parent,
            properties: self.properties,
        })
    }
}

/// List all categories.
async fn list(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = CategoryRepository::new(state.pool()).list_all().await?;
    Ok(Json(categories))
}

/// Create a category.
async fn create(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(body): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = CategoryRepository::new(state.pool())
        .create(body.into_input()?)
        .await?;

    state.catalog().invalidate().await;
    tracing::info!(category_id = %category.id, "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category.
async fn update(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Json(body): Json<CategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let category = CategoryRepository::new(state.pool())
        .update(id, body.into_input()?)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("category {id}")),
            other => AppError::Database(other),
        })?;

    state.catalog().invalidate().await;

    Ok(Json(category))
}

/// Delete a category.
///
/// Refused while products are still assigned to it.
async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode, AppError> {
    let products = ProductRepository::new(state.pool())
        .count_in_category(id)
        .await?;
    if products > 0 {
        return Err(AppError::Conflict(format!(
            "{products} product(s) still assigned to category {id}"
        )));
    }

    CategoryRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("category {id}")),
            other => AppError::Database(other),
        })?;

    state.catalog().invalidate().await;
    tracing::info!(category_id = %id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Resolve the full property chain for a category.
///
/// Walks from the category up through its ancestors and concatenates their
/// property definitions, most specific first. Unknown ids resolve to an
/// empty list rather than 404; an absent category simply offers no extra
/// product form fields.
async fn properties(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Vec<PropertyDefinition>>, AppError> {
    let catalog = state.catalog().snapshot(state.pool()).await?;
    Ok(Json(resolve_properties(&catalog, Some(id))))
}
