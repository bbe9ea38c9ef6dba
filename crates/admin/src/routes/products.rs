//! Product CRUD routes.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use mithai_core::{CategoryId, ProductId};

use crate::db::{ProductRepository, RepositoryError, products::ProductInput};
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::Product;
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list).post(create))
        .route(
            "/api/products/{id}",
            get(get_one).put(update).delete(delete),
        )
}

/// Request body for creating or updating a product.
#[derive(Debug, Deserialize)]
struct ProductRequest {
    title: String,
    description: Option<String>,
    price: Decimal,
    #[serde(default)]
    images: Vec<String>,
    category: Option<CategoryId>,
    #[serde(default)]
    properties: BTreeMap<String, String>,
}

impl ProductRequest {
    fn into_input(self) -> Result<ProductInput, AppError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("product title is required".to_string()));
        }
        if self.price < Decimal::ZERO {
            return Err(AppError::BadRequest("price must not be negative".to_string()));
        }

        Ok(ProductInput {
            title,
            description: self.description,
            price: self.price,
            images: self.images,
            category: self.category,
            properties: self.properties,
        })
    }
}

/// List all products.
async fn list(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    Ok(Json(products))
}

/// Get a single product.
async fn get_one(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(product))
}

/// Create a product.
async fn create(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(body): Json<ProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = ProductRepository::new(state.pool())
        .create(body.into_input()?)
        .await?;

    tracing::info!(product_id = %product.id, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product.
async fn update(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductRequest>,
) -> Result<Json<Product>, AppError> {
    let product = ProductRepository::new(state.pool())
        .update(id, body.into_input()?)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("product {id}")),
            other => AppError::Database(other),
        })?;

    Ok(Json(product))
}

/// Delete a product.
async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, AppError> {
    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("product {id}")),
            other => AppError::Database(other),
        })?;

    tracing::info!(product_id = %id, "Product deleted");

    Ok(StatusCode::NO_CONTENT)
}
