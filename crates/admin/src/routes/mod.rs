//! HTTP route handlers for the admin API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (verifies database)
//!
//! # Auth (Google sign-in, allow-listed emails only)
//! GET  /auth/google/login               - Redirect into Google OAuth
//! GET  /auth/google/callback            - OAuth callback
//! POST /auth/logout                     - Logout
//! GET  /auth/me                         - Current admin identity
//!
//! # Categories
//! GET    /api/categories                - List categories
//! POST   /api/categories                - Create category
//! PUT    /api/categories/{id}           - Update category
//! DELETE /api/categories/{id}           - Delete category
//! GET    /api/categories/{id}/properties - Resolved property chain
//!
//! # Products
//! GET    /api/products                  - List products
//! POST   /api/products                  - Create product
//! GET    /api/products/{id}             - Get product
//! PUT    /api/products/{id}             - Update product
//! DELETE /api/products/{id}             - Delete product
//!
//! # Orders (read-only)
//! GET  /api/orders                      - List orders, newest first
//!
//! # Uploads
//! POST /api/upload                      - Upload product images
//! ```

pub mod auth;
pub mod categories;
pub mod orders;
pub mod products;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router (without the health endpoints).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(uploads::router())
}
