//! Order listing routes.
//!
//! Orders are created by the storefront checkout; the admin API only lists
//! them, newest first.

use axum::{Json, Router, extract::State, routing::get};

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::Order;
use crate::state::AppState;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/orders", get(list))
}

/// List all orders, newest first.
async fn list(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;
    Ok(Json(orders))
}
