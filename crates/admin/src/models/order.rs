//! Order model.
//!
//! Orders are written by the checkout flow and are read-only in the admin
//! API, which only lists them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mithai_core::{Email, OrderId};

/// A purchased line item, denormalized at checkout time.
///
/// Snapshots the product name and unit price as they were when the order was
/// placed, so later catalog edits do not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name at time of purchase.
    pub name: String,
    /// Quantity purchased.
    pub quantity: i32,
    /// Unit price at time of purchase.
    pub unit_price: Decimal,
}

/// An order placed through the storefront.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Database ID.
    pub id: OrderId,
    /// Purchased items.
    pub line_items: Vec<LineItem>,
    /// Customer name.
    pub name: String,
    /// Customer email.
    pub email: Email,
    /// Shipping street address.
    pub street_address: String,
    /// Shipping postal code.
    pub postal_code: String,
    /// Shipping country.
    pub country: String,
    /// Order total in the store currency.
    pub total: Decimal,
    /// Whether payment has completed.
    pub paid: bool,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated (e.g. payment confirmation).
    pub updated_at: DateTime<Utc>,
}
