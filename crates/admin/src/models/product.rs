//! Product model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use mithai_core::{CategoryId, ProductId};

/// A product in the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Database ID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Optional long-form description.
    pub description: Option<String>,
    /// Price in the store currency.
    pub price: Decimal,
    /// Public URLs of uploaded product images, in display order.
    pub images: Vec<String>,
    /// Category assignment. `None` means uncategorized.
    pub category: Option<CategoryId>,
    /// Chosen property values, keyed by property name (e.g. "color" -> "red").
    ///
    /// The keys come from the resolved property chain of the assigned
    /// category; values the category chain no longer offers are kept as-is.
    pub properties: BTreeMap<String, String>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}
