//! Order repository for database operations.
//!
//! Orders are written by the checkout flow; the admin API only reads them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use mithai_core::{Email, OrderId};

use super::RepositoryError;
use crate::models::{LineItem, Order};

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    line_items: serde_json::Value,
    name: String,
    email: String,
    street_address: String,
    postal_code: String,
    country: String,
    total: Decimal,
    paid: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let line_items: Vec<LineItem> = serde_json::from_value(row.line_items)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid line items: {e}")))?;

        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            line_items,
            name: row.name,
            email,
            street_address: row.street_address,
            postal_code: row.postal_code,
            country: row.country,
            total: row.total,
            paid: row.paid,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored line items are invalid.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, line_items, name, email, street_address, postal_code,
                   country, total, paid, created_at, updated_at
            FROM admin.store_order
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion_parses_line_items() {
        let row = OrderRow {
            id: 12,
            line_items: serde_json::json!([
                { "name": "Besan Laddu", "quantity": 2, "unit_price": "450.00" }
            ]),
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            street_address: "12 MG Road".to_string(),
            postal_code: "560001".to_string(),
            country: "IN".to_string(),
            total: Decimal::new(90000, 2),
            paid: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let order = Order::try_from(row).unwrap();
        assert_eq!(order.id, OrderId::new(12));
        assert_eq!(order.line_items.len(), 1);
        assert_eq!(order.line_items.first().unwrap().quantity, 2);
        assert!(order.paid);
    }

    #[test]
    fn test_row_conversion_rejects_invalid_email() {
        let row = OrderRow {
            id: 12,
            line_items: serde_json::json!([]),
            name: "Asha Rao".to_string(),
            email: "not-an-email".to_string(),
            street_address: "12 MG Road".to_string(),
            postal_code: "560001".to_string(),
            country: "IN".to_string(),
            total: Decimal::ZERO,
            paid: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(matches!(
            Order::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
