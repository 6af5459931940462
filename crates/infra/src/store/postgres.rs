//! Postgres-backed order store.
//!
//! Orders are stored as JSONB documents (the full aggregate, lines included) in
//! the `orders` table, with `id`, `user_id` and `date` duplicated into columns
//! for joins and ordering. Reference data lives in plain relational tables.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use orderdesk_core::{AggregateId, PageRequest, UserId};
use orderdesk_orders::{CatalogProduct, Customer, Offer, OfferId, Order, OrderId, ProductId};

use super::{OrderStore, StoreError};
use crate::read_model::{DetailLine, OrderDetail, OrderListEntry};

const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        mobile TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS offers (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        discount_percent SMALLINT NOT NULL,
        expires_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        price BIGINT NOT NULL,
        offer_id UUID REFERENCES offers (id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        date TIMESTAMPTZ NOT NULL,
        document JSONB NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS orders_date_idx ON orders (date DESC)",
];

/// Postgres-backed order store.
///
/// Uses the SQLx connection pool, which is `Send + Sync`. No transaction wraps a
/// load/save pair; `save_order` is a single upsert of the whole document.
#[derive(Debug, Clone)]
pub struct PostgresOrderStore {
    pool: Arc<PgPool>,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect to `database_url` and make sure the tables exist.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }

    async fn find_customer(&self, id: UserId) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, mobile
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_customer", e))?;

        row.map(|r| customer_from_row(&r, "id")).transpose()
    }

    async fn find_products(
        &self,
        ids: Vec<uuid::Uuid>,
    ) -> Result<HashMap<ProductId, (CatalogProduct, Option<Offer>)>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                p.id,
                p.name,
                p.price,
                p.offer_id,
                f.name AS offer_name,
                f.discount_percent,
                f.expires_at
            FROM products p
            LEFT JOIN offers f ON f.id = p.offer_id
            WHERE p.id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_products", e))?;

        let mut out = HashMap::with_capacity(rows.len());
        for row in rows {
            let (product, offer) = product_from_row(&row)?;
            out.insert(product.id, (product, offer));
        }
        Ok(out)
    }
}

#[async_trait::async_trait]
impl OrderStore for PostgresOrderStore {
    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query("SELECT document FROM orders WHERE id = $1")
            .bind(id.0.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_order", e))?;

        row.map(|r| order_from_row(&r)).transpose()
    }

    async fn save_order(&self, order: &Order) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, date, document)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET user_id = EXCLUDED.user_id,
                date = EXCLUDED.date,
                document = EXCLUDED.document
            "#,
        )
        .bind(order.id_typed().0.as_uuid())
        .bind(order.user_id().as_uuid())
        .bind(order.date())
        .bind(Json(order))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_order", e))?;

        Ok(())
    }

    async fn count_orders(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM orders")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_orders", e))?;

        let total: i64 = row
            .try_get("total")
            .map_err(|e| map_sqlx_error("count_orders", e))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn list_orders_with_customers(
        &self,
        page: PageRequest,
    ) -> Result<Vec<OrderListEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                o.document,
                c.id AS customer_id,
                c.name,
                c.email,
                c.mobile
            FROM orders o
            JOIN customers c ON c.id = o.user_id
            ORDER BY o.date DESC, o.id ASC
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(i64::try_from(page.skip()).unwrap_or(i64::MAX))
        .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_orders_with_customers", e))?;

        rows.iter()
            .map(|row| {
                Ok(OrderListEntry {
                    order: order_from_row(row)?,
                    customer: customer_from_row(row, "customer_id")?,
                })
            })
            .collect()
    }

    async fn find_order_detail(&self, id: OrderId) -> Result<Option<OrderDetail>, StoreError> {
        let Some(order) = self.find_order(id).await? else {
            return Ok(None);
        };

        let customer = self.find_customer(order.user_id()).await?;

        let product_ids = order
            .lines()
            .iter()
            .map(|l| *l.product_id.0.as_uuid())
            .collect();
        let products = self.find_products(product_ids).await?;

        let lines = order
            .lines()
            .iter()
            .map(|line| {
                let (product, offer) = match products.get(&line.product_id) {
                    Some((p, o)) => (Some(p.clone()), o.clone()),
                    None => (None, None),
                };
                DetailLine {
                    line: line.clone(),
                    product,
                    offer,
                }
            })
            .collect();

        Ok(Some(OrderDetail {
            order,
            customer,
            lines,
        }))
    }
}

fn order_from_row(row: &PgRow) -> Result<Order, StoreError> {
    let Json(order): Json<Order> = row.try_get("document").map_err(|e| StoreError::Corrupt {
        id: "orders.document".to_string(),
        message: e.to_string(),
    })?;
    Ok(order)
}

fn customer_from_row(row: &PgRow, id_column: &str) -> Result<Customer, StoreError> {
    let id: uuid::Uuid = row
        .try_get(id_column)
        .map_err(|e| map_sqlx_error("decode_customer", e))?;
    Ok(Customer {
        id: UserId::from_uuid(id),
        name: row
            .try_get("name")
            .map_err(|e| map_sqlx_error("decode_customer", e))?,
        email: row
            .try_get("email")
            .map_err(|e| map_sqlx_error("decode_customer", e))?,
        mobile: row
            .try_get("mobile")
            .map_err(|e| map_sqlx_error("decode_customer", e))?,
    })
}

fn product_from_row(row: &PgRow) -> Result<(CatalogProduct, Option<Offer>), StoreError> {
    let decode = |e| map_sqlx_error("decode_product", e);

    let id: uuid::Uuid = row.try_get("id").map_err(decode)?;
    let price: i64 = row.try_get("price").map_err(decode)?;
    let offer_id: Option<uuid::Uuid> = row.try_get("offer_id").map_err(decode)?;

    let product = CatalogProduct {
        id: ProductId::new(AggregateId::from_uuid(id)),
        name: row.try_get("name").map_err(decode)?,
        price: u64::try_from(price).map_err(|_| StoreError::Corrupt {
            id: id.to_string(),
            message: format!("negative product price {price}"),
        })?,
        offer_id: offer_id.map(|o| OfferId::new(AggregateId::from_uuid(o))),
    };

    let offer_name: Option<String> = row.try_get("offer_name").map_err(decode)?;
    let offer = match (offer_id, offer_name) {
        (Some(offer_id), Some(name)) => {
            let discount: i16 = row.try_get("discount_percent").map_err(decode)?;
            let expires_at: DateTime<Utc> = row.try_get("expires_at").map_err(decode)?;
            Some(Offer {
                id: OfferId::new(AggregateId::from_uuid(offer_id)),
                name,
                discount_percent: u8::try_from(discount).map_err(|_| StoreError::Corrupt {
                    id: offer_id.to_string(),
                    message: format!("discount out of range: {discount}"),
                })?,
                expires_at,
            })
        }
        _ => None,
    };

    Ok((product, offer))
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Database {
            operation,
            message: db_err.message().to_string(),
        },
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(format!("{operation}: {err}"))
        }
        other => StoreError::Database {
            operation,
            message: other.to_string(),
        },
    }
}
