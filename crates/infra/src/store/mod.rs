//! Order document storage.
//!
//! Orders are persisted as whole documents: a status change loads the order,
//! mutates one line in memory, and writes the entire document back. There is no
//! version check on save, so concurrent writers to the same order are
//! last-writer-wins.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use thiserror::Error;

use orderdesk_core::PageRequest;
use orderdesk_orders::{Order, OrderId};

use crate::read_model::{OrderDetail, OrderListEntry};

pub use in_memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;

/// Order store operation error.
///
/// These are **infrastructure errors** as opposed to domain rejections.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    #[error("corrupt record {id}: {message}")]
    Corrupt { id: String, message: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Async access to orders and the reference data joined into admin views.
#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    /// Load one order document.
    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Insert or replace the whole order document.
    async fn save_order(&self, order: &Order) -> Result<(), StoreError>;

    /// Number of stored orders, regardless of whether their customer exists.
    async fn count_orders(&self) -> Result<u64, StoreError>;

    /// One page of orders joined with their customer, newest first.
    ///
    /// Orders whose customer record is missing are dropped by the join.
    async fn list_orders_with_customers(
        &self,
        page: PageRequest,
    ) -> Result<Vec<OrderListEntry>, StoreError>;

    /// Order with customer, catalog products and offers expanded.
    async fn find_order_detail(&self, id: OrderId) -> Result<Option<OrderDetail>, StoreError>;
}

#[async_trait::async_trait]
impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        (**self).find_order(id).await
    }

    async fn save_order(&self, order: &Order) -> Result<(), StoreError> {
        (**self).save_order(order).await
    }

    async fn count_orders(&self) -> Result<u64, StoreError> {
        (**self).count_orders().await
    }

    async fn list_orders_with_customers(
        &self,
        page: PageRequest,
    ) -> Result<Vec<OrderListEntry>, StoreError> {
        (**self).list_orders_with_customers(page).await
    }

    async fn find_order_detail(&self, id: OrderId) -> Result<Option<OrderDetail>, StoreError> {
        (**self).find_order_detail(id).await
    }
}
