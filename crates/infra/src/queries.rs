//! Read-side queries backing the admin listing and detail pages.

use orderdesk_core::PageRequest;
use orderdesk_orders::OrderId;

use crate::read_model::{OrderDetail, OrdersPage};
use crate::store::{OrderStore, StoreError};

/// Orders shown per listing page.
pub const ORDERS_PAGE_SIZE: u32 = 4;

#[derive(Debug, Clone)]
pub struct OrderQueries<S> {
    store: S,
}

impl<S: OrderStore> OrderQueries<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// One listing page. `raw_page` is the unvalidated `page` query value.
    ///
    /// `total_pages` is computed from the count of all orders, including those
    /// the customer join drops, so trailing pages may come back short or empty.
    #[tracing::instrument(skip(self), err)]
    pub async fn list_orders(&self, raw_page: Option<&str>) -> Result<OrdersPage, StoreError> {
        let page = PageRequest::from_query(raw_page, ORDERS_PAGE_SIZE);

        let total_orders = self.store.count_orders().await?;
        let entries = self.store.list_orders_with_customers(page).await?;

        Ok(OrdersPage {
            entries,
            total_orders,
            total_pages: page.total_pages(total_orders),
            current_page: page.page(),
        })
    }

    #[tracing::instrument(skip_all, fields(order_id = %id), err)]
    pub async fn order_detail(&self, id: OrderId) -> Result<Option<OrderDetail>, StoreError> {
        self.store.find_order_detail(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone, Utc};
    use orderdesk_core::UserId;
    use orderdesk_orders::{Customer, Order, ProductId, ProductLine};

    use crate::store::InMemoryOrderStore;

    async fn seeded(orders: i64) -> OrderQueries<InMemoryOrderStore> {
        let store = InMemoryOrderStore::new();
        let customer = Customer {
            id: UserId::new(),
            name: "Dana".to_string(),
            email: "dana@example.com".to_string(),
            mobile: Some("555-0101".to_string()),
        };
        store.insert_customer(customer.clone()).unwrap();

        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        for i in 0..orders {
            let order = Order::new(
                OrderId::generate(),
                customer.id,
                start + Duration::hours(i),
                vec![ProductLine::placed(ProductId::generate(), 1, 250)],
            )
            .unwrap();
            store.save_order(&order).await.unwrap();
        }

        OrderQueries::new(store)
    }

    #[tokio::test]
    async fn ten_orders_split_into_three_pages() {
        let queries = seeded(10).await;

        let first = queries.list_orders(None).await.unwrap();
        let second = queries.list_orders(Some("2")).await.unwrap();
        let third = queries.list_orders(Some("3")).await.unwrap();

        assert_eq!(first.total_pages, 3);
        assert_eq!(first.current_page, 1);
        assert_eq!(first.entries.len(), 4);
        assert_eq!(second.entries.len(), 4);
        assert_eq!(third.entries.len(), 2);
        assert_eq!(third.current_page, 3);
    }

    #[tokio::test]
    async fn junk_page_values_fall_back_to_first_page() {
        let queries = seeded(5).await;

        for raw in [Some("abc"), Some("0"), Some("-2"), Some("")] {
            let page = queries.list_orders(raw).await.unwrap();
            assert_eq!(page.current_page, 1, "raw page {raw:?}");
            assert_eq!(page.entries.len(), 4);
        }
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let queries = seeded(3).await;

        let page = queries.list_orders(Some("7")).await.unwrap();
        assert!(page.entries.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 7);
    }

    #[tokio::test]
    async fn empty_store_has_zero_pages() {
        let queries = seeded(0).await;

        let page = queries.list_orders(None).await.unwrap();
        assert_eq!(page.total_orders, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[tokio::test]
    async fn detail_of_missing_order_is_none() {
        let queries = seeded(1).await;
        assert!(queries.order_detail(OrderId::generate()).await.unwrap().is_none());
    }
}
