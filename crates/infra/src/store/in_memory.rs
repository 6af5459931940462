use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use orderdesk_core::{PageRequest, UserId};
use orderdesk_orders::{CatalogProduct, Customer, Offer, OfferId, Order, OrderId, ProductId};

use super::{OrderStore, StoreError};
use crate::read_model::{DetailLine, OrderDetail, OrderListEntry};

#[derive(Debug, Default)]
struct Documents {
    orders: HashMap<OrderId, Order>,
    customers: HashMap<UserId, Customer>,
    products: HashMap<ProductId, CatalogProduct>,
    offers: HashMap<OfferId, Offer>,
}

/// In-memory order store.
///
/// Intended for tests/dev. Reference data (customers, catalog, offers) is
/// seeded through the `insert_*` helpers; orders go through `save_order`.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    docs: RwLock<Documents>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Documents>, StoreError> {
        self.docs
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Documents>, StoreError> {
        self.docs
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    pub fn insert_customer(&self, customer: Customer) -> Result<(), StoreError> {
        self.write()?.customers.insert(customer.id, customer);
        Ok(())
    }

    pub fn insert_product(&self, product: CatalogProduct) -> Result<(), StoreError> {
        self.write()?.products.insert(product.id, product);
        Ok(())
    }

    pub fn insert_offer(&self, offer: Offer) -> Result<(), StoreError> {
        self.write()?.offers.insert(offer.id, offer);
        Ok(())
    }
}

#[async_trait::async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.read()?.orders.get(&id).cloned())
    }

    async fn save_order(&self, order: &Order) -> Result<(), StoreError> {
        self.write()?
            .orders
            .insert(order.id_typed(), order.clone());
        Ok(())
    }

    async fn count_orders(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.orders.len() as u64)
    }

    async fn list_orders_with_customers(
        &self,
        page: PageRequest,
    ) -> Result<Vec<OrderListEntry>, StoreError> {
        let docs = self.read()?;

        let mut joined: Vec<OrderListEntry> = docs
            .orders
            .values()
            .filter_map(|order| {
                docs.customers.get(&order.user_id()).map(|customer| OrderListEntry {
                    order: order.clone(),
                    customer: customer.clone(),
                })
            })
            .collect();

        // Newest first; id breaks ties so paging is stable.
        joined.sort_by(|a, b| {
            b.order
                .date()
                .cmp(&a.order.date())
                .then_with(|| a.order.id_typed().0.as_uuid().cmp(b.order.id_typed().0.as_uuid()))
        });

        let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(joined.into_iter().skip(skip).take(limit).collect())
    }

    async fn find_order_detail(&self, id: OrderId) -> Result<Option<OrderDetail>, StoreError> {
        let docs = self.read()?;

        let Some(order) = docs.orders.get(&id) else {
            return Ok(None);
        };

        let lines = order
            .lines()
            .iter()
            .map(|line| {
                let product = docs.products.get(&line.product_id).cloned();
                let offer = product
                    .as_ref()
                    .and_then(|p| p.offer_id)
                    .and_then(|offer_id| docs.offers.get(&offer_id).cloned());
                DetailLine {
                    line: line.clone(),
                    product,
                    offer,
                }
            })
            .collect();

        Ok(Some(OrderDetail {
            order: order.clone(),
            customer: docs.customers.get(&order.user_id()).cloned(),
            lines,
        }))
    }
}
