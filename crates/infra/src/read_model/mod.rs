//! Denormalized views of orders joined with their reference data.

use serde::Serialize;

use orderdesk_orders::{CatalogProduct, Customer, Offer, Order, ProductLine};

/// One row of the admin order list: the order plus its owning customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderListEntry {
    pub order: Order,
    pub customer: Customer,
}

/// A product line with its catalog product and that product's offer expanded.
///
/// Either reference may be missing if the catalog record was removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailLine {
    pub line: ProductLine,
    pub product: Option<CatalogProduct>,
    pub offer: Option<Offer>,
}

/// Fully expanded order for the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetail {
    pub order: Order,
    pub customer: Option<Customer>,
    pub lines: Vec<DetailLine>,
}

/// A page of the order list plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrdersPage {
    pub entries: Vec<OrderListEntry>,
    pub total_orders: u64,
    pub total_pages: u64,
    pub current_page: u32,
}
