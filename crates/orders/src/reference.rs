//! Read-only reference data joined into order views.
//!
//! These records are owned by other parts of the platform (accounts, catalog,
//! promotions). Orders only point at them by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::UserId;

use crate::ids::{OfferId, ProductId};

/// Customer identity shown next to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
}

/// Catalog product referenced by a product line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub offer_id: Option<OfferId>,
}

/// Promotional offer attached to a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub name: String,
    pub discount_percent: u8,
    pub expires_at: DateTime<Utc>,
}

impl Offer {
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        at < self.expires_at
    }
}
