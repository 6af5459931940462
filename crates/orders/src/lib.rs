//! Orders domain module.
//!
//! Business rules for order product lines and their fulfillment status,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod ids;
pub mod order;
pub mod reference;
pub mod rejection;
pub mod status;

pub use ids::{LineId, OfferId, OrderId, ProductId};
pub use order::{LineStatusChanged, Order, OrderCommand, OrderEvent, ProductLine, StatusCommand};
pub use reference::{CatalogProduct, Customer, Offer};
pub use rejection::{Rejection, RejectionReason};
pub use status::{LineStatus, StatusAction, TransitionPolicy, transition};
