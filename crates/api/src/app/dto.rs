use axum::Json;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use orderdesk_infra::read_model::{DetailLine, OrderDetail, OrderListEntry, OrdersPage};
use orderdesk_infra::status_manager::TransitionOutcome;
use orderdesk_orders::{CatalogProduct, Customer, LineId, LineStatus, Offer, Order, ProductLine};

/// Display format of the order date on the detail page (`MM DD YYYY HH:mm:ss`).
pub const DISPLAY_DATE_FORMAT: &str = "%m %d %Y %H:%M:%S";

pub fn format_display_date(date: DateTime<Utc>) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

// -------------------------
// Request DTOs
// -------------------------

/// Body of the status-change routes: `{"productId": .., "orderId": ..}`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusChangeRequest {
    pub product_id: Option<String>,
    pub order_id: Option<String>,
}

impl StatusChangeRequest {
    /// Parse a JSON request body field by field.
    ///
    /// Only string values are kept; a field of any other type, a malformed
    /// body or an empty one carries no id for that field.
    pub fn from_body(body: &[u8]) -> Self {
        let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);

        Self {
            product_id: field("productId"),
            order_id: field("orderId"),
        }
    }

    /// The referenced product line, if the submitted value is a valid id.
    pub fn line_id(&self) -> Option<LineId> {
        self.product_id.as_deref().and_then(|raw| raw.parse().ok())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailsQuery {
    pub order_id: Option<String>,
}

// -------------------------
// Responses
// -------------------------

/// `{"message": ..}` for applied changes, `{"error": ..}` for rejections; both 200.
pub fn outcome_response(outcome: &TransitionOutcome) -> Response {
    match outcome {
        TransitionOutcome::Applied(_) => Json(json!({ "message": outcome.message() })),
        TransitionOutcome::Rejected(_) => Json(json!({ "error": outcome.message() })),
    }
    .into_response()
}

// -------------------------
// View contexts
// -------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersViewContext {
    pub orders: Vec<OrderSummary>,
    pub total_pages: u64,
    pub current_page: u32,
}

impl From<OrdersPage> for OrdersViewContext {
    fn from(page: OrdersPage) -> Self {
        Self {
            orders: page.entries.into_iter().map(OrderSummary::from).collect(),
            total_pages: page.total_pages,
            current_page: page.current_page,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: String,
    pub date: DateTime<Utc>,
    pub total_amount: u64,
    pub user: CustomerView,
    pub products: Vec<LineView>,
}

impl From<OrderListEntry> for OrderSummary {
    fn from(entry: OrderListEntry) -> Self {
        Self {
            id: entry.order.id_typed().to_string(),
            date: entry.order.date(),
            total_amount: entry.order.total_amount(),
            user: CustomerView::from(entry.customer),
            products: lines(&entry.order),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
}

impl From<Customer> for CustomerView {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name,
            email: c.email,
            mobile: c.mobile,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineView {
    pub id: String,
    pub product_id: String,
    pub status: LineStatus,
    pub quantity: u32,
    pub price: u64,
}

impl From<&ProductLine> for LineView {
    fn from(line: &ProductLine) -> Self {
        Self {
            id: line.id.to_string(),
            product_id: line.product_id.to_string(),
            status: line.status,
            quantity: line.quantity,
            price: line.price,
        }
    }
}

fn lines(order: &Order) -> Vec<LineView> {
    order.lines().iter().map(LineView::from).collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailsViewContext {
    pub order: OrderDetailView,
    /// Order date in the display format.
    pub date: String,
}

impl OrderDetailsViewContext {
    /// Build the detail page context; `now` decides which offers are still active.
    pub fn new(detail: OrderDetail, now: DateTime<Utc>) -> Self {
        let date = format_display_date(detail.order.date());
        Self {
            order: OrderDetailView::new(detail, now),
            date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailView {
    pub id: String,
    pub date: DateTime<Utc>,
    pub total_amount: u64,
    pub user: Option<CustomerView>,
    pub products: Vec<DetailLineView>,
}

impl OrderDetailView {
    fn new(detail: OrderDetail, now: DateTime<Utc>) -> Self {
        Self {
            id: detail.order.id_typed().to_string(),
            date: detail.order.date(),
            total_amount: detail.order.total_amount(),
            user: detail.customer.map(CustomerView::from),
            products: detail
                .lines
                .into_iter()
                .map(|line| DetailLineView::new(line, now))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailLineView {
    #[serde(flatten)]
    pub line: LineView,
    pub product: Option<ProductView>,
    pub offer: Option<OfferView>,
}

impl DetailLineView {
    fn new(detail: DetailLine, now: DateTime<Utc>) -> Self {
        Self {
            line: LineView::from(&detail.line),
            product: detail.product.map(ProductView::from),
            offer: detail.offer.map(|o| OfferView::new(o, now)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: u64,
}

impl From<CatalogProduct> for ProductView {
    fn from(p: CatalogProduct) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name,
            price: p.price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferView {
    pub id: String,
    pub name: String,
    pub discount_percent: u8,
    pub expires_at: DateTime<Utc>,
    pub active: bool,
}

impl OfferView {
    fn new(offer: Offer, now: DateTime<Utc>) -> Self {
        let active = offer.is_active_at(now);
        Self {
            id: offer.id.to_string(),
            name: offer.name,
            discount_percent: offer.discount_percent,
            expires_at: offer.expires_at,
            active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use orderdesk_core::UserId;
    use orderdesk_orders::{OfferId, OrderId, ProductId};

    #[test]
    fn display_date_is_month_day_year_time() {
        let date = Utc.with_ymd_and_hms(2024, 2, 7, 5, 4, 3).unwrap();
        assert_eq!(format_display_date(date), "02 07 2024 05:04:03");
    }

    #[test]
    fn request_body_accepts_camel_case_ids() {
        let line_id = LineId::generate();
        let body = format!(r#"{{"productId":"{line_id}","orderId":"abc"}}"#);

        let req = StatusChangeRequest::from_body(body.as_bytes());
        assert_eq!(req.line_id(), Some(line_id));
        assert_eq!(req.order_id.as_deref(), Some("abc"));
    }

    #[test]
    fn mistyped_field_does_not_discard_its_sibling() {
        let order_id = OrderId::generate();
        let body = format!(r#"{{"orderId":"{order_id}","productId":42}}"#);

        let req = StatusChangeRequest::from_body(body.as_bytes());
        assert_eq!(req.order_id, Some(order_id.to_string()));
        assert_eq!(req.product_id, None);
        assert_eq!(req.line_id(), None);
    }

    #[test]
    fn malformed_body_or_product_id_yields_no_line() {
        assert_eq!(StatusChangeRequest::from_body(b"").line_id(), None);
        assert_eq!(StatusChangeRequest::from_body(b"not json").line_id(), None);
        assert_eq!(
            StatusChangeRequest::from_body(br#"{"productId":"42"}"#).line_id(),
            None
        );
    }

    #[test]
    fn detail_context_marks_expired_offers() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let expired = Offer {
            id: OfferId::generate(),
            name: "Winter".to_string(),
            discount_percent: 10,
            expires_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
        };
        let product = CatalogProduct {
            id: ProductId::generate(),
            name: "Scarf".to_string(),
            price: 1_200,
            offer_id: Some(expired.id),
        };
        let line = ProductLine::placed(product.id, 3, 1_200);
        let order = Order::new(
            OrderId::generate(),
            UserId::new(),
            Utc.with_ymd_and_hms(2025, 5, 30, 18, 30, 0).unwrap(),
            vec![line.clone()],
        )
        .unwrap();

        let ctx = OrderDetailsViewContext::new(
            OrderDetail {
                order,
                customer: None,
                lines: vec![DetailLine {
                    line,
                    product: Some(product),
                    offer: Some(expired),
                }],
            },
            now,
        );

        assert_eq!(ctx.date, "05 30 2025 18:30:00");
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["order"]["totalAmount"], 3_600);
        assert_eq!(json["order"]["user"], serde_json::Value::Null);
        assert_eq!(json["order"]["products"][0]["status"], "Order Placed");
        assert_eq!(json["order"]["products"][0]["product"]["name"], "Scarf");
        assert_eq!(json["order"]["products"][0]["offer"]["active"], false);
    }
}
