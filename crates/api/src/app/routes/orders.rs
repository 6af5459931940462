use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Extension, Path, Query, rejection::QueryRejection},
    response::Response,
    routing::{get, post},
};
use chrono::Utc;

use orderdesk_orders::{OrderId, StatusAction};

use crate::app::dto::{
    ListOrdersQuery, OrderDetailsQuery, OrderDetailsViewContext, OrdersViewContext,
    StatusChangeRequest, outcome_response,
};
use crate::app::errors::{AdminError, error_view};
use crate::app::services::AppServices;
use crate::app::views::{ORDER_DETAILS_VIEW, ORDERS_VIEW, render_page};

pub fn router() -> Router {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/order-details", get(order_details))
        .route("/orders/return-approval", post(approve_return))
        .route("/orders/:order_id/shipped", post(mark_shipped))
        .route("/orders/:order_id/delivered", post(mark_delivered))
        .route("/orders/:order_id/cancelled", post(mark_cancelled))
}

fn parse_order_id(raw: Option<&str>) -> Result<OrderId, AdminError> {
    raw.and_then(|s| s.parse().ok())
        .ok_or_else(|| AdminError::InvalidOrderId(raw.map(str::to_string)))
}

fn query_or_error<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AdminError> {
    query
        .map(|Query(q)| q)
        .map_err(|rejection| AdminError::InvalidQuery(rejection.body_text()))
}

fn respond(services: &AppServices, result: Result<Response, AdminError>) -> Response {
    result.unwrap_or_else(|err| error_view(services.views.as_ref(), err))
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<ListOrdersQuery>, QueryRejection>,
) -> Response {
    let result = async {
        let query = query_or_error(query)?;
        let page = services.queries.list_orders(query.page.as_deref()).await?;
        let context = OrdersViewContext::from(page);
        Ok::<_, AdminError>(render_page(services.views.as_ref(), ORDERS_VIEW, &context)?)
    }
    .await;

    respond(&services, result)
}

pub async fn order_details(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<OrderDetailsQuery>, QueryRejection>,
) -> Response {
    let result = async {
        let query = query_or_error(query)?;
        let order_id = parse_order_id(query.order_id.as_deref())?;
        let detail = services
            .queries
            .order_detail(order_id)
            .await?
            .ok_or(AdminError::OrderNotFound(order_id))?;

        let context = OrderDetailsViewContext::new(detail, Utc::now());
        Ok::<_, AdminError>(render_page(services.views.as_ref(), ORDER_DETAILS_VIEW, &context)?)
    }
    .await;

    respond(&services, result)
}

async fn change_status(
    services: &AppServices,
    order_id: Option<&str>,
    request: &StatusChangeRequest,
    action: StatusAction,
) -> Result<Response, AdminError> {
    let order_id = parse_order_id(order_id)?;
    let outcome = services
        .status
        .execute(order_id, request.line_id(), action)
        .await?;
    Ok(outcome_response(&outcome))
}

pub async fn mark_shipped(
    Extension(services): Extension<Arc<AppServices>>,
    Path(order_id): Path<String>,
    body: Bytes,
) -> Response {
    let request = StatusChangeRequest::from_body(&body);
    let result = change_status(&services, Some(order_id.as_str()), &request, StatusAction::Ship).await;
    respond(&services, result)
}

pub async fn mark_delivered(
    Extension(services): Extension<Arc<AppServices>>,
    Path(order_id): Path<String>,
    body: Bytes,
) -> Response {
    let request = StatusChangeRequest::from_body(&body);
    let result = change_status(&services, Some(order_id.as_str()), &request, StatusAction::Deliver).await;
    respond(&services, result)
}

pub async fn mark_cancelled(
    Extension(services): Extension<Arc<AppServices>>,
    Path(order_id): Path<String>,
    body: Bytes,
) -> Response {
    let request = StatusChangeRequest::from_body(&body);
    let result = change_status(&services, Some(order_id.as_str()), &request, StatusAction::Cancel).await;
    respond(&services, result)
}

/// Return approval carries both ids in the body.
pub async fn approve_return(
    Extension(services): Extension<Arc<AppServices>>,
    body: Bytes,
) -> Response {
    let request = StatusChangeRequest::from_body(&body);
    let result = change_status(
        &services,
        request.order_id.as_deref(),
        &request,
        StatusAction::ApproveReturn,
    )
    .await;
    respond(&services, result)
}
