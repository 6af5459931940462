use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use orderdesk_infra::store::StoreError;
use orderdesk_orders::OrderId;

use crate::app::views::{ERROR_VIEW, ViewError, ViewRenderer};

/// Infrastructure-tier failure of an admin request.
///
/// Always answered with the generic error view; the details only go to the log.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("malformed query string: {0}")]
    InvalidQuery(String),

    #[error("missing or invalid order id {0:?}")]
    InvalidOrderId(Option<String>),

    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    View(#[from] ViewError),
}

impl AdminError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdminError::InvalidQuery(_)
            | AdminError::InvalidOrderId(_)
            | AdminError::OrderNotFound(_) => StatusCode::NOT_FOUND,
            AdminError::Store(_) | AdminError::View(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Render the generic error view for `err`.
pub fn error_view(renderer: &dyn ViewRenderer, err: AdminError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!(error = %err, "admin request failed");
    } else {
        tracing::debug!(error = %err, "admin request failed");
    }

    match renderer.render(ERROR_VIEW, &json!({})) {
        Ok(view) => view.into_http(status),
        Err(render_err) => {
            tracing::error!(error = %render_err, "failed to render error view");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
