//! View rendering.
//!
//! Handlers build a serializable context and hand it to a [`ViewRenderer`]
//! together with a view name. Template authoring lives outside this crate; the
//! built-in [`JsonViewRenderer`] emits the view model itself.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

pub const ORDERS_VIEW: &str = "admin/orders";
pub const ORDER_DETAILS_VIEW: &str = "admin/orderDetails";
pub const ERROR_VIEW: &str = "admin/404error";

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("failed to build context for view {view}: {source}")]
    Context {
        view: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to render view {view}: {message}")]
    Render { view: String, message: String },
}

/// A rendered page ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub content_type: &'static str,
    pub body: String,
}

impl RenderedView {
    pub fn into_http(self, status: StatusCode) -> Response {
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, context: &Value) -> Result<RenderedView, ViewError>;
}

/// Renders `{"view": <name>, "context": {...}}` as `application/json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonViewRenderer;

impl ViewRenderer for JsonViewRenderer {
    fn render(&self, view: &str, context: &Value) -> Result<RenderedView, ViewError> {
        let body = serde_json::to_string(&json!({
            "view": view,
            "context": context,
        }))
        .map_err(|source| ViewError::Context {
            view: view.to_string(),
            source,
        })?;

        Ok(RenderedView {
            content_type: "application/json",
            body,
        })
    }
}

/// Serialize `context` and render it as `view` with status 200.
pub fn render_page(
    renderer: &dyn ViewRenderer,
    view: &str,
    context: &impl Serialize,
) -> Result<Response, ViewError> {
    let context = serde_json::to_value(context).map_err(|source| ViewError::Context {
        view: view.to_string(),
        source,
    })?;
    Ok(renderer.render(view, &context)?.into_http(StatusCode::OK))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_renderer_wraps_view_and_context() {
        let rendered = JsonViewRenderer
            .render(ORDERS_VIEW, &json!({ "currentPage": 2 }))
            .unwrap();

        assert_eq!(rendered.content_type, "application/json");
        let body: Value = serde_json::from_str(&rendered.body).unwrap();
        assert_eq!(body, json!({ "view": "admin/orders", "context": { "currentPage": 2 } }));
    }

    #[test]
    fn rendered_view_keeps_status_and_content_type() {
        let response = RenderedView {
            content_type: "text/html",
            body: "<p>gone</p>".to_string(),
        }
        .into_http(StatusCode::NOT_FOUND);

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
    }
}
