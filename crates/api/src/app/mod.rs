//! HTTP application wiring (Axum router + services).
//!
//! - `services.rs`: store, query and status-manager wiring
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request bodies, JSON responses and view contexts
//! - `views.rs`: view rendering
//! - `errors.rs`: the generic error view

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;
pub mod views;

use services::AppServices;

/// Build the full HTTP router (used by `main.rs` and the black-box tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/admin", routes::router())
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
