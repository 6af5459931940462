use axum::Router;

pub mod orders;
pub mod system;

/// Router for the admin panel endpoints (nested under `/admin`).
pub fn router() -> Router {
    orders::router()
}
