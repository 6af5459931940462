//! Infrastructure layer: order storage, configuration, and the application
//! services that sit between HTTP handlers and the domain.

pub mod config;
pub mod queries;
pub mod read_model;
pub mod status_manager;
pub mod store;
