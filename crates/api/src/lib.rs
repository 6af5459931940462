//! HTTP API: admin order routes, view rendering, and service wiring.

pub mod app;
