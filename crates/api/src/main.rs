use std::sync::Arc;

use anyhow::Context;

use orderdesk_api::app::{build_app, services};
use orderdesk_infra::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    orderdesk_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = services::build_services(&config)
        .await
        .context("failed to initialize order store")?;

    let app = build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        policy = ?config.transition_policy,
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
