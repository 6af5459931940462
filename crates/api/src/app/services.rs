use std::sync::Arc;

use orderdesk_infra::config::{AppConfig, StoreBackend};
use orderdesk_infra::queries::OrderQueries;
use orderdesk_infra::status_manager::OrderStatusManager;
use orderdesk_infra::store::{OrderStore, PostgresOrderStore, StoreError};
use orderdesk_orders::TransitionPolicy;

use crate::app::views::{JsonViewRenderer, ViewRenderer};

pub type DynOrderStore = Arc<dyn OrderStore>;

/// Everything the handlers need, shared behind an `Arc` extension.
#[derive(Clone)]
pub struct AppServices {
    pub queries: OrderQueries<DynOrderStore>,
    pub status: OrderStatusManager<DynOrderStore>,
    pub views: Arc<dyn ViewRenderer>,
}

impl AppServices {
    pub fn new(store: DynOrderStore, policy: TransitionPolicy, views: Arc<dyn ViewRenderer>) -> Self {
        Self {
            queries: OrderQueries::new(store.clone()),
            status: OrderStatusManager::new(store, policy),
            views,
        }
    }

    /// Services over `store` with the JSON view renderer.
    pub fn with_store(store: DynOrderStore, policy: TransitionPolicy) -> Self {
        Self::new(store, policy, Arc::new(JsonViewRenderer))
    }
}

pub async fn build_services(config: &AppConfig) -> Result<AppServices, StoreError> {
    let store: DynOrderStore = match &config.store {
        StoreBackend::InMemory => {
            tracing::warn!("USE_PERSISTENT_STORES is off; orders are kept in memory only");
            Arc::new(orderdesk_infra::store::InMemoryOrderStore::new())
        }
        StoreBackend::Postgres { database_url } => {
            let store = PostgresOrderStore::connect(database_url).await?;
            tracing::info!("connected to postgres order store");
            Arc::new(store)
        }
    };

    Ok(AppServices::with_store(store, config.transition_policy))
}
