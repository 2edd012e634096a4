use std::sync::Arc;

use catalog_db::store::CatalogStore;

use crate::config::ServerConfig;
use crate::service::CatalogService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Catalog business logic over the configured store.
    pub catalog: CatalogService,
    /// Server configuration (page size defaults, limits).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>, config: ServerConfig) -> Self {
        Self {
            catalog: CatalogService::new(store),
            config: Arc::new(config),
        }
    }
}
