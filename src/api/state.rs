use std::sync::Arc;

use crate::catalog::{CatalogApi, CatalogClient};
use crate::chat::ChatTransport;
use crate::config::Config;
use crate::observability::Metrics;
use crate::router::InteractionRouter;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<CatalogClient>,
    pub router: Arc<InteractionRouter>,
    pub transport: Arc<dyn ChatTransport>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog_api: Arc<dyn CatalogApi>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        let catalog = Arc::new(CatalogClient::new(
            catalog_api,
            config.catalog.account_id.clone(),
            config.catalog.playlist_name.clone(),
        ));
        let router = Arc::new(InteractionRouter::new(
            Arc::clone(&catalog),
            config.search.default_page_size,
        ));

        Self {
            config: Arc::new(config),
            catalog,
            router,
            transport,
            metrics: Arc::new(Metrics::new()),
        }
    }
}
