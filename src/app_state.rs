use std::sync::Arc;

use crate::{
    config::Config,
    error::AppResult,
    graph_interface::GraphInterface,
    infrastructure::{
        database::EntityStore, middleware::HasSecurityService, security::SecurityConfig,
        security::SecurityService, sqlite_database::SqliteDatabase,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub security: Arc<SecurityService>,
    pub graph: GraphInterface,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let database = SqliteDatabase::connect(
            &config.database.url,
            config.database.max_connections,
            config.node_id,
        )
        .await?;

        Ok(Self::with_store(Arc::new(database), config))
    }

    /// Wire the services over an already-open store
    pub fn with_store(store: Arc<dyn EntityStore>, config: Config) -> Self {
        let security = Arc::new(SecurityService::new(SecurityConfig::from(&config.auth)));
        let graph = GraphInterface::new(store.clone(), security.clone());

        Self {
            store,
            security,
            graph,
            config,
        }
    }
}

impl HasSecurityService for AppState {
    fn security(&self) -> &Arc<SecurityService> {
        &self.security
    }
}
