use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CatalogService, SeaOrmAuthService, SeaOrmCatalogService, TokenKeys,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub catalog_service: Arc<dyn CatalogService>,

    pub auth_service: Arc<dyn AuthService>,
}

impl SharedState {
    /// Opens the configured database and wires the services onto it.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_url,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Self::with_store(config, store)
    }

    /// Wires services onto an already opened store.
    ///
    /// Fails when no JWT secret is configured.
    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let keys = TokenKeys::new(
            config.jwt_secret()?,
            config.security.token_lifetime_minutes,
        );

        let catalog_service =
            Arc::new(SeaOrmCatalogService::new(store.clone())) as Arc<dyn CatalogService>;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            keys,
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        Ok(Self {
            config: Arc::new(config),
            store,
            catalog_service,
            auth_service,
        })
    }
}
