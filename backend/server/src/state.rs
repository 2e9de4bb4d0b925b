use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::{
    config::{Config, StoreBackend},
    database::Database,
    featured::FeaturedService,
    store::{
        CategoryDirectory, FeaturedStore,
        memory::{MemoryDirectory, MemoryStore},
        remote::RedisStore,
    },
};

pub struct State {
    pub config: Config,
    pub featured: FeaturedService,
}

impl State {
    pub async fn new() -> Result<Arc<Self>> {
        let config = Config::load()?;

        let (store, directory): (Arc<dyn FeaturedStore>, Arc<dyn CategoryDirectory>) = match config.store {
            StoreBackend::Redis => {
                let database = Database::new(&config.redis_url);
                database
                    .connection()
                    .await
                    .with_context(|| format!("Failed to connect to {}", config.redis_url))?;

                let redis = Arc::new(RedisStore::new(database));
                (redis.clone(), redis)
            }
            StoreBackend::Memory => {
                warn!("Using in-memory store, featured categories are lost on restart");
                (Arc::new(MemoryStore::new()), Arc::new(MemoryDirectory::new()))
            }
        };

        if config.admin_token.is_none() {
            warn!("ADMIN_TOKEN not configured, mutating routes are unguarded");
        }

        info!("Featured list capped at {}", config.max_featured);

        Ok(Self::with_stores(config, store, directory))
    }

    pub fn with_stores(
        config: Config,
        store: Arc<dyn FeaturedStore>,
        directory: Arc<dyn CategoryDirectory>,
    ) -> Arc<Self> {
        let featured = FeaturedService::new(
            store,
            directory,
            config.max_featured,
            config.storage_bucket.clone(),
        );

        Arc::new(Self { config, featured })
    }
}
