//! # Redis
//!
//! Persistent store for the featured list and the category directory.
//!
//! ## Keys
//!
//! - `featured:entries`: hash of entry id to JSON entry, at most a handful of fields
//! - `featured:version`: integer bumped by every accepted commit
//! - `categories`: hash of category id to JSON category document
//!
//! ## Connection
//!
//! One [`Database`] is built at startup and shared. The connection manager is created on
//! first use and reused afterwards; it reconnects on its own, so callers never track
//! whether the database is "connected".
use std::time::Duration;

use redis::{
    Client, RedisError,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tokio::sync::OnceCell;
use tracing::info;

pub struct Database {
    url: String,
    connection: OnceCell<ConnectionManager>,
}

impl Database {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connection: OnceCell::new(),
        }
    }

    pub async fn connection(&self) -> Result<ConnectionManager, RedisError> {
        self.connection
            .get_or_try_init(|| init_redis(&self.url))
            .await
            .cloned()
    }
}

async fn init_redis(redis_url: &str) -> Result<ConnectionManager, RedisError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(500));

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    info!("Connected to Redis");

    Ok(connection_manager)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        let database = Database::new("redis://127.0.0.1:1");

        assert!(database.connection().await.is_err());
        // Failed attempts are not cached
        assert!(database.connection.get().is_none());
    }

    #[tokio::test]
    async fn test_invalid_url_is_an_error() {
        assert!(Database::new("not a url").connection().await.is_err());
    }
}
