use std::{env, fmt::Display, fs::read_to_string, path::Path, str::FromStr};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

const SECRETS_DIR: &str = "/run/secrets";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store: StoreBackend,
    pub redis_url: String,
    pub storage_bucket: Option<String>,
    pub max_featured: usize,
    pub admin_token: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), |name| read_secret(Path::new(SECRETS_DIR), name))
    }

    pub fn from_lookup(
        var: impl Fn(&str) -> Option<String>,
        secret: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let config = Self {
            port: try_load(&var, "RUST_PORT", "1111")?,
            store: try_load(&var, "FEATURED_STORE", "redis")?,
            redis_url: try_load(&var, "REDIS_URL", "redis://redis:6379")?,
            storage_bucket: var("FIREBASE_STORAGE_BUCKET").filter(|bucket| !bucket.is_empty()),
            max_featured: try_load(&var, "MAX_FEATURED", "8")?,
            admin_token: secret("ADMIN_TOKEN"),
        };

        if config.max_featured == 0 {
            bail!("MAX_FEATURED must be at least 1");
        }

        if config.storage_bucket.is_none() {
            warn!("FIREBASE_STORAGE_BUCKET not set, image paths stay relative");
        }

        Ok(config)
    }
}

fn try_load<T: FromStr>(var: impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw:?}"))
}

fn read_secret(dir: &Path, secret_name: &str) -> Option<String> {
    let path = dir.join(secret_name);

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .ok()
        .filter(|secret| !secret.is_empty())
}
