use std::collections::HashMap;

use async_trait::async_trait;
use redis::{AsyncCommands, Script, aio::ConnectionManager};
use serde::de::DeserializeOwned;

use super::{CategoryDirectory, Commit, FeaturedStore, Snapshot};
use crate::{
    database::Database,
    error::StoreError,
    models::{Category, FeaturedEntry},
    ordering::{Change, Plan},
};

pub const ENTRIES_KEY: &str = "featured:entries";
pub const VERSION_KEY: &str = "featured:version";
pub const CATEGORIES_KEY: &str = "categories";

// KEYS: version, entries. ARGV: expected version, then `put id json` / `del id` runs.
const COMMIT_SCRIPT: &str = r#"
local current = tonumber(redis.call('GET', KEYS[1]) or '0')
if current ~= tonumber(ARGV[1]) then
    return 0
end

local i = 2
while i <= #ARGV do
    if ARGV[i] == 'put' then
        redis.call('HSET', KEYS[2], ARGV[i + 1], ARGV[i + 2])
        i = i + 3
    else
        redis.call('HDEL', KEYS[2], ARGV[i + 1])
        i = i + 2
    end
end

redis.call('INCR', KEYS[1])
return 1
"#;

pub struct RedisStore {
    database: Database,
    commit_script: Script,
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })
}

fn encode<T: serde::Serialize>(key: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })
}

impl RedisStore {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            commit_script: Script::new(COMMIT_SCRIPT),
        }
    }

    async fn connection(&self) -> Result<ConnectionManager, StoreError> {
        Ok(self.database.connection().await?)
    }

    /// Writes a category document into the directory. Used by the seed tool.
    pub async fn upsert_category(&self, category: &Category) -> Result<(), StoreError> {
        let mut connection = self.connection().await?;
        let payload = encode(&category.id, category)?;

        let _: () = connection
            .hset(CATEGORIES_KEY, &category.id, payload)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl FeaturedStore for RedisStore {
    async fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let mut connection = self.connection().await?;

        let (version, raw): (Option<u64>, HashMap<String, String>) = redis::pipe()
            .atomic()
            .get(VERSION_KEY)
            .hgetall(ENTRIES_KEY)
            .query_async(&mut connection)
            .await?;

        let mut entries = raw
            .iter()
            .map(|(id, json)| decode::<FeaturedEntry>(id, json))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(|e| e.position);

        Ok(Snapshot {
            version: version.unwrap_or(0),
            entries,
        })
    }

    async fn commit(&self, version: u64, plan: &Plan) -> Result<Commit, StoreError> {
        let mut connection = self.connection().await?;

        let mut invocation = self.commit_script.key(VERSION_KEY);
        invocation.key(ENTRIES_KEY).arg(version);

        for change in &plan.changes {
            match change {
                Change::Put(entry) => {
                    invocation
                        .arg("put")
                        .arg(&entry.id)
                        .arg(encode(&entry.id, entry)?);
                }
                Change::Remove(id) => {
                    invocation.arg("del").arg(id);
                }
            }
        }

        let applied: i64 = invocation.invoke_async(&mut connection).await?;

        Ok(match applied {
            1 => Commit::Applied,
            _ => Commit::Conflict,
        })
    }
}

#[async_trait]
impl CategoryDirectory for RedisStore {
    async fn get(&self, id: &str) -> Result<Option<Category>, StoreError> {
        let mut connection = self.connection().await?;
        let raw: Option<String> = connection.hget(CATEGORIES_KEY, id).await?;

        raw.map(|json| -> Result<Category, StoreError> {
            let mut category: Category = decode(id, &json)?;
            category.id = id.to_string();
            Ok(category)
        })
        .transpose()
    }

    async fn list(&self) -> Result<Vec<Category>, StoreError> {
        let mut connection = self.connection().await?;
        let raw: HashMap<String, String> = connection.hgetall(CATEGORIES_KEY).await?;

        raw.into_iter()
            .map(|(id, json)| -> Result<Category, StoreError> {
                let mut category: Category = decode(&id, &json)?;
                category.id = id;
                Ok(category)
            })
            .collect()
    }
}
