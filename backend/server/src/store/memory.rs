use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CategoryDirectory, Commit, FeaturedStore, Snapshot};
use crate::{
    error::StoreError,
    models::{Category, FeaturedEntry},
    ordering::{Change, Plan},
};

#[derive(Default)]
struct Entries {
    version: u64,
    by_id: BTreeMap<String, FeaturedEntry>,
}

/// Process-local featured store. State is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Entries>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: impl IntoIterator<Item = FeaturedEntry>) -> Self {
        let by_id = entries.into_iter().map(|e| (e.id.clone(), e)).collect();

        Self {
            inner: RwLock::new(Entries { version: 0, by_id }),
        }
    }
}

#[async_trait]
impl FeaturedStore for MemoryStore {
    async fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let inner = self.inner.read().await;

        let mut entries: Vec<FeaturedEntry> = inner.by_id.values().cloned().collect();
        entries.sort_by_key(|e| e.position);

        Ok(Snapshot {
            version: inner.version,
            entries,
        })
    }

    async fn commit(&self, version: u64, plan: &Plan) -> Result<Commit, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.version != version {
            return Ok(Commit::Conflict);
        }

        for change in &plan.changes {
            match change {
                Change::Put(entry) => {
                    inner.by_id.insert(entry.id.clone(), entry.clone());
                }
                Change::Remove(id) => {
                    inner.by_id.remove(id);
                }
            }
        }

        inner.version += 1;
        Ok(Commit::Applied)
    }
}

#[derive(Default)]
pub struct MemoryDirectory {
    categories: RwLock<BTreeMap<String, Category>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, category: Category) {
        self.categories
            .write()
            .await
            .insert(category.id.clone(), category);
    }

    pub async fn remove(&self, id: &str) -> Option<Category> {
        self.categories.write().await.remove(id)
    }
}

#[async_trait]
impl CategoryDirectory for MemoryDirectory {
    async fn get(&self, id: &str) -> Result<Option<Category>, StoreError> {
        Ok(self.categories.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.categories.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, position: u32) -> FeaturedEntry {
        FeaturedEntry {
            id: id.into(),
            category_id: format!("cat-{id}"),
            position,
        }
    }

    #[tokio::test]
    async fn test_snapshot_sorted() {
        let store = MemoryStore::with_entries([entry("b", 2), entry("a", 3), entry("c", 1)]);
        let snapshot = store.snapshot().await.unwrap();

        let ids: Vec<_> = snapshot.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_stale_commit_rejected() {
        let store = MemoryStore::new();
        let plan = Plan {
            changes: vec![Change::Put(entry("a", 1))],
        };

        assert_eq!(store.commit(0, &plan).await.unwrap(), Commit::Applied);
        assert_eq!(store.commit(0, &plan).await.unwrap(), Commit::Conflict);

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.entries.len(), 1);
    }
}
