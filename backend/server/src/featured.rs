//! # Featured Categories
//!
//! Categories promoted on the storefront, in an explicit display order.
//!
//! Mutations follow one loop: take a snapshot, plan against it with [`crate::ordering`],
//! commit the plan against the snapshot's version. A conflicting commit means another
//! admin got there first, so the operation is planned again from a fresh snapshot.
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, StoreError},
    models::{CategoryView, FeaturedEntry, FeaturedItem},
    ordering::{Plan, plan_add, plan_delete, plan_reorder, plan_reposition},
    store::{CategoryDirectory, Commit, FeaturedStore},
    utils::{FALLBACK_IMAGE, build_image_url},
};

pub const MAX_COMMIT_ATTEMPTS: usize = 3;

pub struct FeaturedService {
    store: Arc<dyn FeaturedStore>,
    directory: Arc<dyn CategoryDirectory>,
    max_featured: usize,
    storage_bucket: Option<String>,
}

impl FeaturedService {
    pub fn new(
        store: Arc<dyn FeaturedStore>,
        directory: Arc<dyn CategoryDirectory>,
        max_featured: usize,
        storage_bucket: Option<String>,
    ) -> Self {
        Self {
            store,
            directory,
            max_featured,
            storage_bucket,
        }
    }

    async fn transact<T>(
        &self,
        operation: &str,
        mut plan: impl FnMut(&[FeaturedEntry]) -> Result<(Plan, T), AppError>,
    ) -> Result<T, AppError> {
        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let snapshot = self.store.snapshot().await?;
            let (changes, output) = plan(&snapshot.entries)?;

            if changes.is_empty() {
                return Ok(output);
            }

            match self.store.commit(snapshot.version, &changes).await? {
                Commit::Applied => return Ok(output),
                Commit::Conflict => {
                    warn!("{operation}: version {} moved on (attempt {attempt})", snapshot.version);
                }
            }
        }

        Err(StoreError::Contended(MAX_COMMIT_ATTEMPTS).into())
    }

    pub async fn list(&self) -> Result<Vec<FeaturedItem>, AppError> {
        let snapshot = self.store.snapshot().await?;
        let mut items = Vec::with_capacity(snapshot.entries.len());

        for entry in snapshot.entries {
            // A dangling reference is listed with a blank category, ids included
            let (category_id, category) = match self.directory.get(&entry.category_id).await? {
                Some(category) => (
                    entry.category_id.clone(),
                    CategoryView {
                        id: entry.category_id.clone(),
                        name: category.display_name().to_string(),
                        slug: category.slug.clone(),
                        image: build_image_url(category.image.as_deref(), self.storage_bucket.as_deref()),
                    },
                ),
                None => {
                    warn!("Featured entry {} points at missing category {}", entry.id, entry.category_id);

                    (
                        String::new(),
                        CategoryView {
                            id: String::new(),
                            name: String::new(),
                            slug: String::new(),
                            image: FALLBACK_IMAGE.to_string(),
                        },
                    )
                }
            };

            items.push(FeaturedItem {
                id: entry.id,
                position: entry.position,
                category_id,
                category,
            });
        }

        Ok(items)
    }

    /// Directory listing for the "add featured" picker, sorted by display name.
    pub async fn categories(&self) -> Result<Vec<CategoryView>, AppError> {
        let mut categories = self.directory.list().await?;
        categories.sort_by(|a, b| a.display_name().cmp(b.display_name()));

        Ok(categories
            .into_iter()
            .map(|category| CategoryView {
                name: category.display_name().to_string(),
                image: category.image.unwrap_or_default(),
                id: category.id,
                slug: category.slug,
            })
            .collect())
    }

    pub async fn add(&self, category_id: &str) -> Result<FeaturedEntry, AppError> {
        if self.directory.get(category_id).await?.is_none() {
            return Err(AppError::NotFound("Category"));
        }

        let entry_id = Uuid::new_v4().simple().to_string();
        let entry = self
            .transact("add", |entries| {
                plan_add(entries, &entry_id, category_id, self.max_featured)
            })
            .await?;

        info!("Featured category {category_id} at position {}", entry.position);
        Ok(entry)
    }

    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        let removed = self
            .transact("delete", |entries| plan_delete(entries, key))
            .await?;

        info!("Removed featured entry {} from position {}", removed.id, removed.position);
        Ok(())
    }

    pub async fn reposition(&self, entry_id: &str, desired: f64) -> Result<(), AppError> {
        self.transact("reposition", |entries| {
            plan_reposition(entries, entry_id, desired).map(|plan| (plan, ()))
        })
        .await?;

        info!("Moved featured entry {entry_id} towards {desired}");
        Ok(())
    }

    /// `updates` must already be normalized to a dense `1..=K` order.
    pub async fn reorder(&self, updates: &[(String, u32)]) -> Result<(), AppError> {
        if updates.is_empty() {
            return Err(AppError::InvalidInput("No items supplied for reorder"));
        }

        self.transact("reorder", |entries| {
            plan_reorder(entries, updates).map(|plan| (plan, ()))
        })
        .await?;

        info!("Reordered {} featured entries", updates.len());
        Ok(())
    }
}
