//! # Stores
//!
//! Persistence seams for the featured list and the category directory.
//!
//! A featured store hands out versioned snapshots and accepts a [`Plan`] only if the version
//! it was planned against is still current. Every change in an accepted plan lands together,
//! so a shift is never half applied and two admins racing on the list cannot interleave.
use async_trait::async_trait;

use crate::{
    error::StoreError,
    models::{Category, FeaturedEntry},
    ordering::Plan,
};

pub mod memory;
pub mod remote;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub version: u64,

    /// Sorted ascending by position.
    pub entries: Vec<FeaturedEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied,
    Conflict,
}

#[async_trait]
pub trait FeaturedStore: Send + Sync {
    async fn snapshot(&self) -> Result<Snapshot, StoreError>;

    /// Applies `plan` atomically if the store is still at `version`.
    async fn commit(&self, version: u64, plan: &Plan) -> Result<Commit, StoreError>;
}

/// Read-only view of the catalog categories.
#[async_trait]
pub trait CategoryDirectory: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Category>, StoreError>;

    async fn list(&self) -> Result<Vec<Category>, StoreError>;
}
