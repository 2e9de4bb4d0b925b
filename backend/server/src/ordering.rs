//! # Featured Ordering
//!
//! Index maintenance for the featured list.
//!
//! Every function here is pure: it reads a position-sorted snapshot and returns a [`Plan`]
//! describing the writes that keep the list valid. Applying the plan is the store's job,
//! and the store applies it atomically against the snapshot it was planned from.
//!
//! ## Invariants
//!
//! - Positions of N entries are exactly `1..=N`
//! - A category is featured at most once (checked on add only)
//! - N never exceeds the configured maximum
use crate::{error::AppError, models::FeaturedEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Put(FeaturedEntry),
    Remove(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub changes: Vec<Change>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    fn put(&mut self, entry: &FeaturedEntry, position: u32) {
        self.changes.push(Change::Put(FeaturedEntry {
            position,
            ..entry.clone()
        }));
    }

    /// Replays the plan over a snapshot, returning the resulting position-sorted list.
    pub fn apply(&self, entries: &[FeaturedEntry]) -> Vec<FeaturedEntry> {
        let mut next = entries.to_vec();

        for change in &self.changes {
            match change {
                Change::Put(entry) => match next.iter_mut().find(|e| e.id == entry.id) {
                    Some(existing) => *existing = entry.clone(),
                    None => next.push(entry.clone()),
                },
                Change::Remove(id) => next.retain(|e| &e.id != id),
            }
        }

        next.sort_by_key(|e| e.position);
        next
    }
}

/// Rounds half up like the admin UI does, then clamps into `[1, len]`.
pub fn clamp_position(raw: f64, len: usize) -> Result<u32, AppError> {
    if !raw.is_finite() {
        return Err(AppError::InvalidInput("Invalid index value"));
    }

    let upper = len.max(1) as f64;
    let rounded = (raw + 0.5).floor();

    Ok(rounded.clamp(1.0, upper) as u32)
}

pub fn plan_add(
    entries: &[FeaturedEntry],
    entry_id: &str,
    category_id: &str,
    max_featured: usize,
) -> Result<(Plan, FeaturedEntry), AppError> {
    if entries.len() >= max_featured {
        return Err(AppError::CapacityExceeded(max_featured));
    }

    if entries.iter().any(|e| e.category_id == category_id) {
        return Err(AppError::DuplicateEntry);
    }

    let last = entries.iter().map(|e| e.position).max().unwrap_or(0);
    let entry = FeaturedEntry {
        id: entry_id.to_string(),
        category_id: category_id.to_string(),
        position: last + 1,
    };

    let plan = Plan {
        changes: vec![Change::Put(entry.clone())],
    };

    Ok((plan, entry))
}

/// `key` is matched against entry ids first, then against category references.
pub fn plan_delete(entries: &[FeaturedEntry], key: &str) -> Result<(Plan, FeaturedEntry), AppError> {
    let target = entries
        .iter()
        .find(|e| e.id == key)
        .or_else(|| entries.iter().find(|e| e.category_id == key))
        .ok_or(AppError::NotFound("Featured category"))?;

    let mut plan = Plan {
        changes: vec![Change::Remove(target.id.clone())],
    };

    for entry in entries.iter().filter(|e| e.position > target.position) {
        plan.put(entry, entry.position - 1);
    }

    Ok((plan, target.clone()))
}

pub fn plan_reposition(entries: &[FeaturedEntry], entry_id: &str, raw: f64) -> Result<Plan, AppError> {
    let target = entries
        .iter()
        .find(|e| e.id == entry_id)
        .ok_or(AppError::NotFound("Featured category"))?;

    let desired = clamp_position(raw, entries.len())?;
    let current = target.position;
    let mut plan = Plan::default();

    if desired == current {
        return Ok(plan);
    }

    for entry in entries.iter().filter(|e| e.id != target.id) {
        let position = entry.position;

        if desired > current && position > current && position <= desired {
            plan.put(entry, position - 1);
        } else if desired < current && position >= desired && position < current {
            plan.put(entry, position + 1);
        }
    }

    plan.put(target, desired);
    Ok(plan)
}

/// Assigns already-normalized orders. Ids absent from the store are skipped and entries
/// outside `updates` are left alone.
pub fn plan_reorder(entries: &[FeaturedEntry], updates: &[(String, u32)]) -> Result<Plan, AppError> {
    if updates.is_empty() {
        return Err(AppError::InvalidInput("No items supplied for reorder"));
    }

    let mut plan = Plan::default();

    for (id, order) in updates {
        if let Some(entry) = entries.iter().find(|e| &e.id == id) {
            if entry.position != *order {
                plan.put(entry, *order);
            }
        }
    }

    Ok(plan)
}
