//! # Category Seeding
//!
//! Loads catalog categories into the Redis category directory the featured service reads.
//!
//! ## Source
//!
//! A JSON array of category documents, from disk or over HTTP:
//!
//! ```json
//! [{ "_id": "64f...", "title": "Whey Protein", "slug": "whey-protein", "image": "categories/whey.png" }]
//! ```
//!
//! - `_id` or `id` is kept when present, otherwise a new id is generated
//! - `title` falls back to `name`, as older documents only carry `name`
//! - A missing slug is derived from the display name
//!
//! Existing documents with the same id are overwritten, so reruns are safe.
use std::{fs, sync::LazyLock};

use anyhow::{Context, Result};
use featured::{database::Database, models::Category, store::remote::RedisStore};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use reqwest::get;
use serde::Deserialize;
use uuid::Uuid;

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_ -]").unwrap());
// Underscores read as spaces
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_ ]+").unwrap());

#[derive(Deserialize)]
pub struct SeedCategory {
    #[serde(default, rename = "_id")]
    pub underscore_id: Option<String>,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub image: Option<String>,
}

impl SeedCategory {
    pub fn into_category(self) -> Category {
        let id = [self.underscore_id, self.id]
            .into_iter()
            .flatten()
            .find(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        let mut category = Category {
            id,
            title: self.title,
            name: self.name,
            slug: String::new(),
            image: self.image.filter(|image| !image.is_empty()),
        };

        category.slug = match self.slug.filter(|slug| !slug.is_empty()) {
            Some(slug) => slug,
            None => slugify(category.display_name()),
        };

        category
    }
}

pub async fn load_categories(source: &str) -> Result<Vec<Category>> {
    let raw = if source.starts_with("http://") || source.starts_with("https://") {
        get(source)
            .await
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("Failed to fetch {source}"))?
            .text()
            .await?
    } else {
        fs::read_to_string(source).with_context(|| format!("Failed to read {source}"))?
    };

    let categories: Vec<SeedCategory> =
        serde_json::from_str(&raw).with_context(|| format!("{source} is not a category array"))?;

    Ok(categories
        .into_iter()
        .map(SeedCategory::into_category)
        .collect())
}

pub async fn seed_categories(redis_url: &str, categories: &[Category]) -> Result<()> {
    let store = RedisStore::new(Database::new(redis_url));

    let pb = ProgressBar::new(categories.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    for category in categories {
        pb.set_message(category.slug.clone());

        store
            .upsert_category(category)
            .await
            .with_context(|| format!("Failed to write category {}", category.id))?;

        pb.inc(1);
    }

    pb.finish_with_message("Done");
    Ok(())
}

pub fn slugify(input: &str) -> String {
    let kept = DISALLOWED.replace_all(input, "");
    let trimmed = kept.trim_matches([' ', '_']);

    SEPARATORS.replace_all(trimmed, "-").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(slugify("Whey_Protein"), "whey-protein");
        assert_eq!(slugify("Pre-Workout"), "pre-workout");
        assert_eq!(slugify("Vitamins & Minerals!"), "vitamins-minerals");
    }

    #[test]
    fn test_leading_trailing_spaces() {
        assert_eq!(slugify("   creatine   "), "creatine");
        assert_eq!(slugify("  mass   gainers  "), "mass-gainers");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(slugify("!@#$%^&*()"), "");
        assert_eq!(slugify("omega3 (fish oil)"), "omega3-fish-oil");
    }

    #[test]
    fn test_underscores_and_spaces_collapse() {
        assert_eq!(slugify("_Fish__ _Oil_"), "fish-oil");
        assert_eq!(slugify("bcaa _ eaa"), "bcaa-eaa");
        assert_eq!(slugify("__"), "");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("     "), "");
    }

    fn seed(value: serde_json::Value) -> Category {
        serde_json::from_value::<SeedCategory>(value)
            .unwrap()
            .into_category()
    }

    #[test]
    fn test_into_category_keeps_fields() {
        let category = seed(serde_json::json!({
            "_id": "64f1",
            "title": "Whey Protein",
            "slug": "whey",
            "image": "categories/whey.png"
        }));

        assert_eq!(category.id, "64f1");
        assert_eq!(category.slug, "whey");
        assert_eq!(category.image.as_deref(), Some("categories/whey.png"));
    }

    #[test]
    fn test_into_category_fills_gaps() {
        let category = seed(serde_json::json!({ "id": "", "name": "Fat Burners", "image": "" }));

        assert_eq!(category.id.len(), 32);
        assert_eq!(category.slug, "fat-burners");
        assert_eq!(category.image, None);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        fs::write(&path, r#"[{ "_id": "a", "title": "Amino Acids" }]"#).unwrap();

        let categories = load_categories(path.to_str().unwrap()).await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].slug, "amino-acids");
    }

    #[tokio::test]
    async fn test_load_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.json");
        fs::write(&path, r#"{ "categories": [] }"#).unwrap();

        assert!(load_categories(path.to_str().unwrap()).await.is_err());
    }
}
