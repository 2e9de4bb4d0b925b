use serde::{Deserialize, Serialize};

/// One slot of the featured list. `position` is 1-based and dense across the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedEntry {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "categoryId")]
    pub category_id: String,

    #[serde(rename = "index")]
    pub position: u32,
}

/// Category document as kept by the directory. Older documents carry `name`
/// instead of `title`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Category {
    pub fn display_name(&self) -> &str {
        [&self.title, &self.name]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|name| !name.is_empty())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub slug: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeaturedItem {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "index")]
    pub position: u32,

    #[serde(rename = "categoryId")]
    pub category_id: String,

    pub category: CategoryView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_title() {
        let category = Category {
            title: Some("Protein".into()),
            name: Some("Whey".into()),
            ..Default::default()
        };
        assert_eq!(category.display_name(), "Protein");
    }

    #[test]
    fn test_display_name_skips_empty_title() {
        let category = Category {
            title: Some(String::new()),
            name: Some("Whey".into()),
            ..Default::default()
        };
        assert_eq!(category.display_name(), "Whey");
        assert_eq!(Category::default().display_name(), "");
    }

    #[test]
    fn test_entry_wire_names() {
        let entry = FeaturedEntry {
            id: "e1".into(),
            category_id: "c1".into(),
            position: 3,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "_id": "e1", "categoryId": "c1", "index": 3 })
        );
    }
}
