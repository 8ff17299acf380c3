//! Tag resolution (item > category > location default)

use std::collections::HashMap;

use shared::models::{Category, CategoryType, MenuItem};

use super::types::{ResolvedTags, TagSource};

/// Category type → route tags used when neither item nor category declares any
#[derive(Debug, Clone)]
pub struct TagDefaults {
    table: HashMap<CategoryType, Vec<String>>,
}

impl Default for TagDefaults {
    fn default() -> Self {
        let table = [
            (CategoryType::Food, vec!["kitchen", "food"]),
            (CategoryType::Drinks, vec!["bar"]),
            (CategoryType::Liquor, vec!["bar"]),
            (CategoryType::Pizza, vec!["pizza"]),
            (CategoryType::Entertainment, vec!["entertainment"]),
            (CategoryType::Retail, vec![]),
            (CategoryType::Other, vec![]),
        ]
        .into_iter()
        .map(|(kind, tags)| (kind, tags.into_iter().map(String::from).collect()))
        .collect();

        Self { table }
    }
}

impl TagDefaults {
    /// Replace the defaults for one category type (per-location customisation)
    pub fn with_override<I, S>(mut self, category_type: CategoryType, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table
            .insert(category_type, tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn tags_for(&self, category_type: CategoryType) -> &[String] {
        self.table
            .get(&category_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Resolve the route tags of one menu item
///
/// The first non-empty source wins outright; sources are never merged.
pub fn resolve_tags(item: &MenuItem, category: &Category, defaults: &TagDefaults) -> ResolvedTags {
    if let Some(tags) = item.route_tags.as_deref().map(normalize_tags)
        && !tags.is_empty()
    {
        return ResolvedTags {
            tags,
            source: TagSource::Item,
        };
    }

    let tags = normalize_tags(&category.route_tags);
    if !tags.is_empty() {
        return ResolvedTags {
            tags,
            source: TagSource::Category,
        };
    }

    ResolvedTags {
        tags: normalize_tags(defaults.tags_for(category.category_type)),
        source: TagSource::Default,
    }
}

/// Drop blanks and duplicates, keeping first-seen order
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || out.iter().any(|t| t == tag) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}
