//! Menu Item Model

use serde::{Deserialize, Serialize};

/// What kind of thing the menu item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    #[default]
    Standard,
    Combo,
    Timed,
    Retail,
}

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub category_id: String,
    pub name: String,
    /// Short name printed on kitchen tickets, falls back to `name`
    #[serde(default)]
    pub kitchen_name: Option<String>,
    /// Explicit routing override; `None` or empty means inherit
    #[serde(default)]
    pub route_tags: Option<Vec<String>>,
    #[serde(default)]
    pub item_type: ItemType,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, category_id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            category_id: category_id.into(),
            kitchen_name: None,
            route_tags: None,
            item_type: ItemType::Standard,
        }
    }

    pub fn with_route_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Name to print on kitchen tickets
    pub fn ticket_name(&self) -> &str {
        self.kitchen_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.name)
    }
}
