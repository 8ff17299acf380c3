//! Category Model

use serde::{Deserialize, Serialize};

/// Kind of menu category, drives the default routing tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
    Food,
    Drinks,
    Liquor,
    Pizza,
    Entertainment,
    Retail,
    #[serde(other)]
    Other,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Food => "food",
            CategoryType::Drinks => "drinks",
            CategoryType::Liquor => "liquor",
            CategoryType::Pizza => "pizza",
            CategoryType::Entertainment => "entertainment",
            CategoryType::Retail => "retail",
            CategoryType::Other => "other",
        }
    }
}

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub category_type: CategoryType,
    /// Routing tags inherited by items that declare none of their own
    #[serde(default)]
    pub route_tags: Vec<String>,
}

impl Category {
    pub fn new(id: impl Into<String>, category_type: CategoryType) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            category_type,
            route_tags: Vec::new(),
        }
    }

    pub fn with_route_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route_tags = tags.into_iter().map(Into::into).collect();
        self
    }
}
