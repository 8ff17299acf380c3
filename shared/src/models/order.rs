//! Order snapshot handed to the router at send time

use serde::{Deserialize, Serialize};

/// Service mode of the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    #[default]
    DineIn,
    Takeout,
    Delivery,
    BarTab,
}

impl OrderType {
    pub fn label(&self) -> &'static str {
        match self {
            OrderType::DineIn => "DINE IN",
            OrderType::Takeout => "TAKEOUT",
            OrderType::Delivery => "DELIVERY",
            OrderType::BarTab => "BAR TAB",
        }
    }
}

/// Order context (everything except the items)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub location_id: String,
    pub order_number: String,
    #[serde(default)]
    pub order_type: OrderType,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub tab_name: Option<String>,
    #[serde(default)]
    pub server_name: Option<String>,
    /// Unix millis
    pub created_at: i64,
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        location_id: impl Into<String>,
        order_number: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            location_id: location_id.into(),
            order_number: order_number.into(),
            order_type: OrderType::DineIn,
            table_name: None,
            tab_name: None,
            server_name: None,
            created_at,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table_name = Some(table.into());
        self
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server_name = Some(server.into());
        self
    }
}

/// Qualifier printed in front of a modifier ("NO onions", "EXTRA cheese")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreModifier {
    No,
    Lite,
    Extra,
}

impl PreModifier {
    pub fn label(&self) -> &'static str {
        match self {
            PreModifier::No => "NO",
            PreModifier::Lite => "LITE",
            PreModifier::Extra => "EXTRA",
        }
    }
}

/// Selected modifier, possibly with nested child modifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderModifier {
    pub name: String,
    #[serde(default)]
    pub pre_modifier: Option<PreModifier>,
    #[serde(default)]
    pub children: Vec<OrderModifier>,
}

impl OrderModifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pre_modifier: None,
            children: Vec::new(),
        }
    }

    pub fn with_pre(mut self, pre: PreModifier) -> Self {
        self.pre_modifier = Some(pre);
        self
    }

    pub fn with_child(mut self, child: OrderModifier) -> Self {
        self.children.push(child);
        self
    }

    /// Line text including the qualifier, e.g. "LITE Mayo"
    pub fn display_text(&self) -> String {
        match self.pre_modifier {
            Some(pre) => format!("{} {}", pre.label(), self.name),
            None => self.name.clone(),
        }
    }
}

/// What to do with a base ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngredientAction {
    No,
    Lite,
    Extra,
    OnSide,
}

impl IngredientAction {
    pub fn label(&self) -> &'static str {
        match self {
            IngredientAction::No => "NO",
            IngredientAction::Lite => "LITE",
            IngredientAction::Extra => "EXTRA",
            IngredientAction::OnSide => "ON SIDE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientModification {
    pub ingredient: String,
    pub action: IngredientAction,
}

impl IngredientModification {
    /// Removals are allergy call-outs and get highlighted on tickets
    pub fn is_removal(&self) -> bool {
        self.action == IngredientAction::No
    }

    pub fn display_text(&self) -> String {
        format!("{} {}", self.action.label(), self.ingredient)
    }
}

/// One line of a submitted order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub menu_item_id: String,
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub seat: Option<u32>,
    #[serde(default)]
    pub course: Option<u32>,
    /// Table the item was ordered from when it differs from the order's table
    #[serde(default)]
    pub source_table: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<OrderModifier>,
    #[serde(default)]
    pub ingredient_modifications: Vec<IngredientModification>,
    #[serde(default)]
    pub special_notes: Option<String>,
    /// Number of times this item has been re-sent to the kitchen
    #[serde(default)]
    pub resend_count: u32,
}

impl OrderItem {
    pub fn new(id: impl Into<String>, menu_item_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            menu_item_id: menu_item_id.into(),
            name: name.into(),
            quantity: 1,
            seat: None,
            course: None,
            source_table: None,
            modifiers: Vec::new(),
            ingredient_modifications: Vec::new(),
            special_notes: None,
            resend_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_display_text() {
        let m = OrderModifier::new("Onions").with_pre(PreModifier::No);
        assert_eq!(m.display_text(), "NO Onions");
        assert_eq!(OrderModifier::new("Rare").display_text(), "Rare");
    }

    #[test]
    fn test_order_item_defaults_from_json() {
        let item: OrderItem = serde_json::from_str(
            r#"{"id":"i1","menu_item_id":"m1","name":"Burger","quantity":2,
                "modifiers":[{"name":"Cheese","pre_modifier":"EXTRA"}]}"#,
        )
        .unwrap();
        assert_eq!(item.quantity, 2);
        assert_eq!(item.resend_count, 0);
        assert_eq!(item.modifiers[0].pre_modifier, Some(PreModifier::Extra));
        assert!(item.modifiers[0].children.is_empty());
    }
}
