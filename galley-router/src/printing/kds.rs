//! KDS ticket payload
//!
//! Structured counterpart of the printed ticket, published to kitchen display
//! screens. Bump status is owned by the screen; the router only ever emits
//! `Pending`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use shared::models::{DisplayProfile, Order, OrderModifier, OrderType};

use crate::routing::{RoutedItem, RoutingManifest};

/// Preparation state of one line on a KDS screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KdsItemStatus {
    #[default]
    Pending,
    Cooking,
    Ready,
    Served,
}

impl KdsItemStatus {
    /// Next state in pending → cooking → ready → served; served is terminal
    pub fn advance(self) -> Self {
        match self {
            KdsItemStatus::Pending => KdsItemStatus::Cooking,
            KdsItemStatus::Cooking => KdsItemStatus::Ready,
            KdsItemStatus::Ready | KdsItemStatus::Served => KdsItemStatus::Served,
        }
    }

    pub fn is_done(self) -> bool {
        self == KdsItemStatus::Served
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KdsModifier {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<KdsModifier>,
}

impl From<&OrderModifier> for KdsModifier {
    fn from(m: &OrderModifier) -> Self {
        Self {
            text: m.display_text(),
            children: m.children.iter().map(KdsModifier::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KdsItem {
    pub item_id: String,
    pub name: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_table: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<KdsModifier>,
    /// "NO peanuts" style lines; `allergy` marks removals
    #[serde(default)]
    pub ingredient_notes: Vec<KdsIngredientNote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_notes: Option<String>,
    pub resend_count: u32,
    pub status: KdsItemStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdsIngredientNote {
    pub text: String,
    pub allergy: bool,
}

impl KdsItem {
    fn from_routed(routed: &RoutedItem, with_modifiers: bool) -> Self {
        let item = &routed.item;
        Self {
            item_id: item.id.clone(),
            name: routed.ticket_name.clone(),
            quantity: item.quantity,
            seat: item.seat,
            course: item.course,
            source_table: item.source_table.clone(),
            modifiers: if with_modifiers {
                item.modifiers.iter().map(KdsModifier::from).collect()
            } else {
                Vec::new()
            },
            ingredient_notes: item
                .ingredient_modifications
                .iter()
                .map(|m| KdsIngredientNote {
                    text: m.display_text(),
                    allergy: m.is_removal(),
                })
                .collect(),
            special_notes: item.special_notes.clone().filter(|n| !n.trim().is_empty()),
            resend_count: item.resend_count,
            status: KdsItemStatus::Pending,
        }
    }
}

/// Context-only line prepared at another station
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdsReferenceItem {
    pub item_id: String,
    pub name: String,
    pub quantity: u32,
}

/// Payload for one KDS station and one order
///
/// The order-wide ticket sent to expo screens has no station and carries
/// every item of the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KdsTicket {
    pub order_id: String,
    pub order_number: String,
    pub order_type: OrderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,
    pub is_expo: bool,
    /// Layout hints of the receiving screen
    #[serde(default)]
    pub display: DisplayProfile,
    /// Unix millis of the order
    pub created_at: i64,
    pub resend_count: u32,
    pub items: Vec<KdsItem>,
    #[serde(default)]
    pub reference_items: Vec<KdsReferenceItem>,
}

impl KdsTicket {
    /// Ticket for one KDS station's manifest
    pub fn build(order: &Order, manifest: &RoutingManifest) -> Self {
        let station = manifest.station();
        let mut ticket = Self::base(
            order,
            manifest.primary_items(),
            station.display.clone(),
            manifest.is_expo(),
        );
        ticket.station_id = Some(station.id.clone());
        ticket.station_name = Some(station.name.clone());
        ticket.reference_items = manifest
            .reference_items()
            .iter()
            .map(|i| KdsReferenceItem {
                item_id: i.item.id.clone(),
                name: i.ticket_name.clone(),
                quantity: i.item.quantity,
            })
            .collect();
        ticket
    }

    /// Order-wide ticket for expo screens, every item included
    pub fn for_order(order: &Order, items: &[Arc<RoutedItem>]) -> Self {
        Self::base(order, items, DisplayProfile::default(), true)
    }

    fn base(order: &Order, items: &[Arc<RoutedItem>], display: DisplayProfile, is_expo: bool) -> Self {
        let with_modifiers = display.show_modifiers;
        Self {
            order_id: order.id.clone(),
            order_number: order.order_number.clone(),
            order_type: order.order_type,
            table_name: order.table_name.clone(),
            tab_name: order.tab_name.clone(),
            server_name: order.server_name.clone(),
            station_id: None,
            station_name: None,
            is_expo,
            display,
            created_at: order.created_at,
            resend_count: items.iter().map(|i| i.item.resend_count).max().unwrap_or(0),
            items: items
                .iter()
                .map(|i| KdsItem::from_routed(i, with_modifiers))
                .collect(),
            reference_items: Vec::new(),
        }
    }
}
