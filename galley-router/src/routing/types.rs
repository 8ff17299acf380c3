//! Routing types
//!
//! Everything here is rebuilt on every send action and never persisted.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::models::{Category, MenuItem, Order, OrderItem, Station};

/// Where an item's route tags came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagSource {
    Item,
    Category,
    Default,
}

/// Output of the tag resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTags {
    pub tags: Vec<String>,
    pub source: TagSource,
}

/// One order line with the catalog records it was ordered from
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub item: OrderItem,
    pub menu_item: MenuItem,
    pub category: Category,
}

impl OrderLine {
    pub fn new(item: OrderItem, menu_item: MenuItem, category: Category) -> Self {
        Self {
            item,
            menu_item,
            category,
        }
    }
}

/// Order item enriched with its resolved route tags
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedItem {
    /// Position in order-entry sequence
    pub sequence: usize,
    pub item: OrderItem,
    /// Name to print (menu kitchen name, falling back to the order line name)
    pub ticket_name: String,
    pub tags: Vec<String>,
    pub tag_source: TagSource,
}

impl RoutedItem {
    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Everything one station must print or display for one order
///
/// Immutable once built. Retrying against another station goes through
/// [`RoutingManifest::rebuild_for`], which produces a new manifest.
#[derive(Debug, Clone)]
pub struct RoutingManifest {
    station: Arc<Station>,
    primary_items: Vec<Arc<RoutedItem>>,
    reference_items: Vec<Arc<RoutedItem>>,
    matched_tags: Vec<String>,
    is_expo: bool,
}

impl RoutingManifest {
    pub(crate) fn new(
        station: Arc<Station>,
        primary_items: Vec<Arc<RoutedItem>>,
        reference_items: Vec<Arc<RoutedItem>>,
        matched_tags: Vec<String>,
    ) -> Self {
        let is_expo = station.is_expo;
        Self {
            station,
            primary_items,
            reference_items,
            matched_tags,
            is_expo,
        }
    }

    pub fn station(&self) -> &Station {
        &self.station
    }

    /// Items this station must act on, in order-entry sequence
    pub fn primary_items(&self) -> &[Arc<RoutedItem>] {
        &self.primary_items
    }

    /// Context-only items prepared elsewhere
    pub fn reference_items(&self) -> &[Arc<RoutedItem>] {
        &self.reference_items
    }

    pub fn matched_tags(&self) -> &[String] {
        &self.matched_tags
    }

    pub fn is_expo(&self) -> bool {
        self.is_expo
    }

    pub fn item_count(&self) -> usize {
        self.primary_items.len()
    }

    /// Highest resend counter among the primary items
    pub fn resend_count(&self) -> u32 {
        self.primary_items
            .iter()
            .map(|i| i.item.resend_count)
            .max()
            .unwrap_or(0)
    }

    /// Same items, addressed to another station (its capability and print
    /// configuration apply from now on)
    pub fn rebuild_for(&self, station: &Station) -> RoutingManifest {
        RoutingManifest {
            station: Arc::new(station.clone()),
            primary_items: self.primary_items.clone(),
            reference_items: self.reference_items.clone(),
            matched_tags: self.matched_tags.clone(),
            is_expo: self.is_expo,
        }
    }
}

/// Counters describing one resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingStats {
    pub total_items: usize,
    pub routed_items: usize,
    pub unrouted_items: usize,
    pub manifest_count: usize,
    pub expo_stations: usize,
    pub reference_lines: usize,
}

/// Output of the routing resolver
#[derive(Debug, Clone)]
pub struct RoutingResult {
    order: Arc<Order>,
    items: Vec<Arc<RoutedItem>>,
    manifests: Vec<RoutingManifest>,
    unrouted_items: Vec<Arc<RoutedItem>>,
    stats: RoutingStats,
}

impl RoutingResult {
    pub(crate) fn new(
        order: Arc<Order>,
        items: Vec<Arc<RoutedItem>>,
        manifests: Vec<RoutingManifest>,
        unrouted_items: Vec<Arc<RoutedItem>>,
        stats: RoutingStats,
    ) -> Self {
        Self {
            order,
            items,
            manifests,
            unrouted_items,
            stats,
        }
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    /// Every item of the order in entry sequence, routed or not
    pub fn items(&self) -> &[Arc<RoutedItem>] {
        &self.items
    }

    pub fn manifests(&self) -> &[RoutingManifest] {
        &self.manifests
    }

    pub fn manifest_for(&self, station_id: &str) -> Option<&RoutingManifest> {
        self.manifests.iter().find(|m| m.station().id == station_id)
    }

    pub fn unrouted_items(&self) -> &[Arc<RoutedItem>] {
        &self.unrouted_items
    }

    pub fn stats(&self) -> RoutingStats {
        self.stats
    }
}
