//! Routing resolver
//!
//! Turns an order plus the active stations of its location into one manifest
//! per station. Pure: no I/O, no shared state, O(items × stations).

use std::sync::Arc;

use shared::models::{Order, Station};
use tracing::{debug, warn};

use super::tags::{TagDefaults, resolve_tags};
use super::types::{OrderLine, RoutedItem, RoutingManifest, RoutingResult, RoutingStats};

/// Routing resolver with a configurable default tag table
#[derive(Debug, Clone, Default)]
pub struct RoutingResolver {
    defaults: TagDefaults,
}

impl RoutingResolver {
    pub fn new(defaults: TagDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &TagDefaults {
        &self.defaults
    }

    /// Resolve which station gets which items
    ///
    /// Inactive or deleted stations in `stations` are skipped. An empty
    /// station list is valid and leaves every item unrouted.
    pub fn resolve(&self, order: &Order, lines: &[OrderLine], stations: &[Station]) -> RoutingResult {
        let items: Vec<Arc<RoutedItem>> = lines
            .iter()
            .enumerate()
            .map(|(sequence, line)| {
                let resolved = resolve_tags(&line.menu_item, &line.category, &self.defaults);
                Arc::new(RoutedItem {
                    sequence,
                    ticket_name: line.menu_item.ticket_name().to_string(),
                    item: line.item.clone(),
                    tags: resolved.tags,
                    tag_source: resolved.source,
                })
            })
            .collect();

        let stations: Vec<&Station> = stations.iter().filter(|s| s.is_available()).collect();

        // matched[s][i]: tags item i shares with station s
        let matched: Vec<Vec<Vec<&str>>> = stations
            .iter()
            .map(|station| {
                items
                    .iter()
                    .map(|item| {
                        item.tags
                            .iter()
                            .filter(|t| station.subscribes_to(t))
                            .map(String::as_str)
                            .collect()
                    })
                    .collect()
            })
            .collect();

        let is_primary = |s: usize, i: usize| stations[s].is_expo || !matched[s][i].is_empty();

        // Items some non-expo station will actually prepare
        let prepared: Vec<bool> = (0..items.len())
            .map(|i| (0..stations.len()).any(|s| !stations[s].is_expo && is_primary(s, i)))
            .collect();

        let expo_stations = stations.iter().filter(|s| s.is_expo).count();
        let mut manifests = Vec::new();
        let mut reference_lines = 0;

        for (s, station) in stations.iter().enumerate() {
            let primary_items: Vec<Arc<RoutedItem>> = (0..items.len())
                .filter(|&i| is_primary(s, i))
                .map(|i| items[i].clone())
                .collect();

            // Primary somewhere else (expo included), not here
            let reference_items: Vec<Arc<RoutedItem>> = if station.show_reference_items {
                (0..items.len())
                    .filter(|&i| {
                        !is_primary(s, i) && (0..stations.len()).any(|o| o != s && is_primary(o, i))
                    })
                    .map(|i| items[i].clone())
                    .collect()
            } else {
                Vec::new()
            };

            if primary_items.is_empty() && reference_items.is_empty() {
                continue;
            }

            let mut matched_tags: Vec<String> = Vec::new();
            for i in (0..items.len()).filter(|&i| is_primary(s, i)) {
                for tag in &matched[s][i] {
                    if !matched_tags.iter().any(|t| t == tag) {
                        matched_tags.push(tag.to_string());
                    }
                }
            }

            debug!(
                station_id = %station.id,
                primary = primary_items.len(),
                reference = reference_items.len(),
                is_expo = station.is_expo,
                "Built routing manifest"
            );

            reference_lines += reference_items.len();
            manifests.push(RoutingManifest::new(
                Arc::new(Station::clone(station)),
                primary_items,
                reference_items,
                matched_tags,
            ));
        }

        let unrouted_items: Vec<Arc<RoutedItem>> = if expo_stations > 0 {
            Vec::new()
        } else {
            items
                .iter()
                .zip(&prepared)
                .filter(|(_, prepared)| !**prepared)
                .map(|(item, _)| item.clone())
                .collect()
        };

        for item in &unrouted_items {
            warn!(
                order_id = %order.id,
                item_id = %item.id(),
                item_name = %item.ticket_name,
                tags = ?item.tags,
                "Item matches no station"
            );
        }

        let stats = RoutingStats {
            total_items: items.len(),
            routed_items: items.len() - unrouted_items.len(),
            unrouted_items: unrouted_items.len(),
            manifest_count: manifests.len(),
            expo_stations,
            reference_lines,
        };

        debug!(
            order_id = %order.id,
            location_id = %order.location_id,
            stations = stations.len(),
            ?stats,
            "Routing resolved"
        );

        RoutingResult::new(Arc::new(order.clone()), items, manifests, unrouted_items, stats)
    }
}

/// Resolve with the built-in default tag table
pub fn resolve_routing(order: &Order, lines: &[OrderLine], stations: &[Station]) -> RoutingResult {
    RoutingResolver::default().resolve(order, lines, stations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::types::TagSource;
    use shared::models::{Category, CategoryType, MenuItem, OrderItem};

    fn line(id: &str, category_type: CategoryType) -> OrderLine {
        OrderLine::new(
            OrderItem::new(id, id, id),
            MenuItem::new(id, category_type.as_str()),
            Category::new(category_type.as_str(), category_type),
        )
    }

    fn order() -> Order {
        Order::new("o-1", "loc-1", "101", 0)
    }

    fn kitchen() -> Station {
        Station::printer("kitchen", "loc-1", "10.0.0.1", 9100).with_tags(["kitchen", "food"])
    }

    fn bar() -> Station {
        Station::printer("bar", "loc-1", "10.0.0.2", 9100).with_tags(["bar"])
    }

    fn ids(items: &[Arc<RoutedItem>]) -> Vec<&str> {
        items.iter().map(|i| i.id()).collect()
    }

    #[test]
    fn test_routes_by_tag() {
        let lines = vec![
            line("burger", CategoryType::Food),
            line("beer", CategoryType::Drinks),
            line("fries", CategoryType::Food),
        ];
        let result = resolve_routing(&order(), &lines, &[kitchen(), bar()]);

        assert_eq!(result.manifests().len(), 2);
        let k = result.manifest_for("kitchen").unwrap();
        assert_eq!(ids(k.primary_items()), vec!["burger", "fries"]);
        assert_eq!(k.matched_tags(), ["kitchen", "food"]);
        let b = result.manifest_for("bar").unwrap();
        assert_eq!(ids(b.primary_items()), vec!["beer"]);
        assert!(result.unrouted_items().is_empty());
    }

    #[test]
    fn test_item_on_two_stations() {
        let line_station = Station::kds("line", "loc-1").with_tags(["food"]);
        let lines = vec![line("burger", CategoryType::Food)];
        let result = resolve_routing(&order(), &lines, &[kitchen(), line_station]);

        assert_eq!(result.manifests().len(), 2);
        assert_eq!(result.stats().routed_items, 1);
    }

    #[test]
    fn test_unrouted_without_expo() {
        let lines = vec![
            line("burger", CategoryType::Food),
            line("tshirt", CategoryType::Retail),
        ];
        let result = resolve_routing(&order(), &lines, &[kitchen()]);

        assert_eq!(ids(result.unrouted_items()), vec!["tshirt"]);
        assert_eq!(result.stats().unrouted_items, 1);
        assert_eq!(result.stats().routed_items, 1);
    }

    #[test]
    fn test_expo_takes_everything() {
        let expo = Station::kds("pass", "loc-1").expo();
        let lines = vec![
            line("burger", CategoryType::Food),
            line("tshirt", CategoryType::Retail),
        ];
        let result = resolve_routing(&order(), &lines, &[kitchen(), expo]);

        let pass = result.manifest_for("pass").unwrap();
        assert!(pass.is_expo());
        assert_eq!(ids(pass.primary_items()), vec!["burger", "tshirt"]);
        assert!(pass.reference_items().is_empty());
        assert!(result.unrouted_items().is_empty());
        assert_eq!(result.stats().expo_stations, 1);
    }

    #[test]
    fn test_reference_items() {
        let lines = vec![
            line("burger", CategoryType::Food),
            line("beer", CategoryType::Drinks),
            line("tshirt", CategoryType::Retail),
        ];
        let result = resolve_routing(
            &order(),
            &lines,
            &[kitchen().with_reference_items(), bar().with_reference_items()],
        );

        let k = result.manifest_for("kitchen").unwrap();
        assert_eq!(ids(k.reference_items()), vec!["beer"]);
        let b = result.manifest_for("bar").unwrap();
        assert_eq!(ids(b.reference_items()), vec!["burger"]);
        assert_eq!(result.stats().reference_lines, 2);
    }

    #[test]
    fn test_expo_only_item_is_referenced() {
        let expo = Station::kds("pass", "loc-1").expo();
        let lines = vec![
            line("burger", CategoryType::Food),
            line("tshirt", CategoryType::Retail),
        ];
        let result = resolve_routing(&order(), &lines, &[kitchen().with_reference_items(), expo]);

        let k = result.manifest_for("kitchen").unwrap();
        assert_eq!(ids(k.primary_items()), vec!["burger"]);
        assert_eq!(ids(k.reference_items()), vec!["tshirt"]);
        assert!(result.unrouted_items().is_empty());
    }

    #[test]
    fn test_padded_station_tags_match() {
        let k = Station::printer("kitchen", "loc-1", "10.0.0.1", 9100).with_tags([" kitchen "]);
        let lines = vec![line("burger", CategoryType::Food)];
        let result = resolve_routing(&order(), &lines, &[k]);

        let manifest = result.manifest_for("kitchen").unwrap();
        assert_eq!(ids(manifest.primary_items()), vec!["burger"]);
        assert_eq!(manifest.matched_tags(), ["kitchen"]);
    }

    #[test]
    fn test_reference_only_manifest() {
        let lines = vec![line("burger", CategoryType::Food)];
        let result = resolve_routing(&order(), &lines, &[kitchen(), bar().with_reference_items()]);

        let b = result.manifest_for("bar").unwrap();
        assert!(b.primary_items().is_empty());
        assert_eq!(ids(b.reference_items()), vec!["burger"]);
    }

    #[test]
    fn test_no_manifest_for_idle_station() {
        let lines = vec![line("burger", CategoryType::Food)];
        let result = resolve_routing(&order(), &lines, &[kitchen(), bar()]);
        assert!(result.manifest_for("bar").is_none());
        assert_eq!(result.stats().manifest_count, 1);
    }

    #[test]
    fn test_inactive_station_ignored() {
        let mut k = kitchen();
        k.is_active = false;
        let lines = vec![line("burger", CategoryType::Food)];
        let result = resolve_routing(&order(), &lines, &[k]);
        assert!(result.manifests().is_empty());
        assert_eq!(ids(result.unrouted_items()), vec!["burger"]);
    }

    #[test]
    fn test_custom_defaults() {
        let defaults = TagDefaults::default().with_override(CategoryType::Drinks, ["kitchen"]);
        let resolver = RoutingResolver::new(defaults);
        let lines = vec![line("soda", CategoryType::Drinks)];
        let result = resolver.resolve(&order(), &lines, &[kitchen(), bar()]);

        let k = result.manifest_for("kitchen").unwrap();
        assert_eq!(k.primary_items()[0].tag_source, TagSource::Default);
        assert!(result.manifest_for("bar").is_none());
    }

    #[test]
    fn test_resend_count_is_max_of_primary() {
        let mut first = line("burger", CategoryType::Food);
        first.item.resend_count = 1;
        let mut second = line("fries", CategoryType::Food);
        second.item.resend_count = 2;
        let result = resolve_routing(&order(), &[first, second], &[kitchen()]);
        assert_eq!(result.manifests()[0].resend_count(), 2);
    }
}
