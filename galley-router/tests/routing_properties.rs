//! Routing behaviour across realistic station layouts

use std::collections::HashSet;

use galley_router::routing::{OrderLine, RoutingResult, TagSource, resolve_routing};
use shared::models::{Category, CategoryType, MenuItem, Order, OrderItem, Station};

fn line(id: &str, category_type: CategoryType) -> OrderLine {
    OrderLine::new(
        OrderItem::new(id, id, id),
        MenuItem::new(id, "cat"),
        Category::new("cat", category_type),
    )
}

fn tagged_line(id: &str, item_tags: &[&str], category_tags: &[&str]) -> OrderLine {
    let mut menu = MenuItem::new(id, "cat");
    if !item_tags.is_empty() {
        menu = menu.with_route_tags(item_tags.iter().copied());
    }
    OrderLine::new(
        OrderItem::new(id, id, id),
        menu,
        Category::new("cat", CategoryType::Food).with_route_tags(category_tags.iter().copied()),
    )
}

fn order() -> Order {
    Order::new("order-1", "loc-1", "55", 0)
}

fn printer(id: &str, tags: &[&str]) -> Station {
    Station::printer(id, "loc-1", "10.0.0.1", 9100).with_tags(tags.iter().copied())
}

fn mixed_order() -> Vec<OrderLine> {
    vec![
        line("burger", CategoryType::Food),
        line("ipa", CategoryType::Drinks),
        line("margherita", CategoryType::Pizza),
        line("whisky", CategoryType::Liquor),
        line("gift-card", CategoryType::Retail),
        line("bowling", CategoryType::Entertainment),
    ]
}

/// Each item is either routed somewhere or reported unrouted, never both
fn assert_partitioned(lines: &[OrderLine], result: &RoutingResult) {
    let routed: HashSet<&str> = result
        .manifests()
        .iter()
        .flat_map(|m| m.primary_items().iter().map(|i| i.id()))
        .collect();
    let unrouted: HashSet<&str> = result.unrouted_items().iter().map(|i| i.id()).collect();

    assert!(routed.is_disjoint(&unrouted));
    let all: HashSet<&str> = routed.union(&unrouted).copied().collect();
    let expected: HashSet<&str> = lines.iter().map(|l| l.item.id.as_str()).collect();
    assert_eq!(all, expected);
}

#[test]
fn every_item_is_routed_or_unrouted() {
    let lines = mixed_order();
    let layouts = vec![
        vec![],
        vec![printer("kitchen", &["kitchen"])],
        vec![printer("kitchen", &["kitchen"]), printer("bar", &["bar"])],
        vec![
            printer("kitchen", &["kitchen", "food"]),
            printer("line", &["food"]),
            printer("pizza", &["pizza"]),
        ],
        vec![printer("bar", &["bar"]), Station::kds("pass", "loc-1").expo()],
    ];

    for stations in layouts {
        let result = resolve_routing(&order(), &lines, &stations);
        assert_partitioned(&lines, &result);
        assert_eq!(
            result.stats().routed_items + result.stats().unrouted_items,
            lines.len()
        );
    }
}

#[test]
fn expo_receives_full_order() {
    let lines = mixed_order();
    let stations = vec![
        printer("kitchen", &["kitchen"]),
        Station::kds("pass", "loc-1").expo().with_reference_items(),
    ];
    let result = resolve_routing(&order(), &lines, &stations);

    let expo = result.manifest_for("pass").unwrap();
    let ids: Vec<&str> = expo.primary_items().iter().map(|i| i.id()).collect();
    let expected: Vec<&str> = lines.iter().map(|l| l.item.id.as_str()).collect();
    assert_eq!(ids, expected);
    assert!(expo.reference_items().is_empty());
    assert!(result.unrouted_items().is_empty());
}

#[test]
fn item_only_at_expo_is_referenced_elsewhere() {
    let lines = vec![
        line("burger", CategoryType::Food),
        line("tshirt", CategoryType::Retail),
    ];
    let stations = vec![
        printer("kitchen", &["kitchen", "food"]).with_reference_items(),
        Station::kds("pass", "loc-1").expo(),
    ];
    let result = resolve_routing(&order(), &lines, &stations);

    let kitchen = result.manifest_for("kitchen").unwrap();
    let primary: Vec<&str> = kitchen.primary_items().iter().map(|i| i.id()).collect();
    let reference: Vec<&str> = kitchen.reference_items().iter().map(|i| i.id()).collect();
    assert_eq!(primary, vec!["burger"]);
    assert_eq!(reference, vec!["tshirt"]);
    assert!(result.unrouted_items().is_empty());
}

#[test]
fn explicit_item_tags_beat_category() {
    let lines = vec![tagged_line("special", &["grill"], &["kitchen"])];
    let result = resolve_routing(
        &order(),
        &lines,
        &[printer("grill", &["grill"]), printer("kitchen", &["kitchen"])],
    );

    assert!(result.manifest_for("kitchen").is_none());
    let item = &result.manifest_for("grill").unwrap().primary_items()[0];
    assert_eq!(item.tag_source, TagSource::Item);
    assert_eq!(item.tags, vec!["grill"]);
}

#[test]
fn category_tags_used_when_item_has_none() {
    let lines = vec![tagged_line("soup", &[], &["soup"])];
    let result = resolve_routing(&order(), &lines, &[printer("soup", &["soup"])]);
    let item = &result.manifests()[0].primary_items()[0];
    assert_eq!(item.tag_source, TagSource::Category);
}

#[test]
fn pizza_defaults_to_pizza_tag() {
    let lines = vec![line("margherita", CategoryType::Pizza)];
    let result = resolve_routing(&order(), &lines, &[printer("oven", &["pizza"])]);

    let item = &result.manifests()[0].primary_items()[0];
    assert_eq!(item.tags, vec!["pizza"]);
    assert_eq!(item.tag_source, TagSource::Default);
}

#[test]
fn reference_items_cross_between_kitchen_and_bar() {
    let lines = vec![
        line("burger", CategoryType::Food),
        line("ipa", CategoryType::Drinks),
    ];
    let a = printer("a", &["kitchen", "food"]).with_reference_items();
    let b = printer("b", &["bar"]).with_reference_items();
    let result = resolve_routing(&order(), &lines, &[a, b]);

    let a = result.manifest_for("a").unwrap();
    let b = result.manifest_for("b").unwrap();
    assert_eq!(a.primary_items()[0].id(), "burger");
    assert_eq!(a.reference_items()[0].id(), "ipa");
    assert_eq!(b.primary_items()[0].id(), "ipa");
    assert_eq!(b.reference_items()[0].id(), "burger");
    assert_eq!(result.stats().reference_lines, 2);
}

#[test]
fn reference_never_overlaps_primary() {
    let lines = mixed_order();
    let stations = vec![
        printer("kitchen", &["kitchen", "bar"]).with_reference_items(),
        printer("bar", &["bar"]).with_reference_items(),
        printer("pizza", &["pizza", "food"]).with_reference_items(),
    ];
    let result = resolve_routing(&order(), &lines, &stations);

    for manifest in result.manifests() {
        let primary: HashSet<&str> = manifest.primary_items().iter().map(|i| i.id()).collect();
        assert!(
            manifest
                .reference_items()
                .iter()
                .all(|r| !primary.contains(r.id())),
            "overlap on {}",
            manifest.station().id
        );
    }
}

#[test]
fn manifest_order_follows_entry_sequence() {
    let lines = vec![
        line("fries", CategoryType::Food),
        line("ipa", CategoryType::Drinks),
        line("burger", CategoryType::Food),
        line("salad", CategoryType::Food),
    ];
    let result = resolve_routing(&order(), &lines, &[printer("kitchen", &["kitchen"])]);

    let manifest = &result.manifests()[0];
    let ids: Vec<&str> = manifest.primary_items().iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec!["fries", "burger", "salad"]);
    let seq: Vec<usize> = manifest.primary_items().iter().map(|i| i.sequence).collect();
    assert!(seq.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn idle_station_gets_no_manifest() {
    let lines = vec![line("burger", CategoryType::Food)];
    let result = resolve_routing(
        &order(),
        &lines,
        &[printer("kitchen", &["kitchen"]), printer("bar", &["bar"])],
    );

    assert_eq!(result.manifests().len(), 1);
    assert!(result.manifest_for("bar").is_none());
    assert!(
        result
            .manifests()
            .iter()
            .all(|m| !m.primary_items().is_empty() || !m.reference_items().is_empty())
    );
}

#[test]
fn no_stations_leaves_everything_unrouted() {
    let lines = mixed_order();
    let result = resolve_routing(&order(), &lines, &[]);

    assert!(result.manifests().is_empty());
    assert_eq!(result.unrouted_items().len(), lines.len());
    assert_eq!(result.stats().manifest_count, 0);
}

#[test]
fn rebuild_keeps_items_and_swaps_station() {
    let lines = vec![line("ipa", CategoryType::Drinks)];
    let result = resolve_routing(&order(), &lines, &[printer("bar", &["bar"])]);
    let manifest = &result.manifests()[0];

    let backup = printer("kitchen", &["kitchen"]);
    let rebuilt = manifest.rebuild_for(&backup);
    assert_eq!(rebuilt.station().id, "kitchen");
    assert_eq!(rebuilt.primary_items(), manifest.primary_items());
    assert_eq!(manifest.station().id, "bar");
}
