//! Kitchen ticket renderer
//!
//! Renders one routing manifest into ESC/POS bytes for the manifest's
//! station. The layout is fixed; the station's print configuration decides
//! which elements appear and how they are styled, and its capability profile
//! decides which command bytes are used.

use chrono_tz::Tz;
use galley_printer::{
    Align, CapabilityProfile, CharSize, Encoding, EscPosBuilder, truncate_to_width,
};
use shared::models::{
    Alignment, AtomicPrintConfig, ElementStyle, Order, OrderModifier, PreModifier,
    PrinterCapability, PrinterType, Station, TextEncoding, TextSize,
};

use crate::routing::{RoutedItem, RoutingManifest};

/// Kitchen ticket renderer
///
/// Timestamps are printed in the configured timezone.
#[derive(Debug, Clone, Copy)]
pub struct TicketRenderer {
    timezone: Tz,
}

impl TicketRenderer {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Render a manifest to printer-ready bytes
    pub fn render(&self, order: &Order, manifest: &RoutingManifest) -> Vec<u8> {
        let station = manifest.station();
        let cfg = &station.print_config;
        let mut b = EscPosBuilder::new(capability_profile(&station.capability));

        self.render_header(&mut b, station, manifest);
        b.sep_char(cfg.divider_char);

        self.render_identity(&mut b, order, cfg);
        b.sep_char(cfg.divider_char);

        for item in manifest.primary_items() {
            self.render_item(&mut b, item, cfg);
        }

        if !manifest.reference_items().is_empty() && cfg.reference_item.enabled {
            self.render_reference(&mut b, manifest.reference_items(), cfg);
        }

        b.sep_char(cfg.divider_char);
        let footer = format!(
            "{} {} - {}",
            manifest.item_count(),
            if manifest.item_count() == 1 { "ITEM" } else { "ITEMS" },
            station.name
        );
        styled_line(&mut b, &cfg.footer, &footer);

        b.cut();
        b.build()
    }

    fn render_header(&self, b: &mut EscPosBuilder, station: &Station, manifest: &RoutingManifest) {
        let cfg = &station.print_config;
        let title = if manifest.is_expo() {
            format!("{} (EXPO)", station.name)
        } else {
            station.name.clone()
        };
        styled_line(b, &cfg.station_header, &title);

        let resend = manifest.resend_count();
        if resend > 0 {
            b.center();
            b.highlight();
            b.bold();
            b.double_height();
            b.line(&format!("*** RESEND #{} ***", resend));
            b.reset_size();
            b.bold_off();
            b.highlight_off();
            b.left();
        }
    }

    fn render_identity(&self, b: &mut EscPosBuilder, order: &Order, cfg: &AtomicPrintConfig) {
        styled_line(b, &cfg.order_number, &order.order_number);

        let mut service = order.order_type.label().to_string();
        if let Some(table) = order.table_name.as_deref().filter(|t| !t.is_empty()) {
            service.push_str(&format!(" - Table {}", table));
        } else if let Some(tab) = order.tab_name.as_deref().filter(|t| !t.is_empty()) {
            service.push_str(&format!(" - Tab {}", tab));
        }
        styled_line(b, &cfg.order_info, &service);

        if let Some(server) = order.server_name.as_deref().filter(|s| !s.is_empty()) {
            styled_line(b, &cfg.order_info, &format!("Server: {}", server));
        }
        styled_line(
            b,
            &cfg.order_info,
            &format_timestamp(order.created_at, self.timezone),
        );
    }

    fn render_item(&self, b: &mut EscPosBuilder, routed: &RoutedItem, cfg: &AtomicPrintConfig) {
        let item = &routed.item;
        styled_line(
            b,
            &cfg.item_name,
            &format!("{}x {}", item.quantity, routed.ticket_name),
        );

        let mut context = Vec::new();
        if let Some(seat) = item.seat {
            context.push(format!("Seat {}", seat));
        }
        if let Some(course) = item.course {
            context.push(format!("Course {}", course));
        }
        if let Some(table) = item.source_table.as_deref().filter(|t| !t.is_empty()) {
            context.push(format!("From {}", table));
        }
        if !context.is_empty() {
            b.line(&format!("   {}", context.join(" | ")));
        }

        if cfg.modifier.enabled {
            for modifier in &item.modifiers {
                render_modifier(b, modifier, 1, &cfg.modifier);
            }
        }

        // Ingredient removals are allergy call-outs, printed regardless of
        // the modifier element setting
        for modification in &item.ingredient_modifications {
            let text = format!("   {}", modification.display_text());
            if modification.is_removal() {
                b.highlight();
                b.bold();
                b.line(&text);
                b.bold_off();
                b.highlight_off();
            } else {
                b.line(&text);
            }
        }

        if let Some(note) = item.special_notes.as_deref().filter(|n| !n.trim().is_empty()) {
            b.highlight();
            b.bold();
            b.line(&format!("   ** {}", note));
            b.bold_off();
            b.highlight_off();
        }
    }

    fn render_reference(
        &self,
        b: &mut EscPosBuilder,
        items: &[std::sync::Arc<RoutedItem>],
        cfg: &AtomicPrintConfig,
    ) {
        b.sep_char(cfg.divider_char);
        b.align(map_align(cfg.reference_item.alignment));
        b.line(&cfg.reference_header);
        b.left();
        for routed in items {
            let text = format!("{}x {}", routed.item.quantity, routed.ticket_name);
            styled_line(b, &cfg.reference_item, &text);
        }
    }
}

impl Default for TicketRenderer {
    fn default() -> Self {
        Self::new(chrono_tz::UTC)
    }
}

/// Translate a station's stored capability into a printer profile
pub fn capability_profile(capability: &PrinterCapability) -> CapabilityProfile {
    let mut profile = match capability.printer_type {
        PrinterType::Thermal => CapabilityProfile::thermal(capability.paper_width),
        PrinterType::Impact => CapabilityProfile::impact(capability.paper_width),
    };
    if !capability.supports_cut {
        profile = profile.without_cut();
    }
    if capability.second_color {
        profile = profile.with_second_color();
    }
    profile.with_encoding(match capability.encoding {
        TextEncoding::Ascii => Encoding::Ascii,
        TextEncoding::Gbk => Encoding::Gbk,
    })
}

fn render_modifier(b: &mut EscPosBuilder, modifier: &OrderModifier, depth: usize, style: &ElementStyle) {
    let text = format!("{}{}", "  ".repeat(depth + 1), style.decorate(&modifier.display_text()));
    let call_out = modifier.pre_modifier == Some(PreModifier::No);

    b.align(map_align(style.alignment));
    b.size(map_size(style.size));
    if call_out {
        b.highlight();
    }
    if style.emphasis || call_out {
        b.bold();
    }
    b.line(&text);
    if style.emphasis || call_out {
        b.bold_off();
    }
    if call_out {
        b.highlight_off();
    }
    b.reset_size();
    b.left();

    for child in &modifier.children {
        render_modifier(b, child, depth + 1, style);
    }
}

/// Print one configured element, skipping it when disabled
///
/// The line is cut to what fits on the paper at the element's size.
fn styled_line(b: &mut EscPosBuilder, style: &ElementStyle, text: &str) {
    if !style.enabled {
        return;
    }
    let decorated = style.decorate(text);
    let fitted = truncate_to_width(
        &decorated,
        columns(b.width(), style.size),
        b.profile().encoding,
    );

    b.align(map_align(style.alignment));
    b.size(map_size(style.size));
    if style.emphasis {
        b.bold();
    }
    b.line(fitted);
    if style.emphasis {
        b.bold_off();
    }
    b.reset_size();
    b.left();
}

/// Character cells per line at a given text size
fn columns(width: usize, size: TextSize) -> usize {
    match size {
        TextSize::DoubleWidth | TextSize::Double => width / 2,
        TextSize::Normal | TextSize::DoubleHeight => width,
    }
}

fn map_align(alignment: Alignment) -> Align {
    match alignment {
        Alignment::Left => Align::Left,
        Alignment::Center => Align::Center,
        Alignment::Right => Align::Right,
    }
}

fn map_size(size: TextSize) -> CharSize {
    match size {
        TextSize::Normal => CharSize::Normal,
        TextSize::DoubleHeight => CharSize::DoubleHeight,
        TextSize::DoubleWidth => CharSize::DoubleWidth,
        TextSize::Double => CharSize::Double,
    }
}

/// Format unix timestamp (millis) as "MM-DD HH:MM:SS" in the given timezone
pub fn format_timestamp(ts: i64, tz: Tz) -> String {
    if let Some(dt) = chrono::DateTime::from_timestamp_millis(ts) {
        dt.with_timezone(&tz).format("%m-%d %H:%M:%S").to_string()
    } else {
        "TIME UNKNOWN".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{OrderLine, resolve_routing};
    use shared::models::{
        Category, CategoryType, IngredientAction, IngredientModification, MenuItem, OrderItem,
    };

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn text(data: &[u8]) -> String {
        String::from_utf8_lossy(data).to_string()
    }

    fn burger_line() -> OrderLine {
        let mut item = OrderItem::new("i-1", "burger", "Burger");
        item.quantity = 2;
        item.seat = Some(3);
        item.modifiers = vec![
            OrderModifier::new("Onions").with_pre(PreModifier::No),
            OrderModifier::new("Add Cheese").with_child(OrderModifier::new("Cheddar")),
        ];
        item.ingredient_modifications = vec![IngredientModification {
            ingredient: "Peanuts".to_string(),
            action: IngredientAction::No,
        }];
        item.special_notes = Some("Allergy table".to_string());

        let mut menu = MenuItem::new("burger", "mains");
        menu.kitchen_name = Some("BRGR".to_string());
        OrderLine::new(item, menu, Category::new("mains", CategoryType::Food))
    }

    fn order() -> Order {
        // 2024-01-22 08:32:15 UTC
        Order::new("o-1", "loc-1", "1042", 1705912335000)
            .with_table("12")
            .with_server("Ana")
    }

    fn render_for(station: Station) -> Vec<u8> {
        let result = resolve_routing(&order(), &[burger_line()], &[station]);
        TicketRenderer::default().render(result.order(), &result.manifests()[0])
    }

    #[test]
    fn test_ticket_layout() {
        let station = Station::printer("grill", "loc-1", "10.0.0.1", 9100)
            .with_name("GRILL")
            .with_tags(["kitchen"]);
        let data = render_for(station);
        let s = text(&data);

        assert!(s.contains("GRILL\n"));
        assert!(s.contains("#1042\n"));
        assert!(s.contains("DINE IN - Table 12\n"));
        assert!(s.contains("Server: Ana\n"));
        assert!(s.contains("01-22 08:32:15\n"));
        assert!(s.contains("2x BRGR\n"));
        assert!(s.contains("Seat 3"));
        assert!(s.contains("    NO Onions\n"));
        assert!(s.contains("      Cheddar\n"));
        assert!(s.contains("NO Peanuts\n"));
        assert!(s.contains("** Allergy table\n"));
        assert!(s.contains("1 ITEM - GRILL\n"));
        assert!(!s.contains("RESEND"));

        // Header precedes order number, which precedes the item
        let header = s.find("GRILL\n").unwrap();
        let number = s.find("#1042").unwrap();
        let item = s.find("2x BRGR").unwrap();
        assert!(header < number && number < item);

        assert!(contains(&data, &[0x1D, 0x56, 0x42, 3]));
    }

    #[test]
    fn test_impact_without_cut() {
        let capability = PrinterCapability {
            printer_type: PrinterType::Impact,
            paper_width: 40,
            supports_cut: false,
            ..Default::default()
        };
        let station = Station::printer("bar", "loc-1", "10.0.0.2", 9100)
            .with_tags(["kitchen"])
            .with_capability(capability);
        let data = render_for(station);

        assert!(!data.contains(&0x1D));
        assert!(!contains(&data, &[0x1B, 0x69]));
        assert!(contains(&data, &[0x1B, 0x47, 0x01]));
    }

    #[test]
    fn test_highlight_on_second_colour() {
        let capability = PrinterCapability {
            printer_type: PrinterType::Impact,
            second_color: true,
            ..Default::default()
        };
        let station = Station::printer("bar", "loc-1", "10.0.0.2", 9100)
            .with_tags(["kitchen"])
            .with_capability(capability);
        let data = render_for(station);
        assert!(contains(&data, &[0x1B, 0x72, 0x01]));
    }

    #[test]
    fn test_resend_banner() {
        let mut line = burger_line();
        line.item.resend_count = 2;
        let station = Station::printer("grill", "loc-1", "10.0.0.1", 9100).with_tags(["kitchen"]);
        let result = resolve_routing(&order(), &[line], &[station]);
        let s = text(&TicketRenderer::default().render(result.order(), &result.manifests()[0]));
        assert!(s.contains("*** RESEND #2 ***"));
    }

    #[test]
    fn test_disabled_elements_are_skipped() {
        let mut station =
            Station::printer("grill", "loc-1", "10.0.0.1", 9100).with_tags(["kitchen"]);
        station.print_config.order_info = ElementStyle::default().disabled();
        station.print_config.modifier = ElementStyle::default().disabled();
        let s = text(&render_for(station));

        assert!(!s.contains("Server: Ana"));
        assert!(!s.contains("Onions"));
        // Allergy removals stay
        assert!(s.contains("NO Peanuts"));
    }

    #[test]
    fn test_reference_section() {
        let grill = Station::printer("grill", "loc-1", "10.0.0.1", 9100)
            .with_tags(["grill"])
            .with_reference_items();
        let lines = vec![
            burger_line(),
            OrderLine::new(
                OrderItem::new("i-2", "steak", "Steak"),
                MenuItem::new("steak", "mains").with_route_tags(["grill"]),
                Category::new("mains", CategoryType::Food),
            ),
        ];
        let kitchen = Station::printer("kitchen", "loc-1", "10.0.0.3", 9100).with_tags(["kitchen"]);
        let result = resolve_routing(&order(), &lines, &[grill, kitchen]);
        let manifest = result.manifest_for("grill").unwrap();
        let s = text(&TicketRenderer::default().render(result.order(), manifest));

        let header = s.find("ALSO ON THIS ORDER").unwrap();
        assert!(s.find("1x Steak").unwrap() < header);
        assert!(s[header..].contains("2x BRGR"));
    }

    #[test]
    fn test_long_names_fit_the_paper() {
        let long = "Slow Roasted Pork Shoulder With Apple Cider Glaze";
        let menu = MenuItem {
            name: long.to_string(),
            ..MenuItem::new("pork", "mains")
        };
        let line = OrderLine::new(
            OrderItem::new("i-1", "pork", long),
            menu,
            Category::new("mains", CategoryType::Food),
        );
        let mut station = Station::printer("grill", "loc-1", "10.0.0.1", 9100)
            .with_name("Charcoal Grill And Smokehouse Station")
            .with_tags(["kitchen"]);
        station.capability.paper_width = 32;
        let result = resolve_routing(&order(), &[line], &[station]);
        let s = text(&TicketRenderer::default().render(result.order(), &result.manifests()[0]));

        // Item name prints at double height only, header at double size
        assert!(s.contains("1x Slow Roasted Pork Shoulder Wi\n"));
        assert!(!s.contains(long));
        assert!(s.contains("Charcoal Grill A\n"));
    }

    #[test]
    fn test_columns_by_size() {
        assert_eq!(columns(48, TextSize::Normal), 48);
        assert_eq!(columns(48, TextSize::DoubleHeight), 48);
        assert_eq!(columns(48, TextSize::Double), 24);
        assert_eq!(columns(33, TextSize::DoubleWidth), 16);
    }

    #[test]
    fn test_timezone() {
        let renderer = TicketRenderer::new(chrono_tz::Asia::Shanghai);
        assert_eq!(format_timestamp(1705912335000, renderer.timezone()), "01-22 16:32:15");
    }
}
