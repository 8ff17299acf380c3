//! Order routing
//!
//! - **tags**: item > category > default tag resolution
//! - **registry**: station snapshot per location
//! - **resolver**: items → per-station manifests

mod registry;
mod resolver;
mod tags;
mod types;

pub use registry::StationRegistry;
pub use resolver::{RoutingResolver, resolve_routing};
pub use tags::{TagDefaults, normalize_tags, resolve_tags};
pub use types::{
    OrderLine, ResolvedTags, RoutedItem, RoutingManifest, RoutingResult, RoutingStats, TagSource,
};
