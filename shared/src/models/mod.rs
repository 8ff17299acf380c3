//! Data models
//!
//! Snapshots handed to the router by the configuration and order layers.
//! All IDs are opaque strings; timestamps are Unix epoch milliseconds.

pub mod category;
pub mod menu_item;
pub mod order;
pub mod print_config;
pub mod print_job;
pub mod station;

// Re-exports
pub use category::*;
pub use menu_item::*;
pub use order::*;
pub use print_config::*;
pub use print_job::*;
pub use station::*;
