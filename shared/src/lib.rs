//! Shared types for the Galley ticket routing engine
//!
//! Read-only snapshot models consumed by the router (menu items, categories,
//! stations, orders) and the audit types it produces (print jobs, print
//! results). Persistence of the menu and station configuration lives
//! elsewhere; these types only describe what gets loaded.

pub mod models;
pub mod validation;

// Re-exports
pub use models::*;
pub use serde::{Deserialize, Serialize};
pub use validation::{ValidationError, ValidationResult};
