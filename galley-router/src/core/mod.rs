//! Core module - configuration and engine state
//!
//! - [`DispatchConfig`] - environment-driven configuration
//! - [`EngineState`] - registry, resolver and dispatcher wired together

pub mod config;
pub mod state;

pub use config::{DispatchConfig, init_from_env};
pub use state::{EngineState, SendOutcome};
