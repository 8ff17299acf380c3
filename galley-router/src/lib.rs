//! Galley Router - order routing and ticket dispatch
//!
//! # Overview
//!
//! When an order is sent to the kitchen, every item is tagged (item >
//! category > default), matched against the tags of the location's active
//! stations, and grouped into one manifest per station. Each manifest is then
//! rendered for its station and delivered concurrently:
//!
//! ```text
//! Order ──▶ routing::resolve_routing ──▶ RoutingResult
//!                                            │
//!                              printing::Dispatcher::dispatch
//!                         ┌──────────────────┼──────────────────┐
//!                         ▼                  ▼                  ▼
//!                 ESC/POS over TCP     ESC/POS over TCP    KdsChannel
//!                   (thermal)            (impact)          (screens)
//! ```
//!
//! # Modules
//!
//! ```text
//! galley-router/src/
//! ├── core/       # configuration, engine state
//! ├── routing/    # tags, station registry, resolver
//! ├── printing/   # renderer, KDS payload, dispatcher, failover, print jobs
//! ├── message/    # KDS publish/subscribe channel
//! └── utils/      # logging
//! ```

pub mod core;
pub mod message;
pub mod printing;
pub mod routing;
pub mod utils;

pub use core::{DispatchConfig, EngineState, SendOutcome, init_from_env};
pub use message::{KdsChannel, KdsEnvelope, KdsSubscriber, KdsSubscription};
pub use printing::{
    DeliveryError, Dispatcher, FailoverCoordinator, OutcomeDiagnostics, OutcomeLogger,
    PrintJobStore, PrinterConnector, TcpPrinterConnector, TicketRenderer,
};
pub use routing::{
    OrderLine, RoutingManifest, RoutingResolver, RoutingResult, StationRegistry, TagDefaults,
    resolve_routing,
};

pub use utils::logger::{init_logger, init_logger_from, init_logger_with_file};
