//! Ticket building and delivery
//!
//! - Printers: manifest → ESC/POS bytes → TCP
//! - KDS screens: manifest → `KdsTicket` → broadcast channel
//! - Every attempt is recorded as a `PrintJob`; failed printers may fail
//!   over to a backup station

pub mod connector;
pub mod executor;
pub mod failover;
pub mod kds;
pub mod outcome;
pub mod renderer;
pub mod storage;

pub use connector::{PrinterConnector, TcpPrinterConnector};
pub use executor::{DeliveryError, DeliveryResult, Dispatcher};
pub use failover::{FailoverCoordinator, FailoverDecision};
pub use kds::{KdsIngredientNote, KdsItem, KdsItemStatus, KdsModifier, KdsReferenceItem, KdsTicket};
pub use outcome::{OutcomeDiagnostics, OutcomeLogger};
pub use renderer::{TicketRenderer, capability_profile, format_timestamp};
pub use storage::{
    HardwareRecord, PrintJobStore, PrintJobStoreError, PrintJobStoreResult, PrintJobStoreStats,
};
