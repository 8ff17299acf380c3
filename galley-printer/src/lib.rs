//! # galley-printer
//!
//! ESC/POS ticket printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - Command tables per printer class (thermal, impact/dot-matrix)
//! - Capability-aware document building (cut, second colour, paper width)
//! - ASCII and GBK text encoding
//! - Network printing (TCP port 9100)
//!
//! Business logic (WHAT to print) stays in application code:
//! - Kitchen ticket rendering and routing → galley-router
//!
//! ## Example
//!
//! ```ignore
//! use galley_printer::{CapabilityProfile, CharSize, EscPosBuilder, NetworkPrinter, Printer};
//!
//! let mut builder = EscPosBuilder::new(CapabilityProfile::impact(40));
//! builder.center();
//! builder.size(CharSize::Double);
//! builder.line("GRILL");
//! builder.reset_size();
//! builder.sep_char('=');
//! builder.left();
//! builder.line("Table 12");
//! builder.cut();
//!
//! let printer = NetworkPrinter::new("192.168.1.100", 9100)?;
//! printer.print(&builder.build()).await?;
//! ```

mod commands;
mod encoding;
mod error;
mod escpos;
mod printer;

// Re-exports
pub use commands::{
    Align, CapabilityProfile, CharSize, CommandSet, ImpactCommands, PrinterClass,
    ThermalCommands,
};
pub use encoding::{
    Encoding, convert_to_ascii, convert_to_gbk, gbk_width, text_width, truncate_to_width,
};
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use printer::{DEFAULT_TIMEOUT, NetworkPrinter, Printer};
