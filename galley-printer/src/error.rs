//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Printer actively refused the connection
    #[error("Connection refused: {0}")]
    Refused(String),

    /// No route to the printer
    #[error("Host unreachable: {0}")]
    Unreachable(String),

    /// Any other connect failure
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl PrintError {
    /// Network failures that a backup printer may succeed on
    pub fn is_transport(&self) -> bool {
        !matches!(self, PrintError::InvalidConfig(_))
    }
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
