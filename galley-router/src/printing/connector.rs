//! Printer connector seam
//!
//! The dispatcher never opens sockets itself; it hands rendered bytes to a
//! `PrinterConnector`. Production uses raw TCP via `galley_printer`.

use std::time::Duration;

use async_trait::async_trait;
use galley_printer::{DEFAULT_TIMEOUT, NetworkPrinter, PrintResult, Printer};

#[async_trait]
pub trait PrinterConnector: Send + Sync {
    /// Deliver one rendered ticket to `ip:port`
    async fn send(&self, ip: &str, port: u16, data: &[u8]) -> PrintResult<()>;
}

/// Raw TCP (port 9100 style) connector
#[derive(Debug, Clone, Copy)]
pub struct TcpPrinterConnector {
    timeout: Duration,
}

impl TcpPrinterConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for TcpPrinterConnector {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl PrinterConnector for TcpPrinterConnector {
    async fn send(&self, ip: &str, port: u16, data: &[u8]) -> PrintResult<()> {
        let printer = NetworkPrinter::new(ip, port)?.with_timeout(self.timeout);
        printer.print(data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galley_printer::PrintError;

    #[tokio::test]
    async fn test_invalid_ip_is_config_error() {
        let connector = TcpPrinterConnector::default();
        let err = connector.send("not-an-ip", 9100, b"x").await.unwrap_err();
        assert!(matches!(err, PrintError::InvalidConfig(_)));
        assert!(!err.is_transport());
    }
}
