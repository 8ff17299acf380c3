//! Printer adapters for sending ESC/POS data
//!
//! Supports network printers (raw TCP, usually port 9100).

use crate::error::{PrintError, PrintResult};
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

/// Default bound on connect and on write
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
}

/// Network printer (raw TCP)
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let addr_str = format!("{}:{}", host, port);
        Self::from_addr(&addr_str)
    }

    /// Create from a socket address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;

        Ok(Self {
            addr,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Set connect/write timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn connect_error(&self, e: std::io::Error) -> PrintError {
        let msg = format!("{}: {}", self.addr, e);
        match e.kind() {
            ErrorKind::ConnectionRefused => PrintError::Refused(msg),
            ErrorKind::HostUnreachable | ErrorKind::NetworkUnreachable => {
                PrintError::Unreachable(msg)
            }
            _ => PrintError::Connection(msg),
        }
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| self.connect_error(e))?;

        let write = async {
            stream.write_all(data).await?;
            stream.flush().await?;
            stream.shutdown().await
        };

        tokio::time::timeout(self.timeout, write)
            .await
            .map_err(|_| PrintError::Timeout(format!("Write timeout: {}", self.addr)))?
            .map_err(|e| {
                PrintError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Write failed: {}", e),
                ))
            })?;

        info!("Print job sent successfully");
        Ok(())
    }

    #[instrument(fields(addr = %self.addr))]
    async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        match tokio::time::timeout(check_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => {
                info!("Printer online");
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_network_printer_new() {
        let printer = NetworkPrinter::new("192.168.1.100", 9100).unwrap();
        assert_eq!(printer.addr().port(), 9100);
    }

    #[test]
    fn test_invalid_addr() {
        let result = NetworkPrinter::from_addr("invalid");
        assert!(matches!(result, Err(PrintError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_print_writes_all_bytes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let reader = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            sock.read_to_end(&mut buf).await.unwrap();
            buf
        });

        let printer = NetworkPrinter::from_addr(&addr.to_string()).unwrap();
        printer.print(b"\x1b@ticket").await.unwrap();

        assert_eq!(reader.await.unwrap(), b"\x1b@ticket");
    }

    #[tokio::test]
    async fn test_refused_is_typed() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let printer = NetworkPrinter::from_addr(&addr.to_string())
            .unwrap()
            .with_timeout(Duration::from_millis(500));
        let err = printer.print(b"x").await.unwrap_err();
        assert!(matches!(err, PrintError::Refused(_)), "got {err:?}");
        assert!(err.is_transport());
        assert!(!printer.is_online().await);
    }
}
