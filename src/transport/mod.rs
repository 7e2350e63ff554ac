//! # Printer Transport Layer
//!
//! This module provides the ports receipts are written to.
//!
//! ## Available Ports
//!
//! - [`BluetoothTransport`]: RFCOMM serial device (Linux)
//! - [`UnavailablePort`]: stands in when no printer can be reached
//! - [`MemoryPort`]: captures bytes for dry runs and tests
//!
//! Pick one with [`select_port`] at startup and hand it to the print flow;
//! the flow never needs to know which one it got.

pub mod bluetooth;

pub use bluetooth::BluetoothTransport;

use tracing::warn;

use crate::error::PrintError;

/// Something receipt bytes can be written to.
pub trait PrinterPort {
    /// Short description for logs.
    fn name(&self) -> &str;

    /// Whether writes can succeed at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Send a complete print job.
    fn write_all(&mut self, data: &[u8]) -> Result<(), PrintError>;
}

impl PrinterPort for BluetoothTransport {
    fn name(&self) -> &str {
        self.device()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), PrintError> {
        BluetoothTransport::write_all(self, data)
    }
}

/// Port used when no printer is reachable. Every write fails.
#[derive(Debug, Clone)]
pub struct UnavailablePort {
    reason: String,
}

impl UnavailablePort {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl PrinterPort for UnavailablePort {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn write_all(&mut self, _data: &[u8]) -> Result<(), PrintError> {
        Err(PrintError::Unavailable(self.reason.clone()))
    }
}

/// Port that keeps everything written to it.
#[derive(Debug, Clone, Default)]
pub struct MemoryPort {
    data: Vec<u8>,
    jobs: usize,
}

impl MemoryPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// All bytes written so far.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of `write_all` calls.
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl PrinterPort for MemoryPort {
    fn name(&self) -> &str {
        "memory"
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), PrintError> {
        self.data.extend_from_slice(data);
        self.jobs += 1;
        Ok(())
    }
}

/// Choose the port for this run.
///
/// Opens the Bluetooth device when one is given; if that fails, or no
/// device is configured, the unavailable stub is returned with the reason.
pub fn select_port(device: Option<&str>) -> Box<dyn PrinterPort> {
    match device {
        Some(path) => match BluetoothTransport::open(path) {
            Ok(transport) => Box::new(transport),
            Err(e) => {
                warn!(device = path, error = %e, "printer device not available");
                Box::new(UnavailablePort::new(e.to_string()))
            }
        },
        None => Box::new(UnavailablePort::new("no printer device configured")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_port_collects_jobs() {
        let mut port = MemoryPort::new();
        port.write_all(&[1, 2]).unwrap();
        port.write_all(&[3]).unwrap();
        assert_eq!(port.data(), &[1, 2, 3]);
        assert_eq!(port.jobs(), 2);
        assert!(port.is_available());
    }

    #[test]
    fn test_unavailable_port_rejects_writes() {
        let mut port = UnavailablePort::new("bluetooth off");
        assert!(!port.is_available());
        match port.write_all(&[0x1B, 0x40]) {
            Err(PrintError::Unavailable(reason)) => assert_eq!(reason, "bluetooth off"),
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_select_port_without_device() {
        let port = select_port(None);
        assert!(!port.is_available());
        assert_eq!(port.name(), "unavailable");
    }

    #[test]
    fn test_select_port_missing_device() {
        let port = select_port(Some("/nonexistent/rfcomm99"));
        assert!(!port.is_available());
    }
}
