//! Duplex byte channels.

use std::io::{Read as _, Write as _};
use std::time::Duration;

use serialport::SerialPort;
use tracing::debug;

use crate::{LinkError, LinkResult};

/// A thin duplex byte stream to one device.
///
/// Implementations do not interpret content and do not retry; a failed
/// operation surfaces as [`LinkError::Io`] and the caller decides what dies
/// with it.
pub trait Channel: Send {
    /// Label used in logs and errors (e.g. `"arm"`).
    fn device(&self) -> &str;

    /// Writes the whole buffer to the device.
    fn send(&mut self, bytes: &[u8]) -> LinkResult<()>;

    /// Number of bytes ready to read without blocking.
    fn bytes_available(&mut self) -> LinkResult<usize>;

    /// Drains whatever is ready right now; empty when nothing is pending.
    fn read_available(&mut self) -> LinkResult<Vec<u8>>;
}

/// [`Channel`] over a real serial port.
///
/// Owns the OS handle exclusively; construct one per physical device at
/// startup and keep it for the life of the process.
pub struct SerialChannel {
    device: String,
    port: Box<dyn SerialPort>,
}

impl SerialChannel {
    /// Hard floor on the OS read timeout; reads are gated on
    /// `bytes_to_read`, so this only bounds a racing drain.
    const READ_TIMEOUT: Duration = Duration::from_millis(100);

    /// Opens the named serial port at the given baud rate.
    pub fn open(device: impl Into<String>, port_name: &str, baud: u32) -> LinkResult<Self> {
        let device = device.into();
        let port = serialport::new(port_name, baud)
            .timeout(Self::READ_TIMEOUT)
            .open()
            .map_err(|e| LinkError::Open {
                device: device.clone(),
                port: port_name.to_owned(),
                message: e.to_string(),
            })?;
        debug!(device = %device, port = %port_name, baud, "serial link open");
        Ok(Self { device, port })
    }

    fn io_error(&self, e: impl ToString) -> LinkError {
        LinkError::Io {
            device: self.device.clone(),
            message: e.to_string(),
        }
    }
}

impl std::fmt::Debug for SerialChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialChannel")
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl Channel for SerialChannel {
    fn device(&self) -> &str {
        &self.device
    }

    fn send(&mut self, bytes: &[u8]) -> LinkResult<()> {
        let outcome = self.port.write_all(bytes).and_then(|()| self.port.flush());
        outcome.map_err(|e| self.io_error(e))
    }

    fn bytes_available(&mut self) -> LinkResult<usize> {
        self.port
            .bytes_to_read()
            .map(|n| n as usize)
            .map_err(|e| self.io_error(e))
    }

    fn read_available(&mut self) -> LinkResult<Vec<u8>> {
        let pending = self.bytes_available()?;
        if pending == 0 {
            return Ok(Vec::new());
        }
        let mut buf = vec![0u8; pending];
        self.port
            .read_exact(&mut buf)
            .map_err(|e| self.io_error(e))?;
        Ok(buf)
    }
}
