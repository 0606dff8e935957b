//! Serial port transport
//!
//! Wraps a `serialport` handle. The port is opened with a short read
//! timeout; a read that times out is reported as zero bytes so the polling
//! loops above decide when to give up.

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, trace};

use crate::{Transport, error::*};

/// Serial transport for AS608 modules
pub struct SerialTransport {
    path: String,
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Read timeout applied to the underlying port
    pub const READ_TIMEOUT: Duration = Duration::from_millis(10);

    /// Open `path` at `baud` bits per second, 8N1
    pub fn open(path: impl Into<String>, baud: u32) -> Result<Self> {
        let path = path.into();

        debug!("Opening {} at {} baud...", path, baud);

        let port = serialport::new(path.as_str(), baud)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(Self::READ_TIMEOUT)
            .open()?;

        debug!("Opened {}", path);

        Ok(Self { path, port })
    }

    /// Wrap an already configured port
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        let path = port.name().unwrap_or_else(|| "serial".to_string());
        Self { path, port }
    }

    /// Change the host-side baud rate, e.g. after reprogramming the module
    pub fn set_baud_rate(&mut self, baud: u32) -> Result<()> {
        debug!("Switching {} to {} baud", self.path, baud);
        self.port.set_baud_rate(baud)?;
        Ok(())
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Transport for SerialTransport {
    fn bytes_available(&mut self) -> Result<usize> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.port.read(buf) {
            Ok(n) => {
                trace!("Received {} bytes: {}", n, hex::encode(&buf[..n]));
                Ok(n)
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        trace!("Sending {} bytes: {}", data.len(), hex::encode(data));

        self.port.write_all(data)?;
        self.port.flush()?;

        Ok(())
    }

    fn description(&self) -> String {
        self.path.clone()
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("path", &self.path)
            .finish()
    }
}
