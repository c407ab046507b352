use std::io::{ErrorKind, Write};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, warn};

use crate::error::{Result, TransportError};
use crate::stream::{read_with_deadline, TimeoutControl};
use crate::traits::Transport;

/// Factory default line speed of the EFA controller.
pub const DEFAULT_BAUD_RATE: u32 = 19_200;

/// Serial line settings.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyUSB0` or `COM3`.
    pub path: String,
    /// Line speed. Default: 19200.
    pub baud_rate: u32,
    /// Initial port timeout; replaced per read by the caller's timeout.
    pub timeout: Duration,
}

impl SerialConfig {
    /// Settings for `path` with factory defaults.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: Duration::from_secs(3),
        }
    }
}

/// Serial-port transport (8N1, no flow control).
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    path: String,
}

impl SerialTransport {
    /// Open the port described by `config`.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(&config.path, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.timeout)
            .open()
            .map_err(|err| TransportError::Open {
                path: config.path.clone(),
                reason: err.to_string(),
            })?;

        debug!(path = %config.path, baud = config.baud_rate, "serial port opened");
        Ok(Self {
            port,
            path: config.path.clone(),
        })
    }

    /// The device path this transport was opened on.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        // A reply left over from an abandoned exchange would shift every later frame.
        if let Err(err) = self.port.clear(ClearBuffer::Input) {
            warn!(path = %self.path, %err, "failed to clear serial input buffer");
        }

        let mut offset = 0usize;
        while offset < bytes.len() {
            match self.port.write(&bytes[offset..]) {
                Ok(0) => return Err(TransportError::Io(std::io::Error::from(ErrorKind::WriteZero))),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
        self.port.flush().map_err(TransportError::Io)
    }

    fn read_exact(&mut self, n: usize, timeout: Duration) -> Result<Vec<u8>> {
        read_with_deadline(&mut self.port, n, timeout)
    }
}

impl TimeoutControl for Box<dyn SerialPort> {
    fn set_read_deadline(&mut self, remaining: Duration) -> std::io::Result<()> {
        self.set_timeout(remaining).map_err(std::io::Error::from)
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("path", &self.path)
            .finish()
    }
}
