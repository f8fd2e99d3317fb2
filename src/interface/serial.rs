//! Serial port transport.

use std::io::{self, Read, Write};
use std::time::Duration;

use log::trace;
use serialport::{ClearBuffer, DataBits, Parity, SerialPort, StopBits};

use super::Transport;
use crate::constants::{BAUD_RATE, BOOTSTRAP_TIMEOUT};

/// [`Transport`] backed by a host serial port configured 115200-8-N-1.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open the serial device at `path` with the sensor's line settings and
    /// the bootstrap timeout.
    pub fn open(path: &str) -> io::Result<Self> {
        let port = serialport::new(path, BAUD_RATE)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(BOOTSTRAP_TIMEOUT)
            .open()
            .map_err(io::Error::other)?;
        trace!("opened {} at {} 8N1", path, BAUD_RATE);
        Ok(Self { port })
    }

    /// Wrap an already-opened serial port.
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        self.port.write_all(frame)?;
        self.port.flush()
    }

    fn recv_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        // read_exact maps a mid-read expiry to UnexpectedEof on some
        // platforms; fold both into TimedOut so the retry layer sees one
        // condition.
        self.port.read_exact(buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                io::Error::new(io::ErrorKind::TimedOut, e)
            } else {
                e
            }
        })
    }

    fn discard_input(&mut self) -> io::Result<()> {
        self.port.clear(ClearBuffer::Input).map_err(io::Error::other)
    }

    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.port.set_timeout(timeout).map_err(io::Error::other)
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("port", &self.port.name())
            .finish()
    }
}
