// SPDX-License-Identifier: Apache-2.0

//! Transport abstraction over the sensor's byte stream.
//!
//! The register protocol is strictly request-then-response, so the driver
//! only needs four primitives from the link: send a frame, read an exact
//! number of response bytes, discard stale input, and adjust the timeout.
//! The production implementation wraps a serial port; tests substitute a
//! scripted mock.

pub mod delay;
pub mod serial;

pub use serial::SerialTransport;

use std::io;
use std::time::Duration;

/// A duplex byte channel carrying the framed register protocol.
///
/// Timeouts are reported as `io::ErrorKind::TimedOut`; the retry layer treats
/// them as transient and retries, while any other error surfaces directly.
pub trait Transport {
    /// Send one request frame.
    fn send(&mut self, frame: &[u8]) -> io::Result<()>;

    /// Block until exactly `buf.len()` response bytes have arrived, or the
    /// configured timeout expires.
    fn recv_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Drop any unread inbound bytes.
    ///
    /// This is the recovery mechanism for protocol desynchronization: it runs
    /// before every send so a retry starts from a clean stream.
    fn discard_input(&mut self) -> io::Result<()>;

    /// Set the read/write timeout for subsequent operations.
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()>;
}
