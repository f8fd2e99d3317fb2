// SPDX-License-Identifier: Apache-2.0

//! Host-side driver for the Bosch BNO055 9-DOF orientation sensor over its
//! UART register protocol.
//!
//! The crate brings the sensor from power-on to NDOF fusion mode, then serves
//! absolute-orientation quaternions and calibration status from it:
//!
//! ```no_run
//! use bno055_uart::Bno055;
//!
//! # fn main() -> Result<(), bno055_uart::Error> {
//! let sensor = Bno055::open("/dev/ttyUSB0")?;
//! sensor.begin()?;
//! let q = sensor.refresh_orientation()?;
//! println!("w={} x={} y={} z={}", q.w, q.x, q.y, q.z);
//! # Ok(())
//! # }
//! ```
//!
//! All register traffic is serialized internally; the handle is safe to share
//! across threads by reference.

pub mod constants;
pub mod decode;
pub mod driver;
pub mod health;
pub mod interface;
pub mod protocol;

pub use constants::{OperatingMode, PowerMode, Register};
pub use decode::{CalibrationStatus, Quaternion};
pub use driver::Bno055;
pub use health::ConnectionHealth;
pub use interface::{SerialTransport, Transport};
pub use protocol::FrameError;

/// Errors surfaced by driver operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transport timed out on every retry of a register operation
    #[error("transport timed out after {attempts} attempts")]
    Timeout { attempts: u32 },
    /// The device answered with a malformed frame
    #[error("protocol frame error: {0}")]
    Frame(#[from] FrameError),
    /// Power-on self-test reported a failing subsystem (0x0F = all pass)
    #[error("self-test failed: result 0x{0:02X}")]
    SelfTestFailed(u8),
    /// The device's SYS_ERR register holds a nonzero error code
    #[error("device system error 0x{0:02X}")]
    SystemError(u8),
    /// The operation requires a completed bootstrap; call `begin` first
    #[error("sensor not initialized")]
    NotInitialized,
    /// The mode register holds a value this driver does not drive
    #[error("unknown operating mode 0x{0:02X}")]
    UnknownMode(u8),
    /// Transport failure other than a timeout
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}
