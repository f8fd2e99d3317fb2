// SPDX-License-Identifier: Apache-2.0

//! Constants for the BNO055 UART register protocol.
//!
//! This module contains the register map consumed by the driver, the
//! operating/power mode values, the wire frame markers, and the timing
//! parameters of the bootstrap sequence.

use std::time::Duration;

// =============================================================================
// Wire Frame Markers
// =============================================================================

/// First byte of every request frame sent to the sensor
pub const FRAME_START: u8 = 0xAA;
/// Direction byte for a register read request
pub const DIR_READ: u8 = 0x01;
/// Direction byte for a register write request
pub const DIR_WRITE: u8 = 0x00;
/// First byte of a successful read response
pub const READ_RESPONSE_HEADER: u8 = 0xBB;
/// First byte of a write acknowledgement
pub const WRITE_ACK_HEADER: u8 = 0xEE;
/// Second byte of a successful write acknowledgement
pub const WRITE_ACK_OK: u8 = 0x01;
/// A read response carries this many bytes in front of the payload
pub const READ_RESPONSE_OVERHEAD: usize = 2;
/// A write acknowledgement is always exactly this long
pub const WRITE_ACK_LEN: usize = 2;

// =============================================================================
// Register Map (page 0)
// =============================================================================

/// One-byte register addresses consumed by this driver.
///
/// The map is closed: only registers the driver actually touches are
/// representable, so an invalid address cannot be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// Register page select
    PageId,
    /// Quaternion data block base (W LSB; 8 contiguous bytes W,X,Y,Z LE)
    QuaternionData,
    /// Die temperature, one signed byte
    Temperature,
    /// Calibration status bitfield
    CalibrationStatus,
    /// Power-on self-test result
    SelfTestResult,
    /// Last system error code
    SystemError,
    /// Measurement unit selection bitfield
    UnitSelect,
    /// Operating mode
    OperatingMode,
    /// Power mode
    PowerMode,
    /// System trigger (reset, self-test)
    SystemTrigger,
}

impl Register {
    /// Wire address of the register.
    pub const fn addr(self) -> u8 {
        match self {
            Register::PageId => 0x07,
            Register::QuaternionData => 0x20,
            Register::Temperature => 0x34,
            Register::CalibrationStatus => 0x35,
            Register::SelfTestResult => 0x36,
            Register::SystemError => 0x3A,
            Register::UnitSelect => 0x3B,
            Register::OperatingMode => 0x3D,
            Register::PowerMode => 0x3E,
            Register::SystemTrigger => 0x3F,
        }
    }
}

// =============================================================================
// Mode Values
// =============================================================================

/// Sensor operating mode.
///
/// The chip supports more modes than these; this driver only ever puts the
/// sensor in CONFIG (for setup) or NDOF (9-DOF fusion output).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    /// Configuration mode: registers writable, no sensor output
    Config,
    /// 9-degrees-of-freedom fusion mode (accel + gyro + mag)
    Ndof,
}

impl OperatingMode {
    /// Wire value written to the OPR_MODE register.
    pub const fn bits(self) -> u8 {
        match self {
            OperatingMode::Config => 0x00,
            OperatingMode::Ndof => 0x0C,
        }
    }

    /// Decode an OPR_MODE register value. Unknown mode bytes yield `None`.
    pub fn from_bits(value: u8) -> Option<Self> {
        match value & 0x0F {
            0x00 => Some(OperatingMode::Config),
            0x0C => Some(OperatingMode::Ndof),
            _ => None,
        }
    }
}

/// Sensor power mode. Only NORMAL is used by the bootstrap sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerMode {
    /// All subsystems powered
    Normal,
}

impl PowerMode {
    /// Wire value written to the PWR_MODE register.
    pub const fn bits(self) -> u8 {
        match self {
            PowerMode::Normal => 0x00,
        }
    }
}

// =============================================================================
// Register Values
// =============================================================================

/// UNIT_SEL value used at bootstrap: Android orientation (bit 7), Celsius
/// temperature, Euler degrees, gyro rad/s (bit 1), accel m/s^2.
pub const UNIT_SEL_BOOTSTRAP: u8 = 0b1000_0010;
/// SYS_TRIGGER bit that starts a self-test
pub const SYS_TRIGGER_SELF_TEST: u8 = 0x01;
/// SYS_TRIGGER bit that resets the sensor
pub const SYS_TRIGGER_RESET: u8 = 0x20;
/// SELFTEST_RESULT value when all four subsystems pass
pub const SELF_TEST_ALL_PASS: u8 = 0x0F;
/// Length of the quaternion register block (four LE i16 values)
pub const QUATERNION_DATA_LEN: u8 = 8;

/// Fixed-point scale of the quaternion registers (1 LSB = 1/2^14)
pub const QUATERNION_SCALE: f32 = 1.0 / 16384.0;

// =============================================================================
// Timing and Retry Parameters
// =============================================================================

/// Serial baud rate of the sensor UART
pub const BAUD_RATE: u32 = 115_200;
/// Transport timeout while the bootstrap sequence runs
pub const BOOTSTRAP_TIMEOUT: Duration = Duration::from_millis(1000);
/// Transport timeout for steady-state operation
pub const RUNTIME_TIMEOUT: Duration = Duration::from_millis(30);
/// Settle delay after each bootstrap register write (power-rail and
/// register-commit timing required by the hardware)
pub const SETTLE_DELAY: Duration = Duration::from_millis(300);
/// Default number of retries after a transport timeout
pub const RETRY_MAX: u32 = 5;
