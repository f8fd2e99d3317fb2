// SPDX-License-Identifier: Apache-2.0

//! Decoding of raw register bytes into orientation and calibration data.

use crate::constants::QUATERNION_SCALE;

/// Unit quaternion produced by the on-chip fusion.
///
/// Decoded from four little-endian signed 16-bit fixed-point registers
/// (1 LSB = 1/2^14).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Quaternion {
    /// Decode the 8-byte quaternion register block.
    ///
    /// Byte order is W-lsb, W-msb, X-lsb, X-msb, Y-lsb, Y-msb, Z-lsb, Z-msb.
    pub fn from_registers(raw: &[u8; 8]) -> Self {
        let component = |i: usize| {
            i16::from_le_bytes([raw[2 * i], raw[2 * i + 1]]) as f32 * QUATERNION_SCALE
        };
        Self {
            w: component(0),
            x: component(1),
            y: component(2),
            z: component(3),
        }
    }
}

/// Per-subsystem calibration confidence, unpacked from the CALIB_STAT byte.
///
/// Each field is a 2-bit score in [0, 3]; 3 means fully calibrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalibrationStatus {
    /// Unmodified register byte
    pub raw: u8,
    /// Overall fusion calibration (bits 7..6)
    pub system: u8,
    /// Gyroscope calibration (bits 5..4)
    pub gyroscope: u8,
    /// Accelerometer calibration (bits 3..2)
    pub accelerometer: u8,
    /// Magnetometer calibration (bits 1..0)
    pub magnetometer: u8,
}

impl CalibrationStatus {
    /// Unpack the calibration status bitfield.
    pub fn from_register(byte: u8) -> Self {
        Self {
            raw: byte,
            magnetometer: byte & 0x3,
            accelerometer: (byte >> 2) & 0x3,
            gyroscope: (byte >> 4) & 0x3,
            system: (byte >> 6) & 0x3,
        }
    }

    /// True when every subsystem reports the maximum confidence score.
    pub fn is_fully_calibrated(&self) -> bool {
        self.system == 3 && self.gyroscope == 3 && self.accelerometer == 3 && self.magnetometer == 3
    }
}
