// SPDX-License-Identifier: Apache-2.0

//! BNO055 UART driver implementation.
//!
//! This module contains the register link (one logical register operation
//! with bounded retry on timeout) and the device controller that owns the
//! bootstrap state machine, the cached sensor values, and the public command
//! surface.

use std::sync::{Mutex, MutexGuard};

use log::{debug, trace, warn};

use crate::constants::{
    OperatingMode, PowerMode, Register, BOOTSTRAP_TIMEOUT, QUATERNION_DATA_LEN, RETRY_MAX,
    RUNTIME_TIMEOUT, SELF_TEST_ALL_PASS, SETTLE_DELAY, SYS_TRIGGER_RESET, SYS_TRIGGER_SELF_TEST,
    UNIT_SEL_BOOTSTRAP, WRITE_ACK_LEN,
};
use crate::decode::{CalibrationStatus, Quaternion};
use crate::health::ConnectionHealth;
use crate::interface::{delay::settle, SerialTransport, Transport};
use crate::protocol;
use crate::Error;

/// One register operation over the transport, with bounded retry.
///
/// Only transport timeouts are retried: a timeout is presumed transient
/// (noise, missed byte), while a malformed response indicates protocol
/// desynchronization that retrying alone will not fix. Discarding the
/// inbound buffer before each attempt is the actual desync recovery.
struct RegisterLink<T> {
    transport: T,
    health: ConnectionHealth,
    retry_max: u32,
}

impl<T: Transport> RegisterLink<T> {
    fn new(transport: T) -> Self {
        Self {
            transport,
            health: ConnectionHealth::new(),
            retry_max: RETRY_MAX,
        }
    }

    /// Read `len` bytes starting at `register`.
    fn read_register(&mut self, register: Register, len: u8) -> Result<Vec<u8>, Error> {
        let frame = protocol::encode_read(register, len);
        let response = self.exchange(&frame, protocol::read_response_len(len))?;
        let payload = protocol::validate_read_response(&response, len)?;
        Ok(payload.to_vec())
    }

    /// Write `payload` to `register`, optionally validating the 2-byte ack.
    ///
    /// Writes that reboot the device (reset trigger) produce no ack; for
    /// those the response read is skipped entirely.
    fn write_register(
        &mut self,
        register: Register,
        payload: &[u8],
        ack_required: bool,
    ) -> Result<(), Error> {
        let frame = protocol::encode_write(register, payload);
        let expect = if ack_required { WRITE_ACK_LEN } else { 0 };
        let response = self.exchange(&frame, expect)?;
        if ack_required {
            protocol::validate_write_ack(&response)?;
        }
        Ok(())
    }

    /// Send `frame` and read exactly `response_len` bytes, retrying on
    /// timeout up to `retry_max` additional attempts.
    ///
    /// Counts one packet per logical call (decay check first), and one
    /// timeout per expired attempt.
    fn exchange(&mut self, frame: &[u8], response_len: usize) -> Result<Vec<u8>, Error> {
        self.health.record_attempt();

        let mut attempts = 0u32;
        loop {
            attempts += 1;
            self.transport.discard_input()?;
            self.transport.send(frame)?;

            if response_len == 0 {
                return Ok(Vec::new());
            }

            let mut response = vec![0u8; response_len];
            match self.transport.recv_exact(&mut response) {
                Ok(()) => {
                    trace!("<- {:02X?}", response);
                    return Ok(response);
                }
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                    self.health.record_timeout();
                    if attempts > self.retry_max {
                        warn!("register op gave up after {} attempts", attempts);
                        return Err(Error::Timeout { attempts });
                    }
                    trace!("timeout, retry {}/{}", attempts, self.retry_max);
                }
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }
}

/// Latest decoded sensor values, overwritten whole on each refresh.
#[derive(Debug, Clone, Copy, Default)]
struct SensorValues {
    quaternion: Quaternion,
    calibration: CalibrationStatus,
}

struct Inner<T> {
    link: RegisterLink<T>,
    initialized: bool,
    values: SensorValues,
}

impl<T: Transport> Inner<T> {
    fn require_init(&self) -> Result<(), Error> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    /// Write one config register and let the hardware settle.
    fn bootstrap_write(&mut self, register: Register, value: u8) -> Result<(), Error> {
        self.link.write_register(register, &[value], true)?;
        settle(SETTLE_DELAY);
        Ok(())
    }
}

/// BNO055 device controller.
///
/// Owns the transport, the health counters, and the cached value record.
/// All register operations are serialized through one internal lock, since
/// the protocol is strictly request-then-response with no request IDs;
/// interleaved operations would corrupt frame alignment. Separate handles on
/// separate transports are fully independent.
pub struct Bno055<T: Transport = SerialTransport> {
    inner: Mutex<Inner<T>>,
}

impl Bno055<SerialTransport> {
    /// Open the sensor's serial device at `path` (115200-8-N-1).
    ///
    /// The handle starts uninitialized; run [`begin`](Self::begin) to bring
    /// the sensor into operating mode.
    pub fn open(path: &str) -> Result<Self, Error> {
        Ok(Self::new(SerialTransport::open(path)?))
    }
}

impl<T: Transport> Bno055<T> {
    /// Create a controller over an already-connected transport.
    pub fn new(transport: T) -> Self {
        Self {
            inner: Mutex::new(Inner {
                link: RegisterLink::new(transport),
                initialized: false,
                values: SensorValues::default(),
            }),
        }
    }

    /// A poisoned lock only means another operation panicked mid-flight; the
    /// next bootstrap resynchronizes the device, so recover the guard.
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run the bootstrap sequence that takes the sensor from power-on to
    /// NDOF fusion mode.
    ///
    /// Any failure aborts the sequence and leaves the handle uninitialized
    /// but reusable for another attempt. Each register write is followed by
    /// the fixed settle delay the hardware requires.
    pub fn begin(&self) -> Result<(), Error> {
        let mut g = self.lock();
        g.initialized = false;
        g.link.transport.set_timeout(BOOTSTRAP_TIMEOUT)?;

        debug!("bootstrap: config mode");
        g.bootstrap_write(Register::OperatingMode, OperatingMode::Config.bits())?;
        debug!("bootstrap: normal power");
        g.bootstrap_write(Register::PowerMode, PowerMode::Normal.bits())?;
        debug!("bootstrap: page 0");
        g.bootstrap_write(Register::PageId, 0)?;
        debug!("bootstrap: unit select");
        g.bootstrap_write(Register::UnitSelect, UNIT_SEL_BOOTSTRAP)?;

        debug!("bootstrap: self-test");
        g.bootstrap_write(Register::SystemTrigger, SYS_TRIGGER_SELF_TEST)?;
        let result = g.link.read_register(Register::SelfTestResult, 1)?[0];
        if result != SELF_TEST_ALL_PASS {
            warn!("self-test failed: 0x{:02X}", result);
            return Err(Error::SelfTestFailed(result));
        }

        debug!("bootstrap: system error check");
        let error = g.link.read_register(Register::SystemError, 1)?[0];
        if error != 0 {
            warn!("device reports system error 0x{:02X}", error);
            return Err(Error::SystemError(error));
        }

        debug!("bootstrap: ndof mode");
        g.bootstrap_write(Register::OperatingMode, OperatingMode::Ndof.bits())?;

        g.link.transport.set_timeout(RUNTIME_TIMEOUT)?;
        g.initialized = true;
        debug!("bootstrap complete");
        Ok(())
    }

    /// Read the current operating mode.
    pub fn mode(&self) -> Result<OperatingMode, Error> {
        let mut g = self.lock();
        g.require_init()?;
        let raw = g.link.read_register(Register::OperatingMode, 1)?[0];
        OperatingMode::from_bits(raw).ok_or(Error::UnknownMode(raw))
    }

    /// Switch the sensor's operating mode.
    pub fn set_mode(&self, mode: OperatingMode) -> Result<(), Error> {
        let mut g = self.lock();
        g.require_init()?;
        g.link
            .write_register(Register::OperatingMode, &[mode.bits()], true)?;
        settle(SETTLE_DELAY);
        Ok(())
    }

    /// Reset the sensor.
    ///
    /// The device reboots immediately and sends no acknowledgement, so none
    /// is read. Callers should run [`begin`](Self::begin) again before
    /// issuing further commands; until then register operations will fail
    /// against the rebooting device.
    pub fn reset(&self) -> Result<(), Error> {
        let mut g = self.lock();
        g.require_init()?;
        g.link
            .write_register(Register::SystemTrigger, &[SYS_TRIGGER_RESET], false)
    }

    /// Trigger a self-test and return the raw result byte (0x0F = all four
    /// subsystems pass).
    pub fn self_test(&self) -> Result<u8, Error> {
        let mut g = self.lock();
        g.require_init()?;
        g.link
            .write_register(Register::SystemTrigger, &[SYS_TRIGGER_SELF_TEST], true)?;
        settle(SETTLE_DELAY);
        Ok(g.link.read_register(Register::SelfTestResult, 1)?[0])
    }

    /// Read the die temperature in the configured unit (Celsius).
    ///
    /// Unlike the other commands this works before bootstrap; the register
    /// is readable in any mode.
    pub fn temperature(&self) -> Result<i8, Error> {
        let mut g = self.lock();
        Ok(g.link.read_register(Register::Temperature, 1)?[0] as i8)
    }

    /// Read the device's last system error code (0 = no error).
    pub fn system_error(&self) -> Result<u8, Error> {
        let mut g = self.lock();
        g.require_init()?;
        Ok(g.link.read_register(Register::SystemError, 1)?[0])
    }

    /// Read the quaternion block and replace the cached orientation.
    pub fn refresh_orientation(&self) -> Result<Quaternion, Error> {
        let mut g = self.lock();
        g.require_init()?;
        let raw = g
            .link
            .read_register(Register::QuaternionData, QUATERNION_DATA_LEN)?;
        let mut block = [0u8; QUATERNION_DATA_LEN as usize];
        block.copy_from_slice(&raw);
        let quaternion = Quaternion::from_registers(&block);
        g.values.quaternion = quaternion;
        Ok(quaternion)
    }

    /// Read the calibration status byte and replace the cached record.
    pub fn refresh_calibration(&self) -> Result<CalibrationStatus, Error> {
        let mut g = self.lock();
        g.require_init()?;
        let raw = g.link.read_register(Register::CalibrationStatus, 1)?[0];
        let calibration = CalibrationStatus::from_register(raw);
        g.values.calibration = calibration;
        Ok(calibration)
    }

    /// Last quaternion fetched by [`refresh_orientation`](Self::refresh_orientation).
    pub fn quaternion(&self) -> Quaternion {
        self.lock().values.quaternion
    }

    /// Last calibration status fetched by [`refresh_calibration`](Self::refresh_calibration).
    pub fn calibration(&self) -> CalibrationStatus {
        self.lock().values.calibration
    }

    /// Whether bootstrap has completed successfully.
    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    /// Connection health percentage derived from the timeout/packet ratio.
    pub fn connection_health(&self) -> f64 {
        self.lock().link.health.percentage()
    }

    /// Change the retry bound for transport timeouts (default 5).
    pub fn set_retry_max(&self, retry_max: u32) {
        self.lock().link.retry_max = retry_max;
    }
}
