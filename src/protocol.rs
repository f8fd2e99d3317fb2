// SPDX-License-Identifier: Apache-2.0

//! Frame construction and response validation for the UART register protocol.
//!
//! The sensor exposes its register bus over the serial link with a minimal
//! framing: a 4-byte request header (start marker, direction, register
//! address, length) followed by payload bytes on writes. Responses are either
//! a 2-byte write acknowledgement or a read response of `length + 2` bytes.

use crate::constants::{
    Register, DIR_READ, DIR_WRITE, FRAME_START, READ_RESPONSE_HEADER, READ_RESPONSE_OVERHEAD,
    WRITE_ACK_HEADER, WRITE_ACK_OK,
};

/// A response frame that does not match the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// A response byte did not carry the expected protocol marker
    #[error("frame header mismatch: expected 0x{expected:02X}, got 0x{found:02X}")]
    HeaderMismatch { expected: u8, found: u8 },
    /// The response was shorter than the frame format requires
    #[error("response truncated: expected {expected} bytes, got {found}")]
    Truncated { expected: usize, found: usize },
}

/// Build a read request frame for `len` bytes starting at `register`.
///
/// `len` must be at least 1; the protocol cannot express a zero-length read.
pub fn encode_read(register: Register, len: u8) -> [u8; 4] {
    debug_assert!(len >= 1, "read length must be in [1, 255]");
    [FRAME_START, DIR_READ, register.addr(), len]
}

/// Build a write request frame carrying `payload` for `register`.
///
/// The payload length must fit the single length byte (at most 255 bytes).
pub fn encode_write(register: Register, payload: &[u8]) -> Vec<u8> {
    debug_assert!(payload.len() <= 255, "write payload must fit a length byte");
    let mut frame = Vec::with_capacity(4 + payload.len());
    frame.extend_from_slice(&[FRAME_START, DIR_WRITE, register.addr(), payload.len() as u8]);
    frame.extend_from_slice(payload);
    frame
}

/// Expected size of the response to a read request for `len` bytes.
pub fn read_response_len(len: u8) -> usize {
    len as usize + READ_RESPONSE_OVERHEAD
}

/// Validate a read response and return its payload.
///
/// Byte 0 must be the read-response marker. Byte 1 echoes the length but is
/// not validated; the transport already read exactly the expected size.
pub fn validate_read_response(buffer: &[u8], expected_len: u8) -> Result<&[u8], FrameError> {
    let total = read_response_len(expected_len);
    if buffer.len() < total {
        return Err(FrameError::Truncated {
            expected: total,
            found: buffer.len(),
        });
    }
    if buffer[0] != READ_RESPONSE_HEADER {
        return Err(FrameError::HeaderMismatch {
            expected: READ_RESPONSE_HEADER,
            found: buffer[0],
        });
    }
    Ok(&buffer[READ_RESPONSE_OVERHEAD..total])
}

/// Validate a 2-byte write acknowledgement.
///
/// Both the ack marker and the status byte must match; a single wrong byte
/// rejects the frame.
pub fn validate_write_ack(buffer: &[u8]) -> Result<(), FrameError> {
    if buffer.len() < 2 {
        return Err(FrameError::Truncated {
            expected: 2,
            found: buffer.len(),
        });
    }
    if buffer[0] != WRITE_ACK_HEADER {
        return Err(FrameError::HeaderMismatch {
            expected: WRITE_ACK_HEADER,
            found: buffer[0],
        });
    }
    if buffer[1] != WRITE_ACK_OK {
        return Err(FrameError::HeaderMismatch {
            expected: WRITE_ACK_OK,
            found: buffer[1],
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_read() {
        assert_eq!(
            encode_read(Register::QuaternionData, 8),
            [0xAA, 0x01, 0x20, 0x08]
        );
        assert_eq!(encode_read(Register::Temperature, 1), [0xAA, 0x01, 0x34, 1]);
    }

    #[test]
    fn test_encode_write() {
        assert_eq!(
            encode_write(Register::OperatingMode, &[0x0C]),
            vec![0xAA, 0x00, 0x3D, 0x01, 0x0C]
        );
        // Zero-length write is legal on the wire
        assert_eq!(
            encode_write(Register::SystemTrigger, &[]),
            vec![0xAA, 0x00, 0x3F, 0x00]
        );
    }

    #[test]
    fn test_read_roundtrip() {
        // A synthetic response to encode_read(R, L) decodes back to the payload
        let request = encode_read(Register::CalibrationStatus, 4);
        let len = request[3];
        let mut response = vec![0xBB, len];
        response.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(response.len(), read_response_len(len));
        let payload = validate_read_response(&response, len).unwrap();
        assert_eq!(payload, &[0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_read_response_bad_header() {
        let err = validate_read_response(&[0xEE, 0x01, 0x00], 1).unwrap_err();
        assert_eq!(
            err,
            FrameError::HeaderMismatch {
                expected: 0xBB,
                found: 0xEE
            }
        );
    }

    #[test]
    fn test_read_response_length_echo_unchecked() {
        // The length-echo byte is not validated
        let payload = validate_read_response(&[0xBB, 0x7F, 0x42], 1).unwrap();
        assert_eq!(payload, &[0x42]);
    }

    #[test]
    fn test_write_ack_ok() {
        assert!(validate_write_ack(&[0xEE, 0x01]).is_ok());
    }

    #[test]
    fn test_write_ack_rejects_single_bad_byte() {
        // One wrong byte is enough to reject the ack: a bad marker with a
        // good status, and a good marker with a bad status, both fail.
        assert_eq!(
            validate_write_ack(&[0xBB, 0x01]),
            Err(FrameError::HeaderMismatch {
                expected: 0xEE,
                found: 0xBB
            })
        );
        assert_eq!(
            validate_write_ack(&[0xEE, 0x03]),
            Err(FrameError::HeaderMismatch {
                expected: 0x01,
                found: 0x03
            })
        );
    }

    #[test]
    fn test_write_ack_truncated() {
        assert_eq!(
            validate_write_ack(&[0xEE]),
            Err(FrameError::Truncated {
                expected: 2,
                found: 1
            })
        );
    }
}
