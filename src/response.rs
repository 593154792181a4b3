//! Computer-link response parsing and validation.
//!
//! Two response shapes exist:
//!
//! | Command | Response |
//! |---------|----------|
//! | Read | `STX <2*LL hex digits> ETX CC` |
//! | Write / force | a single `ACK` (0x06) or `NAK` (0x15) byte |
//!
//! A read response is accepted only if it is framed by STX and ETX, both
//! checksum digits match the sum of everything between STX and the
//! checksum, and every data character is a hex digit.
//!
//! # Example
//!
//! ```
//! use fx_link::ReadResponse;
//!
//! // Two data registers: 1000 and 2000, low byte first
//! let frame = b"\x02E803D007\x03BE";
//! let response = ReadResponse::from_bytes(frame, 4).unwrap();
//! assert_eq!(response.data(), &[0xE8, 0x03, 0xD0, 0x07]);
//! assert_eq!(response.to_words(), vec![1000, 2000]);
//! ```

use tracing::warn;

use crate::codec::{self, ACK, ETX, NAK, STX};
use crate::error::{FxError, Result};
use crate::numeric;

/// Validated response to a read command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResponse {
    data: Vec<u8>,
}

impl ReadResponse {
    /// Parses and validates a read response frame.
    ///
    /// # Arguments
    ///
    /// * `frame` - Raw response bytes, STX through the checksum digits
    /// * `byte_count` - Number of data bytes the request asked for
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The frame length does not match `byte_count` (`MalformedResponse`)
    /// - STX or ETX is missing (`MalformedResponse`)
    /// - Either checksum digit differs from the computed one (`ChecksumMismatch`)
    /// - A data character is not a hex digit (`MalformedResponse`)
    pub fn from_bytes(frame: &[u8], byte_count: usize) -> Result<Self> {
        let expected_len = byte_count
            .checked_mul(2)
            .and_then(|n| n.checked_add(4))
            .ok_or_else(|| {
                FxError::malformed_response(format!("byte count {} is too large", byte_count))
            })?;
        if frame.len() != expected_len {
            return Err(FxError::malformed_response(format!(
                "expected {} bytes, got {}",
                expected_len,
                frame.len()
            )));
        }

        let etx_pos = expected_len - 3;
        if frame[0] != STX {
            return Err(FxError::malformed_response(format!(
                "expected STX, got 0x{:02X}",
                frame[0]
            )));
        }
        if frame[etx_pos] != ETX {
            return Err(FxError::malformed_response(format!(
                "expected ETX at offset {}, got 0x{:02X}",
                etx_pos, frame[etx_pos]
            )));
        }

        let computed = codec::checksum(&frame[1..expected_len - 2]);
        let received = [frame[expected_len - 2], frame[expected_len - 1]];
        if computed != received {
            warn!(
                computed = %String::from_utf8_lossy(&computed),
                received = %String::from_utf8_lossy(&received),
                "read response checksum mismatch"
            );
            return Err(FxError::checksum_mismatch(computed, received));
        }

        let data = codec::decode_hex(&frame[1..etx_pos])?;
        Ok(Self { data })
    }

    /// Returns the decoded data bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the response and returns the decoded data bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Converts the data to 16-bit registers, low byte first.
    ///
    /// A trailing odd byte is ignored.
    pub fn to_words(&self) -> Vec<u16> {
        numeric::bytes_to_words(&self.data)
    }

    /// Converts the data to 32-bit registers, least significant byte first.
    ///
    /// Trailing bytes that do not fill a register are ignored.
    pub fn to_dwords(&self) -> Vec<u32> {
        numeric::bytes_to_dwords(&self.data)
    }

    /// Extracts `count` bits starting at bit `bit_offset` of the first byte.
    pub fn to_bits(&self, bit_offset: u8, count: usize) -> Vec<bool> {
        numeric::unpack_bits(&self.data, usize::from(bit_offset), count)
    }
}

/// Checks the single-byte answer to a write or force command.
///
/// # Errors
///
/// Returns [`FxError::NotAcknowledged`] for NAK or any other byte.
///
/// # Example
///
/// ```
/// use fx_link::{check_ack, ACK, NAK};
///
/// assert!(check_ack(ACK).is_ok());
/// assert!(check_ack(NAK).is_err());
/// ```
pub fn check_ack(byte: u8) -> Result<()> {
    match byte {
        ACK => Ok(()),
        NAK => {
            warn!("command answered with NAK");
            Err(FxError::NotAcknowledged { received: byte })
        }
        other => {
            warn!(received = other, "unexpected acknowledgement byte");
            Err(FxError::NotAcknowledged { received: other })
        }
    }
}
