//! Computer-link request frames and their serialization.
//!
//! Each command builds its own frame. Commands are normally created by the
//! [`Client`](crate::Client), which resolves the user address first, but can
//! be used directly for lower-level control.
//!
//! # Frame Layouts
//!
//! | Command | Frame |
//! |---------|-------|
//! | [`ReadCommand`] | `STX '0' AAAA LL ETX CC` |
//! | [`WriteCommand`] | `STX '1' AAAA LL <2*LL hex digits> ETX CC` |
//! | [`ForceBitCommand`] | `STX '7'/'8' AAAA(pair swapped) ETX CC` |
//!
//! `AAAA` is the device address as four hex digits, `LL` the byte count as
//! two hex digits and `CC` the checksum of everything after STX up to and
//! including ETX.
//!
//! # Example
//!
//! ```
//! use fx_link::ReadCommand;
//!
//! let cmd = ReadCommand::new(0x1028, 4).unwrap();
//! assert_eq!(cmd.to_bytes(), b"\x020102804\x0362");
//! ```

use crate::address::{ForcedAddress, ResolvedAddress, MAX_TRANSFER_BYTES};
use crate::codec::{self, ETX, STX};
use crate::error::{FxError, Result};

/// Read command code.
pub(crate) const CMD_READ: u8 = 0x30;
/// Write command code.
pub(crate) const CMD_WRITE: u8 = 0x31;
/// Force bit ON command code.
pub(crate) const CMD_FORCE_ON: u8 = 0x37;
/// Force bit OFF command code.
pub(crate) const CMD_FORCE_OFF: u8 = 0x38;

/// Shape of the response a command expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedResponse {
    /// `STX <2*byte_count hex digits> ETX CC`.
    Data {
        /// Number of data bytes carried by the response.
        byte_count: u16,
    },
    /// A single ACK or NAK byte.
    Ack,
}

impl ExpectedResponse {
    /// Returns the length of the expected response in bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use fx_link::ExpectedResponse;
    ///
    /// assert_eq!(ExpectedResponse::Data { byte_count: 4 }.len(), 12);
    /// assert_eq!(ExpectedResponse::Ack.len(), 1);
    /// ```
    #[allow(clippy::len_without_is_empty)]
    pub fn len(self) -> usize {
        match self {
            // STX + data + ETX + 2 checksum digits
            ExpectedResponse::Data { byte_count } => 4 + 2 * usize::from(byte_count),
            ExpectedResponse::Ack => 1,
        }
    }
}

fn check_byte_count(parameter: &str, byte_count: usize) -> Result<()> {
    if byte_count == 0 {
        return Err(FxError::invalid_parameter(
            parameter,
            "must be greater than 0",
        ));
    }
    if byte_count > usize::from(MAX_TRANSFER_BYTES) {
        return Err(FxError::TooManyBytes {
            byte_count: byte_count as u32,
            limit: MAX_TRANSFER_BYTES,
        });
    }
    Ok(())
}

/// Appends ETX and the checksum of everything after the leading STX.
fn finish_frame(out: &mut Vec<u8>, start: usize) {
    out.push(ETX);
    let digits = codec::checksum(&out[start + 1..]);
    out.extend_from_slice(&digits);
}

/// Command for reading bytes of device memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadCommand {
    device_address: u16,
    byte_count: u16,
}

impl ReadCommand {
    /// Creates a new read command.
    ///
    /// # Arguments
    ///
    /// * `device_address` - Device address of the first byte
    /// * `byte_count` - Number of bytes to read (1-64)
    ///
    /// # Errors
    ///
    /// Returns an error if byte_count is 0 or exceeds [`MAX_TRANSFER_BYTES`].
    pub fn new(device_address: u16, byte_count: u16) -> Result<Self> {
        check_byte_count("byte_count", usize::from(byte_count))?;
        Ok(Self {
            device_address,
            byte_count,
        })
    }

    /// Creates a read command for a resolved address.
    pub fn for_address(resolved: &ResolvedAddress) -> Result<Self> {
        Self::new(resolved.device_address, resolved.byte_count)
    }

    /// Returns the device address.
    pub fn device_address(&self) -> u16 {
        self.device_address
    }

    /// Returns the number of bytes requested.
    pub fn byte_count(&self) -> u16 {
        self.byte_count
    }

    /// Returns the response this command expects.
    pub fn expected_response(&self) -> ExpectedResponse {
        ExpectedResponse::Data {
            byte_count: self.byte_count,
        }
    }

    /// Appends the serialized frame to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        let start = out.len();
        out.push(STX);
        out.push(CMD_READ);
        codec::push_hex_u16(out, self.device_address);
        // Bounded by MAX_TRANSFER_BYTES
        codec::push_hex_u8(out, self.byte_count as u8);
        finish_frame(out, start);
    }

    /// Serializes the command to bytes for transmission.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(11);
        self.encode_into(&mut bytes);
        bytes
    }
}

/// Command for writing bytes of device memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteCommand {
    device_address: u16,
    data: Vec<u8>,
}

impl WriteCommand {
    /// Creates a new write command.
    ///
    /// # Arguments
    ///
    /// * `device_address` - Device address of the first byte
    /// * `data` - Raw bytes to write (1-64 bytes)
    ///
    /// # Errors
    ///
    /// Returns an error if data is empty or longer than [`MAX_TRANSFER_BYTES`].
    ///
    /// # Example
    ///
    /// ```
    /// use fx_link::WriteCommand;
    ///
    /// // D20 = 1000, D21 = 2000, low byte first
    /// let cmd = WriteCommand::new(0x1028, &[0xE8, 0x03, 0xD0, 0x07]).unwrap();
    /// assert_eq!(&cmd.to_bytes()[1..16], b"1102804E803D007");
    /// ```
    pub fn new(device_address: u16, data: &[u8]) -> Result<Self> {
        check_byte_count("data", data.len())?;
        Ok(Self {
            device_address,
            data: data.to_vec(),
        })
    }

    /// Returns the device address.
    pub fn device_address(&self) -> u16 {
        self.device_address
    }

    /// Returns the payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the response this command expects.
    pub fn expected_response(&self) -> ExpectedResponse {
        ExpectedResponse::Ack
    }

    /// Appends the serialized frame to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        let start = out.len();
        out.push(STX);
        out.push(CMD_WRITE);
        codec::push_hex_u16(out, self.device_address);
        codec::push_hex_u8(out, self.data.len() as u8);
        codec::encode_hex(&self.data, out);
        finish_frame(out, start);
    }

    /// Serializes the command to bytes for transmission.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(11 + 2 * self.data.len());
        self.encode_into(&mut bytes);
        bytes
    }
}

/// Command for forcing a single bit device ON or OFF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForceBitCommand {
    device_address: u16,
    value: bool,
}

impl ForceBitCommand {
    /// Creates a new force command for a forced-bit device address.
    ///
    /// # Example
    ///
    /// ```
    /// use fx_link::ForceBitCommand;
    ///
    /// // M500 set: address 09F4 goes out as "F409"
    /// let cmd = ForceBitCommand::new(0x09F4, true);
    /// assert_eq!(&cmd.to_bytes()[1..6], b"7F409");
    /// ```
    pub fn new(device_address: u16, value: bool) -> Self {
        Self {
            device_address,
            value,
        }
    }

    /// Creates a force command for a resolved forced-bit address.
    pub fn for_address(forced: &ForcedAddress, value: bool) -> Self {
        Self::new(forced.device_address, value)
    }

    /// Returns the device address.
    pub fn device_address(&self) -> u16 {
        self.device_address
    }

    /// Returns the command code: `0x37` to set, `0x38` to reset.
    pub fn command_code(&self) -> u8 {
        if self.value {
            CMD_FORCE_ON
        } else {
            CMD_FORCE_OFF
        }
    }

    /// Returns the response this command expects.
    pub fn expected_response(&self) -> ExpectedResponse {
        ExpectedResponse::Ack
    }

    /// Appends the serialized frame to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        let start = out.len();
        out.push(STX);
        out.push(self.command_code());
        // Force commands carry the address digit pairs swapped: "09F4" is sent as "F409"
        codec::push_hex_u16(out, self.device_address.swap_bytes());
        finish_frame(out, start);
    }

    /// Serializes the command to bytes for transmission.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(9);
        self.encode_into(&mut bytes);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{resolve, resolve_forced};
    use crate::register::RegisterKind;

    fn frame(body: &[u8]) -> Vec<u8> {
        let mut bytes = vec![STX];
        bytes.extend_from_slice(body);
        bytes.push(ETX);
        bytes.extend_from_slice(&codec::checksum(&bytes[1..]));
        bytes
    }

    #[test]
    fn test_read_command_serialization() {
        let cmd = ReadCommand::new(0x1028, 4).unwrap();
        let bytes = cmd.to_bytes();

        // STX + cmd + address (4) + count (2) + ETX + checksum (2) = 11 bytes
        assert_eq!(bytes.len(), 11);
        assert_eq!(bytes[0], STX);
        assert_eq!(bytes[1], CMD_READ);
        assert_eq!(&bytes[2..6], b"1028");
        assert_eq!(&bytes[6..8], b"04");
        assert_eq!(bytes[8], ETX);
        assert_eq!(&bytes[9..], b"62");
        assert_eq!(bytes, frame(b"0102804"));
    }

    #[test]
    fn test_read_command_for_output_contacts() {
        let resolved = resolve(RegisterKind::OutputContact, 10, 2).unwrap();
        let cmd = ReadCommand::for_address(&resolved).unwrap();
        assert_eq!(cmd.to_bytes(), frame(b"000A101"));
        assert_eq!(cmd.expected_response().len(), 6);
    }

    #[test]
    fn test_read_command_invalid_count() {
        assert!(ReadCommand::new(0x1000, 0).is_err());
        assert!(ReadCommand::new(0x1000, 64).is_ok());
        assert!(matches!(
            ReadCommand::new(0x1000, 65).unwrap_err(),
            FxError::TooManyBytes { .. }
        ));
    }

    #[test]
    fn test_write_command_serialization() {
        let cmd = WriteCommand::new(0x1028, &[0xE8, 0x03, 0xD0, 0x07]).unwrap();
        let bytes = cmd.to_bytes();

        // STX + cmd + address (4) + count (2) + data (8) + ETX + checksum (2) = 19 bytes
        assert_eq!(bytes.len(), 19);
        assert_eq!(bytes[1], CMD_WRITE);
        assert_eq!(&bytes[6..8], b"04");
        assert_eq!(&bytes[8..16], b"E803D007");
        assert_eq!(bytes, frame(b"1102804E803D007"));
        assert_eq!(cmd.expected_response(), ExpectedResponse::Ack);
    }

    #[test]
    fn test_write_command_invalid_data() {
        assert!(WriteCommand::new(0x1000, &[]).is_err());
        assert!(WriteCommand::new(0x1000, &[0u8; 65]).is_err());
    }

    #[test]
    fn test_force_command_swaps_address_pairs() {
        let forced = resolve_forced(RegisterKind::MemoryContact, 500).unwrap();
        let cmd = ForceBitCommand::for_address(&forced, true);
        let bytes = cmd.to_bytes();

        // STX + cmd + address (4) + ETX + checksum (2) = 9 bytes
        assert_eq!(bytes.len(), 9);
        assert_eq!(cmd.command_code(), 0x37);
        assert_eq!(&bytes[2..6], b"F409");
        assert_eq!(bytes, frame(b"7F409"));
    }

    #[test]
    fn test_force_command_reset() {
        let cmd = ForceBitCommand::new(0x0508, false);
        assert_eq!(cmd.command_code(), 0x38);
        assert_eq!(cmd.to_bytes(), frame(b"80805"));
        assert_eq!(cmd.expected_response(), ExpectedResponse::Ack);
    }

    #[test]
    fn test_encode_into_reuses_buffer() {
        let mut buffer = Vec::with_capacity(140);
        ReadCommand::new(0x1000, 2).unwrap().encode_into(&mut buffer);
        let first = buffer.clone();
        buffer.clear();
        ReadCommand::new(0x1000, 2).unwrap().encode_into(&mut buffer);
        assert_eq!(buffer, first);
    }
}
