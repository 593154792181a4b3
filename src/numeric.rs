//! Numeric and bit conversions for FX register data.
//!
//! FX word registers travel low byte first. 32-bit values (integers and
//! IEEE-754 floats) occupy two consecutive 16-bit registers, low register
//! first, so the four raw bytes are little-endian across the pair.
//!
//! Bit devices are packed eight per byte: bit `i` of a bit array lives in
//! bit `i % 8` of byte `i / 8`.
//!
//! # Example
//!
//! ```
//! use fx_link::numeric::{encode_f32, encode_i32, encode_u32, parse_f32, parse_i32, parse_u32};
//!
//! let mut registers = [0u16; 6];
//! encode_f32(&mut registers, 0, 1.25).unwrap();
//! encode_u32(&mut registers, 2, 150_000).unwrap();
//! encode_i32(&mut registers, 4, -160_000).unwrap();
//!
//! assert_eq!(parse_f32(&registers, 0).unwrap(), 1.25);
//! assert_eq!(parse_u32(&registers, 2).unwrap(), 150_000);
//! assert_eq!(parse_i32(&registers, 4).unwrap(), -160_000);
//! ```

use crate::error::{FxError, Result};

/// Mask of each bit position inside a byte, bit 0 first.
pub const BIT_MASKS: [u8; 8] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80];

/// Gets a single bit from a byte.
///
/// # Arguments
///
/// * `value` - The byte to extract from
/// * `bit` - Bit position (0-7, where 0 is LSB)
///
/// # Example
///
/// ```
/// use fx_link::numeric::get_bit;
///
/// let value: u8 = 0b0000_0101; // bits 0 and 2 are set
/// assert!(get_bit(value, 0));
/// assert!(!get_bit(value, 1));
/// assert!(get_bit(value, 2));
/// ```
#[inline]
pub fn get_bit(value: u8, bit: u8) -> bool {
    value & BIT_MASKS[usize::from(bit & 7)] != 0
}

/// Sets or clears a single bit in a byte and returns the result.
///
/// # Example
///
/// ```
/// use fx_link::numeric::set_bit;
///
/// assert_eq!(set_bit(0, 5, true), 0b0010_0000);
/// assert_eq!(set_bit(0xFF, 0, false), 0b1111_1110);
/// ```
#[inline]
pub fn set_bit(value: u8, bit: u8, state: bool) -> u8 {
    let mask = BIT_MASKS[usize::from(bit & 7)];
    if state {
        value | mask
    } else {
        value & !mask
    }
}

/// Packs a bit array into bytes, 8 bits per byte.
///
/// Trailing bits of the last byte that have no source value are 0.
///
/// # Example
///
/// ```
/// use fx_link::numeric::pack_bits;
///
/// assert_eq!(pack_bits(&[true, false, true]), vec![0b0000_0101]);
/// assert_eq!(pack_bits(&[false; 9]).len(), 2);
/// ```
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; bits.len().div_ceil(8)];
    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            bytes[i / 8] |= BIT_MASKS[i % 8];
        }
    }
    bytes
}

/// Extracts `count` bits from packed bytes, starting at bit `bit_offset`.
///
/// Bits past the end of `bytes` are not returned, so the result may be
/// shorter than `count`.
///
/// # Example
///
/// ```
/// use fx_link::numeric::unpack_bits;
///
/// // Bits 5, 6 and 7 of the first byte, then bit 0 of the second
/// assert_eq!(unpack_bits(&[0b1010_0000, 0x01], 5, 4), vec![true, false, true, true]);
/// ```
pub fn unpack_bits(bytes: &[u8], bit_offset: usize, count: usize) -> Vec<bool> {
    let available = (bytes.len() * 8).saturating_sub(bit_offset);
    (bit_offset..bit_offset + count.min(available))
        .map(|i| bytes[i / 8] & BIT_MASKS[i % 8] != 0)
        .collect()
}

/// Converts bytes to 16-bit registers, low byte first.
///
/// A trailing odd byte is ignored.
pub fn bytes_to_words(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Converts 16-bit registers to bytes, low byte first.
///
/// # Example
///
/// ```
/// use fx_link::numeric::words_to_bytes;
///
/// assert_eq!(words_to_bytes(&[1000, 2000]), vec![0xE8, 0x03, 0xD0, 0x07]);
/// ```
pub fn words_to_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// Converts bytes to 32-bit registers, least significant byte first.
///
/// Trailing bytes that do not fill a register are ignored.
pub fn bytes_to_dwords(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|quad| u32::from_le_bytes([quad[0], quad[1], quad[2], quad[3]]))
        .collect()
}

fn check_pair(len: usize, offset: usize) -> Result<()> {
    if offset.checked_add(2).map_or(true, |end| end > len) {
        return Err(FxError::invalid_parameter(
            "offset",
            format!(
                "register pair at {} does not fit a buffer of {} registers",
                offset, len
            ),
        ));
    }
    Ok(())
}

/// Reads an unsigned 32-bit value from the register pair at `offset`.
///
/// # Errors
///
/// Returns [`FxError::InvalidParameter`] if `offset + 1` is outside `registers`.
pub fn parse_u32(registers: &[u16], offset: usize) -> Result<u32> {
    check_pair(registers.len(), offset)?;
    Ok(u32::from(registers[offset]) | (u32::from(registers[offset + 1]) << 16))
}

/// Reads a signed 32-bit value from the register pair at `offset`.
///
/// # Errors
///
/// Returns [`FxError::InvalidParameter`] if `offset + 1` is outside `registers`.
pub fn parse_i32(registers: &[u16], offset: usize) -> Result<i32> {
    parse_u32(registers, offset).map(|v| v as i32)
}

/// Reads an IEEE-754 single precision float from the register pair at `offset`.
///
/// # Errors
///
/// Returns [`FxError::InvalidParameter`] if `offset + 1` is outside `registers`.
pub fn parse_f32(registers: &[u16], offset: usize) -> Result<f32> {
    parse_u32(registers, offset).map(f32::from_bits)
}

/// Writes an unsigned 32-bit value into the register pair at `offset`.
///
/// # Errors
///
/// Returns [`FxError::InvalidParameter`] if `offset + 1` is outside `registers`.
pub fn encode_u32(registers: &mut [u16], offset: usize, value: u32) -> Result<()> {
    check_pair(registers.len(), offset)?;
    registers[offset] = (value & 0xFFFF) as u16;
    registers[offset + 1] = (value >> 16) as u16;
    Ok(())
}

/// Writes a signed 32-bit value into the register pair at `offset`.
///
/// # Errors
///
/// Returns [`FxError::InvalidParameter`] if `offset + 1` is outside `registers`.
pub fn encode_i32(registers: &mut [u16], offset: usize, value: i32) -> Result<()> {
    encode_u32(registers, offset, value as u32)
}

/// Writes an IEEE-754 single precision float into the register pair at `offset`.
///
/// # Errors
///
/// Returns [`FxError::InvalidParameter`] if `offset + 1` is outside `registers`.
pub fn encode_f32(registers: &mut [u16], offset: usize, value: f32) -> Result<()> {
    encode_u32(registers, offset, value.to_bits())
}
