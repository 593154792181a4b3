//! Address resolution for FX register kinds.
//!
//! User-facing addresses (`D20`, `Y10`, `M8002`, ...) are checked against the
//! register map and turned into the device-space address that goes on the
//! wire, together with the number of bytes a request has to transfer.
//!
//! Resolution happens in a fixed order:
//!
//! 1. Digit check: the last decimal digit must be valid in the kind's number
//!    base, so `Y8` and `X19` are rejected on the octal I/O points.
//! 2. Range check against the kind's `[min, max]`.
//! 3. Normalization (`address - min`) and linearization. X and Y addresses
//!    are octal grouped: each decade holds one group of 8 points.
//! 4. Device address and byte count, by width class.
//! 5. Byte count ceiling of [`MAX_TRANSFER_BYTES`].
//!
//! # Example
//!
//! ```
//! use fx_link::{resolve, RegisterKind};
//!
//! let resolved = resolve(RegisterKind::OutputContact, 10, 2).unwrap();
//! assert_eq!(resolved.linear, 8);
//! assert_eq!(resolved.device_address, 0x00A1);
//! assert_eq!(resolved.byte_count, 1);
//! ```

use crate::error::{FxError, Result};
use crate::register::{RegisterKind, UnitClass};

/// Maximum number of data bytes a single frame can carry.
pub const MAX_TRANSFER_BYTES: u16 = 64;

/// Result of resolving a user address and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAddress {
    /// Register kind that was resolved.
    pub kind: RegisterKind,
    /// User-facing address as passed in.
    pub address: u16,
    /// Zero-based linear address inside the kind.
    pub linear: u16,
    /// Device address transmitted in the frame.
    pub device_address: u16,
    /// Offset of the first byte of the transfer.
    pub first_byte: u16,
    /// Offset of the last byte of the transfer.
    pub last_byte: u16,
    /// Number of bytes to transfer.
    pub byte_count: u16,
}

impl ResolvedAddress {
    /// Returns the bit position of the start address inside its first byte.
    ///
    /// Always 0 for word kinds with an even linear address and for
    /// byte-aligned bit addresses.
    pub fn bit_offset(&self) -> u8 {
        (self.linear % 8) as u8
    }
}

/// Result of resolving a forced-bit address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedAddress {
    /// Register kind that was resolved.
    pub kind: RegisterKind,
    /// User-facing address as passed in.
    pub address: u16,
    /// Zero-based linear address inside the kind.
    pub linear: u16,
    /// Forced-bit device address transmitted in the frame.
    pub device_address: u16,
}

/// Resolves a user address and unit count into a device address and byte count.
///
/// `length` is counted in units of the kind: bits for bit kinds, registers
/// for word kinds. A length of 0 is not rejected here; callers are expected
/// to pass at least one unit.
///
/// # Errors
///
/// - [`FxError::IncorrectAddressFormat`] if the last digit exceeds the number base
/// - [`FxError::AddressOutOfRange`] if the address is outside the kind's range
/// - [`FxError::TooManyBytes`] if the transfer exceeds [`MAX_TRANSFER_BYTES`]
///
/// # Example
///
/// ```
/// use fx_link::{resolve, RegisterKind};
///
/// let resolved = resolve(RegisterKind::Data, 20, 2).unwrap();
/// assert_eq!(resolved.device_address, 0x1028);
/// assert_eq!(resolved.byte_count, 4);
///
/// // Y8 does not exist, outputs are octal numbered
/// assert!(resolve(RegisterKind::OutputContact, 8, 1).is_err());
/// ```
pub fn resolve(kind: RegisterKind, address: u16, length: u16) -> Result<ResolvedAddress> {
    let linear = linearize(kind, check_address(kind, address)?);
    let entry = kind.entry();

    let base = u32::from(entry.base_offset);
    let lin = u32::from(linear);
    let len = u32::from(length);

    let (device_address, first_byte, last_byte) = match kind.class() {
        UnitClass::Bit => (base + lin / 8, lin / 8, (lin + len).saturating_sub(1) / 8),
        UnitClass::Word16 => (base + 2 * lin, lin, (lin + 2 * len).saturating_sub(1)),
        UnitClass::Word32 => (base + 4 * lin, lin, (lin + 4 * len).saturating_sub(1)),
    };
    let byte_count = (last_byte + 1).saturating_sub(first_byte);

    if byte_count > u32::from(MAX_TRANSFER_BYTES) {
        return Err(FxError::TooManyBytes {
            byte_count,
            limit: MAX_TRANSFER_BYTES,
        });
    }

    // Bounded by the register map and the byte ceiling above.
    Ok(ResolvedAddress {
        kind,
        address,
        linear,
        device_address: device_address as u16,
        first_byte: first_byte as u16,
        last_byte: last_byte as u16,
        byte_count: byte_count as u16,
    })
}

/// Resolves the address of a single bit for the force set/reset commands.
///
/// # Errors
///
/// - [`FxError::IncorrectAddressFormat`] if the last digit exceeds the number base
/// - [`FxError::IncorrectDataType`] if the kind is not a bit kind
/// - [`FxError::AddressOutOfRange`] if the address is outside the kind's range
///
/// # Example
///
/// ```
/// use fx_link::{resolve_forced, RegisterKind};
///
/// let forced = resolve_forced(RegisterKind::MemoryContact, 500).unwrap();
/// assert_eq!(forced.device_address, 0x09F4);
/// ```
pub fn resolve_forced(kind: RegisterKind, address: u16) -> Result<ForcedAddress> {
    check_digit(kind, address)?;
    if !kind.is_bit() {
        return Err(FxError::IncorrectDataType {
            kind,
            operation: "force_bit",
        });
    }
    let linear = linearize(kind, check_range(kind, address)?);

    Ok(ForcedAddress {
        kind,
        address,
        linear,
        device_address: kind.entry().forced_base + linear,
    })
}

/// Runs the digit and range checks, returning the normalized address.
fn check_address(kind: RegisterKind, address: u16) -> Result<u16> {
    check_digit(kind, address)?;
    check_range(kind, address)
}

fn check_digit(kind: RegisterKind, address: u16) -> Result<()> {
    let number_base = kind.entry().number_base;
    if address % 10 > u16::from(number_base) - 1 {
        return Err(FxError::IncorrectAddressFormat {
            kind,
            address,
            number_base,
        });
    }
    Ok(())
}

fn check_range(kind: RegisterKind, address: u16) -> Result<u16> {
    let entry = kind.entry();
    if address < entry.min_address || address > entry.max_address {
        return Err(FxError::AddressOutOfRange {
            kind,
            address,
            min: entry.min_address,
            max: entry.max_address,
        });
    }
    Ok(address - entry.min_address)
}

fn linearize(kind: RegisterKind, normalized: u16) -> u16 {
    if kind.is_octal() {
        8 * (normalized / 10) + normalized % 10
    } else {
        normalized
    }
}
