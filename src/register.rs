//! Register kinds and the register map of FX PLCs.
//!
//! This module defines the [`RegisterKind`] enum and the static table of
//! addressing rules ([`RegisterMapEntry`]) behind it. Every other part of the
//! library looks addressing rules up through [`RegisterKind::entry`].
//!
//! # Register Kinds Overview
//!
//! | Kind | Device | User range | Numbering | Unit |
//! |------|--------|------------|-----------|------|
//! | State | S | 0-999 | decimal | bit |
//! | InputContact | X | 0-177 | octal | bit |
//! | OutputContact | Y | 0-177 | octal | bit |
//! | TimerContact | T | 0-255 | decimal | bit |
//! | Contact | C | 0-255 | decimal | bit |
//! | MemoryContact | M | 0-1023 | decimal | bit |
//! | MemorySpecial | M | 8000-8255 | decimal | bit |
//! | Counter32 | C | 200-255 | decimal | 32-bit word |
//! | TimerCounter16 | T | 0-255 | decimal | 16-bit word |
//! | Data | D | 0-511 | decimal | 16-bit word |
//! | DataSpecial | D | 8000-8255 | decimal | 16-bit word |
//! | Counter16 | C | 0-199 | decimal | 16-bit word |
//!
//! # Example
//!
//! ```
//! use fx_link::{RegisterKind, UnitClass};
//!
//! assert!(RegisterKind::OutputContact.is_bit());
//! assert_eq!(RegisterKind::OutputContact.entry().number_base, 8);
//! assert_eq!(RegisterKind::Counter32.class(), UnitClass::Word32);
//!
//! // Display the device letter
//! assert_eq!(RegisterKind::Data.to_string(), "D");
//! ```

/// Register kinds available in FX PLCs.
///
/// The set is closed: every kind has exactly one entry in the register map.
/// Bit kinds come first, word kinds last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegisterKind {
    /// S - step relays.
    State,
    /// X - physical inputs, octal numbered.
    InputContact,
    /// Y - physical outputs, octal numbered.
    OutputContact,
    /// T - timer contacts.
    TimerContact,
    /// C - counter contacts.
    Contact,
    /// M - auxiliary relays.
    MemoryContact,
    /// M8000-M8255 - special auxiliary relays.
    MemorySpecial,
    /// C200-C255 - 32-bit counter current values.
    Counter32,
    /// T - 16-bit timer current values.
    TimerCounter16,
    /// D - data registers.
    Data,
    /// D8000-D8255 - special data registers.
    DataSpecial,
    /// C0-C199 - 16-bit counter current values.
    Counter16,
}

/// Width class of a register kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitClass {
    /// Bit device, 8 devices per byte.
    Bit,
    /// 16-bit word register, 2 bytes per unit.
    Word16,
    /// 32-bit word register, 4 bytes per unit.
    Word32,
}

/// Addressing rules of one register kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterMapEntry {
    /// Device-space address of the first byte of the kind.
    pub base_offset: u16,
    /// Lowest user address.
    pub min_address: u16,
    /// Highest user address.
    pub max_address: u16,
    /// Number base of the user address digits (8 or 10).
    pub number_base: u8,
    /// Bytes per unit: 0 for bit kinds, 2 or 4 for word kinds.
    pub unit_size: u8,
    /// Device-space address of the first forced bit (bit kinds only).
    pub forced_base: u16,
}

impl RegisterMapEntry {
    const fn new(
        base_offset: u16,
        min_address: u16,
        max_address: u16,
        number_base: u8,
        unit_size: u8,
        forced_base: u16,
    ) -> Self {
        Self {
            base_offset,
            min_address,
            max_address,
            number_base,
            unit_size,
            forced_base,
        }
    }
}

const STATE: RegisterMapEntry = RegisterMapEntry::new(0x0000, 0, 999, 10, 0, 0x0000);
const INPUT_CONTACT: RegisterMapEntry = RegisterMapEntry::new(0x0080, 0, 177, 8, 0, 0x0400);
const OUTPUT_CONTACT: RegisterMapEntry = RegisterMapEntry::new(0x00A0, 0, 177, 8, 0, 0x0500);
const TIMER_CONTACT: RegisterMapEntry = RegisterMapEntry::new(0x00C0, 0, 255, 10, 0, 0x0600);
const CONTACT: RegisterMapEntry = RegisterMapEntry::new(0x01C0, 0, 255, 10, 0, 0x0E00);
const MEMORY_CONTACT: RegisterMapEntry = RegisterMapEntry::new(0x0100, 0, 1023, 10, 0, 0x0800);
const MEMORY_SPECIAL: RegisterMapEntry = RegisterMapEntry::new(0x01E0, 8000, 8255, 10, 0, 0x0F00);
const COUNTER_32: RegisterMapEntry = RegisterMapEntry::new(0x0C00, 200, 255, 10, 4, 0);
const TIMER_COUNTER_16: RegisterMapEntry = RegisterMapEntry::new(0x0800, 0, 255, 10, 2, 0);
const DATA: RegisterMapEntry = RegisterMapEntry::new(0x1000, 0, 511, 10, 2, 0);
const DATA_SPECIAL: RegisterMapEntry = RegisterMapEntry::new(0x0E00, 8000, 8255, 10, 2, 0);
const COUNTER_16: RegisterMapEntry = RegisterMapEntry::new(0x0A00, 0, 199, 10, 2, 0);

impl RegisterKind {
    /// All register kinds, bit kinds first.
    pub const ALL: [RegisterKind; 12] = [
        RegisterKind::State,
        RegisterKind::InputContact,
        RegisterKind::OutputContact,
        RegisterKind::TimerContact,
        RegisterKind::Contact,
        RegisterKind::MemoryContact,
        RegisterKind::MemorySpecial,
        RegisterKind::Counter32,
        RegisterKind::TimerCounter16,
        RegisterKind::Data,
        RegisterKind::DataSpecial,
        RegisterKind::Counter16,
    ];

    /// Returns the register map entry of this kind.
    ///
    /// # Example
    ///
    /// ```
    /// use fx_link::RegisterKind;
    ///
    /// let entry = RegisterKind::Data.entry();
    /// assert_eq!(entry.base_offset, 0x1000);
    /// assert_eq!(entry.max_address, 511);
    /// ```
    pub fn entry(self) -> &'static RegisterMapEntry {
        match self {
            RegisterKind::State => &STATE,
            RegisterKind::InputContact => &INPUT_CONTACT,
            RegisterKind::OutputContact => &OUTPUT_CONTACT,
            RegisterKind::TimerContact => &TIMER_CONTACT,
            RegisterKind::Contact => &CONTACT,
            RegisterKind::MemoryContact => &MEMORY_CONTACT,
            RegisterKind::MemorySpecial => &MEMORY_SPECIAL,
            RegisterKind::Counter32 => &COUNTER_32,
            RegisterKind::TimerCounter16 => &TIMER_COUNTER_16,
            RegisterKind::Data => &DATA,
            RegisterKind::DataSpecial => &DATA_SPECIAL,
            RegisterKind::Counter16 => &COUNTER_16,
        }
    }

    /// Returns the width class of this kind.
    pub fn class(self) -> UnitClass {
        match self.entry().unit_size {
            0 => UnitClass::Bit,
            4 => UnitClass::Word32,
            _ => UnitClass::Word16,
        }
    }

    /// Returns whether this kind is bit-addressable.
    ///
    /// # Example
    ///
    /// ```
    /// use fx_link::RegisterKind;
    ///
    /// assert!(RegisterKind::MemoryContact.is_bit());
    /// assert!(!RegisterKind::Data.is_bit());
    /// ```
    pub fn is_bit(self) -> bool {
        self.class() == UnitClass::Bit
    }

    /// Returns whether user addresses of this kind are octal grouped (X and Y).
    pub fn is_octal(self) -> bool {
        matches!(self, RegisterKind::InputContact | RegisterKind::OutputContact)
    }

    /// Returns the device letter used on PLC documentation and panels.
    pub fn device_letter(self) -> &'static str {
        match self {
            RegisterKind::State => "S",
            RegisterKind::InputContact => "X",
            RegisterKind::OutputContact => "Y",
            RegisterKind::TimerContact | RegisterKind::TimerCounter16 => "T",
            RegisterKind::Contact | RegisterKind::Counter32 | RegisterKind::Counter16 => "C",
            RegisterKind::MemoryContact | RegisterKind::MemorySpecial => "M",
            RegisterKind::Data | RegisterKind::DataSpecial => "D",
        }
    }
}

impl std::fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.device_letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_kinds() {
        for kind in &RegisterKind::ALL[..7] {
            assert!(kind.is_bit(), "{:?} should be a bit kind", kind);
            assert_eq!(kind.entry().unit_size, 0);
        }
        for kind in &RegisterKind::ALL[7..] {
            assert!(!kind.is_bit(), "{:?} should be a word kind", kind);
            assert_eq!(kind.entry().forced_base, 0);
        }
    }

    #[test]
    fn test_classes() {
        assert_eq!(RegisterKind::State.class(), UnitClass::Bit);
        assert_eq!(RegisterKind::Counter32.class(), UnitClass::Word32);
        assert_eq!(RegisterKind::TimerCounter16.class(), UnitClass::Word16);
        assert_eq!(RegisterKind::Data.class(), UnitClass::Word16);
        assert_eq!(RegisterKind::DataSpecial.class(), UnitClass::Word16);
        assert_eq!(RegisterKind::Counter16.class(), UnitClass::Word16);
    }

    #[test]
    fn test_octal_kinds() {
        assert!(RegisterKind::InputContact.is_octal());
        assert!(RegisterKind::OutputContact.is_octal());
        assert!(!RegisterKind::MemoryContact.is_octal());
        assert_eq!(RegisterKind::InputContact.entry().number_base, 8);
        assert_eq!(RegisterKind::MemoryContact.entry().number_base, 10);
    }

    #[test]
    fn test_map_entries() {
        let y = RegisterKind::OutputContact.entry();
        assert_eq!(y.base_offset, 0x00A0);
        assert_eq!(y.forced_base, 0x0500);
        assert_eq!((y.min_address, y.max_address), (0, 177));

        let m_special = RegisterKind::MemorySpecial.entry();
        assert_eq!(m_special.base_offset, 0x01E0);
        assert_eq!((m_special.min_address, m_special.max_address), (8000, 8255));

        let counter32 = RegisterKind::Counter32.entry();
        assert_eq!(counter32.base_offset, 0x0C00);
        assert_eq!(counter32.min_address, 200);
    }

    #[test]
    fn test_display() {
        assert_eq!(RegisterKind::State.to_string(), "S");
        assert_eq!(RegisterKind::InputContact.to_string(), "X");
        assert_eq!(RegisterKind::OutputContact.to_string(), "Y");
        assert_eq!(RegisterKind::MemorySpecial.to_string(), "M");
        assert_eq!(RegisterKind::Counter32.to_string(), "C");
        assert_eq!(RegisterKind::DataSpecial.to_string(), "D");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        for kind in RegisterKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            let back: RegisterKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
        assert_eq!(
            serde_json::to_string(&RegisterKind::OutputContact).unwrap(),
            "\"OutputContact\""
        );
    }
}
