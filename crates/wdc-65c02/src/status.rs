//! 65C02 processor status register (P).
//!
//! ```text
//!  7 6 5 4 3 2 1 0
//!  N V - B D I Z C
//! ```
//!
//! Bits 5 and 4 have no storage on the 65C02. They always read back as 1,
//! which is why a pushed P always shows B set; IRQ and NMI entry clear B in
//! the pushed copy only.

/// Carry flag - set if operation resulted in carry/borrow.
pub const C: u8 = 0x01;

/// Zero flag - set if result is zero.
pub const Z: u8 = 0x02;

/// Interrupt disable - when set, IRQ is ignored.
pub const I: u8 = 0x04;

/// Decimal mode - enables BCD arithmetic for ADC/SBC.
pub const D: u8 = 0x08;

/// Break bit. Forced to 1 on read.
pub const B: u8 = 0x10;

/// Unused bit. Forced to 1 on read.
pub const U: u8 = 0x20;

/// Overflow flag - set if signed arithmetic overflowed.
pub const V: u8 = 0x40;

/// Negative flag - set if result has bit 7 set.
pub const N: u8 = 0x80;

/// Bits that always read as 1.
pub const FORCED: u8 = B | U;

/// Processor status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRegister(u8);

impl Default for StatusRegister {
    fn default() -> Self {
        Self::power_on()
    }
}

impl StatusRegister {
    /// Value after reset: I set, D clear, forced bits high (`0b0011_0100`).
    #[must_use]
    pub const fn power_on() -> Self {
        Self(FORCED | I)
    }

    /// Build a status register from a raw byte, forcing bits 4 and 5.
    #[must_use]
    pub const fn from_value(value: u8) -> Self {
        Self(value | FORCED)
    }

    /// Check a flag (or any combination of flag bits).
    #[must_use]
    pub const fn flag(self, bit: u8) -> bool {
        self.read_value() & bit != 0
    }

    /// Set or clear a flag.
    pub fn set_flag(&mut self, bit: u8, on: bool) {
        if on {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
        self.0 |= FORCED;
    }

    /// Overwrite the whole register (PLP, RTI).
    pub fn set_value(&mut self, value: u8) {
        self.0 = value | FORCED;
    }

    /// Raw value as it would be pushed by BRK or PHP.
    #[must_use]
    pub const fn read_value(self) -> u8 {
        self.0 | FORCED
    }

    /// Value pushed by a hardware interrupt: B reads back clear on the stack.
    #[must_use]
    pub const fn interrupt_value(self) -> u8 {
        self.read_value() & !B
    }

    /// Update N and Z from a result byte.
    pub fn update_nz(&mut self, value: u8) {
        self.set_flag(N, value & 0x80 != 0);
        self.set_flag(Z, value == 0);
    }
}

impl std::fmt::Display for StatusRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const NAMES: [char; 8] = ['N', 'V', '-', 'B', 'D', 'I', 'Z', 'C'];
        let value = self.read_value();
        for (i, name) in NAMES.iter().enumerate() {
            let bit = 0x80 >> i;
            let shown = if value & bit != 0 {
                *name
            } else {
                name.to_ascii_lowercase()
            };
            write!(f, "{shown}")?;
        }
        Ok(())
    }
}
