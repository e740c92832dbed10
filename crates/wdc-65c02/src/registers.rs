//! 65C02 programmer-visible registers.

use crate::StatusRegister;

/// Base of the hardware stack page.
pub const STACK_PAGE: u16 = 0x0100;

/// 65C02 register set.
///
/// - A: 8-bit accumulator
/// - X, Y: 8-bit index registers
/// - SP: 8-bit stack pointer (stack is at $0100-$01FF)
/// - PC: 16-bit program counter
/// - P: 8-bit processor status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer (points to next free location).
    pub sp: u8,
    /// Program counter.
    pub pc: u16,
    /// Processor status flags.
    pub p: StatusRegister,
}

impl Default for Registers {
    fn default() -> Self {
        Self::power_on()
    }
}

impl Registers {
    /// Register state loaded by the reset sequence.
    ///
    /// A, X and Y are undefined on silicon; we use 0. PC is left for the
    /// reset vector fetch to fill in.
    #[must_use]
    pub const fn power_on() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            p: StatusRegister::power_on(),
        }
    }

    /// Address the next push writes to.
    #[must_use]
    pub const fn stack_top(&self) -> u16 {
        STACK_PAGE | self.sp as u16
    }

    /// Address the next pull reads from.
    #[must_use]
    pub const fn stack_next(&self) -> u16 {
        STACK_PAGE | self.sp.wrapping_add(1) as u16
    }

    /// Address `depth` bytes below the stack top, wrapping inside page 1.
    #[must_use]
    pub const fn stack_below(&self, depth: u8) -> u16 {
        STACK_PAGE | self.sp.wrapping_sub(depth) as u16
    }
}
