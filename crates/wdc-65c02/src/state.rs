//! Live machine state shared by the engine, micro-ops and operations.

use crate::{AddressMode, Instruction, Registers};

/// Which sequence the engine is walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    /// Normal opcode fetch followed by the decoded instruction's micro-ops.
    Opcode,
    /// Maskable interrupt entry.
    Irq,
    /// Non-maskable interrupt entry.
    Nmi,
    /// Reset entry.
    Reset,
}

/// Everything the 65C02 remembers between clock edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    pub regs: Registers,
    /// Instruction decoded by the last opcode fetch.
    pub instruction: Instruction,
    pub sequence: Sequence,
    /// Cycle within the current sequence. 0 is the opcode fetch (or its
    /// interrupt/reset stand-in); micro-op `n` of the mode runs at step `n + 1`.
    pub step: usize,
    /// 16-bit operand latch. Holds the effective address once it is formed.
    pub instruction_register: u16,
    /// 8-bit data latch for operands, pointer low bytes and branch offsets.
    pub data_register: u8,
    /// An index addition carried into the high byte, or the opcode always
    /// pays the fixup cycle. Consumed by the next fixup micro-op.
    pub address_carry: bool,
    pub branch_taken: bool,
    /// IRQ line level sampled on the last active edge.
    pub irq_pending: bool,
    /// NMI falling edge seen and not yet serviced.
    pub nmi_pending: bool,
    /// NMI line state on the previous edge, for edge detection.
    pub nmi_previous: bool,
    /// Consecutive edges RESET has been held low.
    pub reset_hold: u8,
    /// Set by WAI; cleared by any pending interrupt.
    pub paused: bool,
    /// Set by STP; cleared only by reset.
    pub stopped: bool,
}

impl Default for CpuState {
    fn default() -> Self {
        Self::power_on()
    }
}

impl CpuState {
    /// State at power-on: about to run the reset sequence.
    #[must_use]
    pub const fn power_on() -> Self {
        Self {
            regs: Registers::power_on(),
            instruction: Instruction::NOP,
            sequence: Sequence::Reset,
            step: 0,
            instruction_register: 0,
            data_register: 0,
            address_carry: false,
            branch_taken: false,
            irq_pending: false,
            nmi_pending: false,
            nmi_previous: false,
            reset_hold: 0,
            paused: false,
            stopped: false,
        }
    }

    /// Addressing mode that owns the current sequence.
    #[must_use]
    pub const fn mode(&self) -> AddressMode {
        match self.sequence {
            Sequence::Opcode => self.instruction.mode,
            Sequence::Irq => AddressMode::Irq,
            Sequence::Nmi => AddressMode::Nmi,
            Sequence::Reset => AddressMode::Reset,
        }
    }

    /// Drop per-instruction latches at a sequence boundary.
    pub fn clear_latches(&mut self) {
        self.step = 0;
        self.instruction_register = 0;
        self.data_register = 0;
        self.address_carry = false;
        self.branch_taken = false;
    }
}
