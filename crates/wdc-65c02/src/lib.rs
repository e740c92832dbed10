//! Cycle-accurate WDC W65C02S CPU core.
//!
//! Every clock edge performs exactly one bus access. Instructions are
//! broken into micro-ops owned by their addressing mode; the operation
//! bound to an opcode only supplies semantics. IRQ, NMI and RESET run as
//! pseudo-modes of their own, chosen at instruction boundaries.
//!
//! The core talks to the outside world only through [`emu_core::Bus`]:
//! drive it with a [`emu_core::Clock`], putting the CPU first.

mod config;
mod cpu;
mod disasm;
mod instruction;
mod micro_op;
mod mode;
mod operation;
mod registers;
mod state;
pub mod status;

pub use config::{CpuConfig, UndocumentedOpcodes};
pub use cpu::W65C02;
pub use disasm::{Disassembly, disassemble};
pub use instruction::{ALWAYS_EXTRA_CYCLE, Instruction, InstructionTable};
pub use micro_op::{BusAccess, Cycle, Index, MicroOp};
pub use mode::{AddressMode, IRQ_VECTOR, ModeDescriptor, ModeTable, NMI_VECTOR, RESET_VECTOR};
pub use operation::{Access, Operation};
pub use registers::{Registers, STACK_PAGE};
pub use state::{CpuState, Sequence};
pub use status::StatusRegister;
