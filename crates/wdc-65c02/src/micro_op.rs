//! Cycle-actions: one clock edge's worth of work.
//!
//! Each [`MicroOp`] has two halves. [`MicroOp::setup`] runs during `tick()`
//! and says what the bus should do this cycle; it only looks at state.
//! [`MicroOp::complete`] runs during `post_tick()` with the byte that ended
//! up on the data bus and updates state. A setup may answer [`Cycle::Skip`],
//! in which case the engine moves straight on to the next micro-op within
//! the same edge.

use crate::{CpuState, status};

/// Index register used by an indexed micro-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    X,
    Y,
}

impl Index {
    const fn value(self, cpu: &CpuState) -> u8 {
        match self {
            Self::X => cpu.regs.x,
            Self::Y => cpu.regs.y,
        }
    }
}

/// A single bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusAccess {
    Read(u16),
    Write(u16, u8),
}

impl BusAccess {
    #[must_use]
    pub const fn address(self) -> u16 {
        match self {
            Self::Read(addr) | Self::Write(addr, _) => addr,
        }
    }
}

/// Outcome of a micro-op's setup phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// Nothing to do this cycle; fall through to the next micro-op.
    Skip,
    /// Run this bus transaction.
    Execute(BusAccess),
}

/// Every kind of cycle the 65C02 performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicroOp {
    /// Read the opcode at PC. Implicit first cycle of every instruction.
    FetchOpcode,
    /// Read PC and discard it.
    InternalRead,
    /// Read PC, then run an implied operation.
    ImpliedExecute,
    /// Read PC, then run a modify operation on A.
    AccumulatorExecute,
    /// Read the operand byte at PC and hand it to the operation.
    ReadImmediate,
    /// Fetch the low operand byte into the instruction register.
    OperandLo,
    /// Fetch the high operand byte.
    OperandHi,
    /// Fetch the high operand byte and add an index, noting any page carry.
    OperandHiIndexed(Index),
    /// Dummy read of the zero-page base while the index is added (no carry out of page zero).
    IndexZeroPage(Index),
    /// Dummy read while an index is added to a 16-bit pointer (JMP (a,X)).
    IndexAbsolute(Index),
    /// Extra cycle paid when an index addition carried. Skipped otherwise.
    PageFixup,
    /// Read the effective address and hand the byte to the operation.
    ReadEffective,
    /// Write the operation's value to the effective address.
    WriteEffective,
    /// Read the effective address into the data register.
    LatchEffective,
    /// Re-read the effective address while the operation modifies the data register.
    ModifyDummy,
    /// Write the data register back to the effective address.
    WriteModified,
    /// Re-read the effective address and discard it.
    EffectiveDummy,
    /// Read the low byte of a zero-page pointer.
    PointerLo,
    /// Read the high byte of a zero-page pointer (wraps within page zero).
    PointerHi,
    /// Read the high byte of a zero-page pointer and add an index.
    PointerHiIndexed(Index),
    /// Read the low byte of a 16-bit pointer.
    PointerLoAbsolute,
    /// Read the high byte of a 16-bit pointer and jump.
    JumpIndirectHi,
    /// Dummy cycle of JMP (a) while the pointer is latched.
    IndirectDummy,
    /// Fetch the high operand byte and jump.
    JumpHi,
    /// Fetch a branch offset and decide whether the branch is taken.
    BranchOperand,
    /// Add the offset to PC when taken. Skipped otherwise.
    BranchTaken,
    /// Fix up PCH when the branch crossed a page. Skipped otherwise.
    BranchFixup,
    /// Read `depth` bytes below the stack top without moving SP.
    StackDummy(u8),
    PushPch,
    PushPcl,
    /// Push P. BRK pushes B set; IRQ and NMI push it clear.
    PushStatus { brk: bool },
    /// Push the operation's value.
    PushValue,
    /// Pull a byte and hand it to the operation.
    PullValue,
    PullStatus,
    PullPcl,
    PullPch,
    /// Pull PCH and jump to the pulled address.
    PullPchJump,
    /// Read the pulled return address and step past it (RTS).
    ReturnIncrement,
    /// Read and skip the BRK signature byte.
    BreakSignature,
    /// Read the low byte of a vector.
    VectorLo(u16),
    /// Read the high byte of a vector, jump, set I and clear D.
    VectorHi(u16),
}

impl MicroOp {
    /// True on the two cycles that read an interrupt or reset vector.
    #[must_use]
    pub const fn pulls_vector(self) -> bool {
        matches!(self, Self::VectorLo(_) | Self::VectorHi(_))
    }

    /// Bus phase: what this cycle puts on the bus.
    #[must_use]
    pub fn setup(self, cpu: &CpuState) -> Cycle {
        let regs = &cpu.regs;
        let ir = cpu.instruction_register;
        let operation = cpu.instruction.operation;

        let access = match self {
            Self::FetchOpcode
            | Self::InternalRead
            | Self::ImpliedExecute
            | Self::AccumulatorExecute
            | Self::ReadImmediate
            | Self::OperandLo
            | Self::OperandHi
            | Self::OperandHiIndexed(_)
            | Self::JumpHi
            | Self::BranchOperand
            | Self::BreakSignature => BusAccess::Read(regs.pc),

            Self::IndexZeroPage(_) | Self::PointerLo => BusAccess::Read(ir & 0x00FF),
            Self::PointerHi | Self::PointerHiIndexed(_) => {
                BusAccess::Read(u16::from((ir as u8).wrapping_add(1)))
            }

            Self::IndexAbsolute(_) | Self::IndirectDummy => {
                BusAccess::Read(regs.pc.wrapping_sub(1))
            }

            Self::PageFixup => {
                if !cpu.address_carry {
                    return Cycle::Skip;
                }
                // 65C02 re-reads the last operand byte instead of the
                // half-formed address the NMOS part put out.
                BusAccess::Read(regs.pc.wrapping_sub(1))
            }

            Self::ReadEffective
            | Self::LatchEffective
            | Self::ModifyDummy
            | Self::EffectiveDummy
            | Self::PointerLoAbsolute
            | Self::ReturnIncrement => BusAccess::Read(ir),

            Self::JumpIndirectHi => BusAccess::Read(ir.wrapping_add(1)),

            Self::WriteEffective => BusAccess::Write(ir, operation.write(cpu)),
            Self::WriteModified => BusAccess::Write(ir, cpu.data_register),

            Self::BranchTaken => {
                if !cpu.branch_taken {
                    return Cycle::Skip;
                }
                BusAccess::Read(regs.pc)
            }
            Self::BranchFixup => {
                if !cpu.address_carry {
                    return Cycle::Skip;
                }
                BusAccess::Read(regs.pc)
            }

            Self::StackDummy(depth) => BusAccess::Read(regs.stack_below(depth)),
            Self::PushPch => BusAccess::Write(regs.stack_top(), (regs.pc >> 8) as u8),
            Self::PushPcl => BusAccess::Write(regs.stack_top(), regs.pc as u8),
            Self::PushStatus { brk } => {
                let value = if brk {
                    regs.p.read_value()
                } else {
                    regs.p.interrupt_value()
                };
                BusAccess::Write(regs.stack_top(), value)
            }
            Self::PushValue => BusAccess::Write(regs.stack_top(), operation.write(cpu)),

            Self::PullValue
            | Self::PullStatus
            | Self::PullPcl
            | Self::PullPch
            | Self::PullPchJump => BusAccess::Read(regs.stack_next()),

            Self::VectorLo(vector) => BusAccess::Read(vector),
            Self::VectorHi(vector) => BusAccess::Read(vector.wrapping_add(1)),
        };
        Cycle::Execute(access)
    }

    /// Latch phase: consume the data bus and update state.
    pub fn complete(self, cpu: &mut CpuState, data: u8) {
        let operation = cpu.instruction.operation;

        match self {
            Self::FetchOpcode => {
                cpu.regs.pc = cpu.regs.pc.wrapping_add(1);
                cpu.data_register = data;
            }
            Self::InternalRead
            | Self::EffectiveDummy
            | Self::IndirectDummy
            | Self::StackDummy(_) => {}

            Self::ImpliedExecute => operation.implied(cpu),
            Self::AccumulatorExecute => {
                let a = cpu.regs.a;
                cpu.regs.a = operation.modify(cpu, a);
            }
            Self::ReadImmediate => {
                cpu.regs.pc = cpu.regs.pc.wrapping_add(1);
                cpu.data_register = data;
                operation.read(cpu, data);
            }

            Self::OperandLo => {
                cpu.regs.pc = cpu.regs.pc.wrapping_add(1);
                cpu.instruction_register = u16::from(data);
            }
            Self::OperandHi => {
                cpu.regs.pc = cpu.regs.pc.wrapping_add(1);
                cpu.instruction_register |= u16::from(data) << 8;
            }
            Self::OperandHiIndexed(index) => {
                cpu.regs.pc = cpu.regs.pc.wrapping_add(1);
                let base = cpu.instruction_register | (u16::from(data) << 8);
                add_index(cpu, base, index);
            }
            Self::IndexZeroPage(index) => {
                let zp = (cpu.instruction_register as u8).wrapping_add(index.value(cpu));
                cpu.instruction_register = u16::from(zp);
            }
            Self::IndexAbsolute(index) => {
                cpu.instruction_register = cpu
                    .instruction_register
                    .wrapping_add(u16::from(index.value(cpu)));
            }
            Self::PageFixup => cpu.address_carry = false,

            Self::ReadEffective => {
                cpu.data_register = data;
                operation.read(cpu, data);
            }
            Self::WriteEffective | Self::WriteModified => {}
            Self::LatchEffective | Self::PointerLo | Self::PointerLoAbsolute => {
                cpu.data_register = data;
            }
            Self::ModifyDummy => {
                let value = cpu.data_register;
                cpu.data_register = operation.modify(cpu, value);
            }

            Self::PointerHi => {
                cpu.instruction_register = u16::from(cpu.data_register) | (u16::from(data) << 8);
            }
            Self::PointerHiIndexed(index) => {
                let base = u16::from(cpu.data_register) | (u16::from(data) << 8);
                add_index(cpu, base, index);
            }
            Self::JumpIndirectHi | Self::VectorHi(_) => {
                cpu.regs.pc = u16::from(cpu.data_register) | (u16::from(data) << 8);
                if matches!(self, Self::VectorHi(_)) {
                    cpu.regs.p.set_flag(status::I, true);
                    cpu.regs.p.set_flag(status::D, false);
                }
            }
            Self::JumpHi => {
                cpu.regs.pc = cpu.instruction_register | (u16::from(data) << 8);
            }

            Self::BranchOperand => {
                cpu.regs.pc = cpu.regs.pc.wrapping_add(1);
                // BBR/BBS test the zero-page byte still held in the data register.
                cpu.branch_taken = operation.condition(cpu);
                cpu.data_register = data;
            }
            Self::BranchTaken => {
                let pc = cpu.regs.pc;
                let target = pc.wrapping_add(cpu.data_register as i8 as u16);
                cpu.address_carry = (target ^ pc) & 0xFF00 != 0;
                if cpu.address_carry {
                    cpu.instruction_register = target;
                } else {
                    cpu.regs.pc = target;
                }
            }
            Self::BranchFixup => {
                cpu.regs.pc = cpu.instruction_register;
                cpu.address_carry = false;
            }

            Self::PushPch | Self::PushPcl | Self::PushStatus { .. } | Self::PushValue => {
                cpu.regs.sp = cpu.regs.sp.wrapping_sub(1);
            }
            Self::PullValue => {
                cpu.regs.sp = cpu.regs.sp.wrapping_add(1);
                cpu.data_register = data;
                operation.read(cpu, data);
            }
            Self::PullStatus => {
                cpu.regs.sp = cpu.regs.sp.wrapping_add(1);
                cpu.regs.p.set_value(data);
            }
            Self::PullPcl => {
                cpu.regs.sp = cpu.regs.sp.wrapping_add(1);
                cpu.instruction_register = u16::from(data);
            }
            Self::PullPch => {
                cpu.regs.sp = cpu.regs.sp.wrapping_add(1);
                cpu.instruction_register |= u16::from(data) << 8;
            }
            Self::PullPchJump => {
                cpu.regs.sp = cpu.regs.sp.wrapping_add(1);
                cpu.regs.pc = cpu.instruction_register | (u16::from(data) << 8);
            }
            Self::ReturnIncrement => {
                cpu.regs.pc = cpu.instruction_register.wrapping_add(1);
            }
            Self::BreakSignature => cpu.regs.pc = cpu.regs.pc.wrapping_add(1),
            Self::VectorLo(_) => cpu.data_register = data,
        }
    }
}

/// Add an index to a 16-bit base. The fixup cycle is owed when the add
/// carries into the high byte or the opcode always pays it.
fn add_index(cpu: &mut CpuState, base: u16, index: Index) {
    let effective = base.wrapping_add(u16::from(index.value(cpu)));
    cpu.address_carry = (base ^ effective) & 0xFF00 != 0 || cpu.instruction.always_extra_cycle;
    cpu.instruction_register = effective;
}
