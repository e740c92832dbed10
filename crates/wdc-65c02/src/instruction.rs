//! Opcode decode table.

use crate::config::UndocumentedOpcodes;
use crate::mode::{AddressMode, ModeTable};
use crate::operation::Operation;

use AddressMode as M;
use Operation as O;

/// A decoded opcode: what it does and how it touches the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub operation: Operation,
    pub mode: AddressMode,
    /// Pays the index fixup cycle even without a page crossing.
    pub always_extra_cycle: bool,
    /// Part of the WDC opcode map rather than a filled-in NOP.
    pub documented: bool,
}

impl Instruction {
    /// NOP, used as the decode latch before the first fetch.
    pub const NOP: Self = Self {
        opcode: 0xEA,
        operation: Operation::Nop,
        mode: AddressMode::Implied,
        always_extra_cycle: false,
        documented: true,
    };

    #[must_use]
    pub const fn mnemonic(&self) -> &'static str {
        self.operation.mnemonic()
    }
}

/// Indexed stores and INC/DEC abs,X spend the fixup cycle unconditionally.
pub const ALWAYS_EXTRA_CYCLE: [u8; 6] = [0x91, 0x99, 0x9D, 0x9E, 0xDE, 0xFE];

/// The WDC W65C02S opcode map.
const DOCUMENTED: &[(u8, Operation, AddressMode)] = &[
    (0x00, O::Brk, M::Brk),
    (0x01, O::Ora, M::IndexedIndirect),
    (0x04, O::Tsb, M::ZeroPageRmw),
    (0x05, O::Ora, M::ZeroPage),
    (0x06, O::Asl, M::ZeroPageRmw),
    (0x07, O::Rmb(0), M::ZeroPageRmw),
    (0x08, O::Php, M::Push),
    (0x09, O::Ora, M::Immediate),
    (0x0A, O::Asl, M::Accumulator),
    (0x0C, O::Tsb, M::AbsoluteRmw),
    (0x0D, O::Ora, M::Absolute),
    (0x0E, O::Asl, M::AbsoluteRmw),
    (0x0F, O::Bbr(0), M::ZeroPageRelative),
    (0x10, O::Bpl, M::Relative),
    (0x11, O::Ora, M::IndirectIndexed),
    (0x12, O::Ora, M::ZeroPageIndirect),
    (0x14, O::Trb, M::ZeroPageRmw),
    (0x15, O::Ora, M::ZeroPageX),
    (0x16, O::Asl, M::ZeroPageXRmw),
    (0x17, O::Rmb(1), M::ZeroPageRmw),
    (0x18, O::Clc, M::Implied),
    (0x19, O::Ora, M::AbsoluteY),
    (0x1A, O::Inc, M::Accumulator),
    (0x1C, O::Trb, M::AbsoluteRmw),
    (0x1D, O::Ora, M::AbsoluteX),
    (0x1E, O::Asl, M::AbsoluteXRmw),
    (0x1F, O::Bbr(1), M::ZeroPageRelative),
    (0x20, O::Jsr, M::Jsr),
    (0x21, O::And, M::IndexedIndirect),
    (0x24, O::Bit, M::ZeroPage),
    (0x25, O::And, M::ZeroPage),
    (0x26, O::Rol, M::ZeroPageRmw),
    (0x27, O::Rmb(2), M::ZeroPageRmw),
    (0x28, O::Plp, M::Pull),
    (0x29, O::And, M::Immediate),
    (0x2A, O::Rol, M::Accumulator),
    (0x2C, O::Bit, M::Absolute),
    (0x2D, O::And, M::Absolute),
    (0x2E, O::Rol, M::AbsoluteRmw),
    (0x2F, O::Bbr(2), M::ZeroPageRelative),
    (0x30, O::Bmi, M::Relative),
    (0x31, O::And, M::IndirectIndexed),
    (0x32, O::And, M::ZeroPageIndirect),
    (0x34, O::Bit, M::ZeroPageX),
    (0x35, O::And, M::ZeroPageX),
    (0x36, O::Rol, M::ZeroPageXRmw),
    (0x37, O::Rmb(3), M::ZeroPageRmw),
    (0x38, O::Sec, M::Implied),
    (0x39, O::And, M::AbsoluteY),
    (0x3A, O::Dec, M::Accumulator),
    (0x3C, O::Bit, M::AbsoluteX),
    (0x3D, O::And, M::AbsoluteX),
    (0x3E, O::Rol, M::AbsoluteXRmw),
    (0x3F, O::Bbr(3), M::ZeroPageRelative),
    (0x40, O::Rti, M::Rti),
    (0x41, O::Eor, M::IndexedIndirect),
    (0x45, O::Eor, M::ZeroPage),
    (0x46, O::Lsr, M::ZeroPageRmw),
    (0x47, O::Rmb(4), M::ZeroPageRmw),
    (0x48, O::Pha, M::Push),
    (0x49, O::Eor, M::Immediate),
    (0x4A, O::Lsr, M::Accumulator),
    (0x4C, O::Jmp, M::AbsoluteJump),
    (0x4D, O::Eor, M::Absolute),
    (0x4E, O::Lsr, M::AbsoluteRmw),
    (0x4F, O::Bbr(4), M::ZeroPageRelative),
    (0x50, O::Bvc, M::Relative),
    (0x51, O::Eor, M::IndirectIndexed),
    (0x52, O::Eor, M::ZeroPageIndirect),
    (0x55, O::Eor, M::ZeroPageX),
    (0x56, O::Lsr, M::ZeroPageXRmw),
    (0x57, O::Rmb(5), M::ZeroPageRmw),
    (0x58, O::Cli, M::Implied),
    (0x59, O::Eor, M::AbsoluteY),
    (0x5A, O::Phy, M::Push),
    (0x5D, O::Eor, M::AbsoluteX),
    (0x5E, O::Lsr, M::AbsoluteXRmw),
    (0x5F, O::Bbr(5), M::ZeroPageRelative),
    (0x60, O::Rts, M::Rts),
    (0x61, O::Adc, M::IndexedIndirect),
    (0x64, O::Stz, M::ZeroPageWrite),
    (0x65, O::Adc, M::ZeroPage),
    (0x66, O::Ror, M::ZeroPageRmw),
    (0x67, O::Rmb(6), M::ZeroPageRmw),
    (0x68, O::Pla, M::Pull),
    (0x69, O::Adc, M::Immediate),
    (0x6A, O::Ror, M::Accumulator),
    (0x6C, O::Jmp, M::AbsoluteIndirect),
    (0x6D, O::Adc, M::Absolute),
    (0x6E, O::Ror, M::AbsoluteRmw),
    (0x6F, O::Bbr(6), M::ZeroPageRelative),
    (0x70, O::Bvs, M::Relative),
    (0x71, O::Adc, M::IndirectIndexed),
    (0x72, O::Adc, M::ZeroPageIndirect),
    (0x74, O::Stz, M::ZeroPageXWrite),
    (0x75, O::Adc, M::ZeroPageX),
    (0x76, O::Ror, M::ZeroPageXRmw),
    (0x77, O::Rmb(7), M::ZeroPageRmw),
    (0x78, O::Sei, M::Implied),
    (0x79, O::Adc, M::AbsoluteY),
    (0x7A, O::Ply, M::Pull),
    (0x7C, O::Jmp, M::AbsoluteIndexedIndirect),
    (0x7D, O::Adc, M::AbsoluteX),
    (0x7E, O::Ror, M::AbsoluteXRmw),
    (0x7F, O::Bbr(7), M::ZeroPageRelative),
    (0x80, O::Bra, M::Relative),
    (0x81, O::Sta, M::IndexedIndirectWrite),
    (0x84, O::Sty, M::ZeroPageWrite),
    (0x85, O::Sta, M::ZeroPageWrite),
    (0x86, O::Stx, M::ZeroPageWrite),
    (0x87, O::Smb(0), M::ZeroPageRmw),
    (0x88, O::Dey, M::Implied),
    (0x89, O::BitImmediate, M::Immediate),
    (0x8A, O::Txa, M::Implied),
    (0x8C, O::Sty, M::AbsoluteWrite),
    (0x8D, O::Sta, M::AbsoluteWrite),
    (0x8E, O::Stx, M::AbsoluteWrite),
    (0x8F, O::Bbs(0), M::ZeroPageRelative),
    (0x90, O::Bcc, M::Relative),
    (0x91, O::Sta, M::IndirectIndexedWrite),
    (0x92, O::Sta, M::ZeroPageIndirectWrite),
    (0x94, O::Sty, M::ZeroPageXWrite),
    (0x95, O::Sta, M::ZeroPageXWrite),
    (0x96, O::Stx, M::ZeroPageYWrite),
    (0x97, O::Smb(1), M::ZeroPageRmw),
    (0x98, O::Tya, M::Implied),
    (0x99, O::Sta, M::AbsoluteYWrite),
    (0x9A, O::Txs, M::Implied),
    (0x9C, O::Stz, M::AbsoluteWrite),
    (0x9D, O::Sta, M::AbsoluteXWrite),
    (0x9E, O::Stz, M::AbsoluteXWrite),
    (0x9F, O::Bbs(1), M::ZeroPageRelative),
    (0xA0, O::Ldy, M::Immediate),
    (0xA1, O::Lda, M::IndexedIndirect),
    (0xA2, O::Ldx, M::Immediate),
    (0xA4, O::Ldy, M::ZeroPage),
    (0xA5, O::Lda, M::ZeroPage),
    (0xA6, O::Ldx, M::ZeroPage),
    (0xA7, O::Smb(2), M::ZeroPageRmw),
    (0xA8, O::Tay, M::Implied),
    (0xA9, O::Lda, M::Immediate),
    (0xAA, O::Tax, M::Implied),
    (0xAC, O::Ldy, M::Absolute),
    (0xAD, O::Lda, M::Absolute),
    (0xAE, O::Ldx, M::Absolute),
    (0xAF, O::Bbs(2), M::ZeroPageRelative),
    (0xB0, O::Bcs, M::Relative),
    (0xB1, O::Lda, M::IndirectIndexed),
    (0xB2, O::Lda, M::ZeroPageIndirect),
    (0xB4, O::Ldy, M::ZeroPageX),
    (0xB5, O::Lda, M::ZeroPageX),
    (0xB6, O::Ldx, M::ZeroPageY),
    (0xB7, O::Smb(3), M::ZeroPageRmw),
    (0xB8, O::Clv, M::Implied),
    (0xB9, O::Lda, M::AbsoluteY),
    (0xBA, O::Tsx, M::Implied),
    (0xBC, O::Ldy, M::AbsoluteX),
    (0xBD, O::Lda, M::AbsoluteX),
    (0xBE, O::Ldx, M::AbsoluteY),
    (0xBF, O::Bbs(3), M::ZeroPageRelative),
    (0xC0, O::Cpy, M::Immediate),
    (0xC1, O::Cmp, M::IndexedIndirect),
    (0xC4, O::Cpy, M::ZeroPage),
    (0xC5, O::Cmp, M::ZeroPage),
    (0xC6, O::Dec, M::ZeroPageRmw),
    (0xC7, O::Smb(4), M::ZeroPageRmw),
    (0xC8, O::Iny, M::Implied),
    (0xC9, O::Cmp, M::Immediate),
    (0xCA, O::Dex, M::Implied),
    (0xCB, O::Wai, M::Halt),
    (0xCC, O::Cpy, M::Absolute),
    (0xCD, O::Cmp, M::Absolute),
    (0xCE, O::Dec, M::AbsoluteRmw),
    (0xCF, O::Bbs(4), M::ZeroPageRelative),
    (0xD0, O::Bne, M::Relative),
    (0xD1, O::Cmp, M::IndirectIndexed),
    (0xD2, O::Cmp, M::ZeroPageIndirect),
    (0xD5, O::Cmp, M::ZeroPageX),
    (0xD6, O::Dec, M::ZeroPageXRmw),
    (0xD7, O::Smb(5), M::ZeroPageRmw),
    (0xD8, O::Cld, M::Implied),
    (0xD9, O::Cmp, M::AbsoluteY),
    (0xDA, O::Phx, M::Push),
    (0xDB, O::Stp, M::Halt),
    (0xDD, O::Cmp, M::AbsoluteX),
    (0xDE, O::Dec, M::AbsoluteXRmw),
    (0xDF, O::Bbs(5), M::ZeroPageRelative),
    (0xE0, O::Cpx, M::Immediate),
    (0xE1, O::Sbc, M::IndexedIndirect),
    (0xE4, O::Cpx, M::ZeroPage),
    (0xE5, O::Sbc, M::ZeroPage),
    (0xE6, O::Inc, M::ZeroPageRmw),
    (0xE7, O::Smb(6), M::ZeroPageRmw),
    (0xE8, O::Inx, M::Implied),
    (0xE9, O::Sbc, M::Immediate),
    (0xEA, O::Nop, M::Implied),
    (0xEC, O::Cpx, M::Absolute),
    (0xED, O::Sbc, M::Absolute),
    (0xEE, O::Inc, M::AbsoluteRmw),
    (0xEF, O::Bbs(6), M::ZeroPageRelative),
    (0xF0, O::Beq, M::Relative),
    (0xF1, O::Sbc, M::IndirectIndexed),
    (0xF2, O::Sbc, M::ZeroPageIndirect),
    (0xF5, O::Sbc, M::ZeroPageX),
    (0xF6, O::Inc, M::ZeroPageXRmw),
    (0xF7, O::Smb(7), M::ZeroPageRmw),
    (0xF8, O::Sed, M::Implied),
    (0xF9, O::Sbc, M::AbsoluteY),
    (0xFA, O::Plx, M::Pull),
    (0xFD, O::Sbc, M::AbsoluteX),
    (0xFE, O::Inc, M::AbsoluteXRmw),
    (0xFF, O::Bbs(7), M::ZeroPageRelative),
];

/// All 256 opcodes, built and checked once.
#[derive(Debug, Clone)]
pub struct InstructionTable {
    entries: Vec<Instruction>,
}

impl InstructionTable {
    /// Build the table, filling unassigned opcodes per `policy`.
    ///
    /// # Panics
    ///
    /// If an opcode is bound twice or an operation is bound to a mode of
    /// the wrong access class. Both are defects in the table itself.
    #[must_use]
    pub fn new(modes: &ModeTable, policy: UndocumentedOpcodes) -> Self {
        let mut slots: [Option<Instruction>; 256] = [None; 256];

        for &(opcode, operation, mode) in DOCUMENTED {
            let slot = &mut slots[usize::from(opcode)];
            assert!(slot.is_none(), "opcode ${opcode:02X} is bound twice");
            *slot = Some(Instruction {
                opcode,
                operation,
                mode,
                always_extra_cycle: ALWAYS_EXTRA_CYCLE.contains(&opcode),
                documented: true,
            });
        }

        let entries: Vec<Instruction> = slots
            .into_iter()
            .enumerate()
            .map(|(opcode, slot)| {
                slot.unwrap_or_else(|| Instruction {
                    opcode: opcode as u8,
                    operation: Operation::Nop,
                    mode: undocumented_mode(opcode as u8, policy),
                    always_extra_cycle: false,
                    documented: false,
                })
            })
            .collect();

        for instruction in &entries {
            let descriptor = modes.get(instruction.mode);
            let access = descriptor.access;
            assert!(
                access.is_some_and(|access| instruction.operation.accepts(access)),
                "opcode ${:02X}: {} cannot use {:?} ({access:?})",
                instruction.opcode,
                instruction.mnemonic(),
                instruction.mode,
            );
        }

        Self { entries }
    }

    #[must_use]
    pub fn get(&self, opcode: u8) -> &Instruction {
        &self.entries[usize::from(opcode)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.entries.iter()
    }
}

/// Mode an unassigned opcode decodes to.
fn undocumented_mode(opcode: u8, policy: UndocumentedOpcodes) -> AddressMode {
    if policy == UndocumentedOpcodes::ImpliedNop {
        return AddressMode::Implied;
    }
    match opcode {
        0x44 => AddressMode::ZeroPage,
        0x54 | 0xD4 | 0xF4 => AddressMode::ZeroPageX,
        0x5C | 0xDC | 0xFC => AddressMode::Absolute,
        op if op & 0x0F == 0x02 => AddressMode::Immediate,
        _ => AddressMode::Implied,
    }
}
