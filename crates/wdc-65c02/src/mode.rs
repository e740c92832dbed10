//! Addressing modes and their cycle sequences.
//!
//! A mode owns the timing of an instruction: which micro-ops run after the
//! opcode fetch and in what order. The operation bound to the opcode only
//! decides what happens to the data. Read, write and read-modify-write
//! flavours of the same addressing form are separate modes because their
//! cycle sequences differ.

use crate::micro_op::{Index, MicroOp};
use crate::operation::Access;

/// Every addressing mode, plus the three pseudo-modes for interrupt and
/// reset entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageRmw,
    ZeroPageWrite,
    ZeroPageX,
    ZeroPageXRmw,
    ZeroPageXWrite,
    ZeroPageY,
    ZeroPageYWrite,
    Absolute,
    AbsoluteRmw,
    AbsoluteWrite,
    AbsoluteX,
    AbsoluteXRmw,
    AbsoluteXWrite,
    AbsoluteY,
    AbsoluteYWrite,
    ZeroPageIndirect,
    ZeroPageIndirectWrite,
    IndexedIndirect,
    IndexedIndirectWrite,
    IndirectIndexed,
    IndirectIndexedWrite,
    Relative,
    ZeroPageRelative,
    AbsoluteJump,
    AbsoluteIndirect,
    AbsoluteIndexedIndirect,
    Push,
    Pull,
    Jsr,
    Rts,
    Rti,
    Brk,
    /// WAI and STP: two internal cycles after the fetch.
    Halt,
    Irq,
    Nmi,
    Reset,
}

impl AddressMode {
    /// All modes in declaration order. Indexes into [`ModeTable`].
    pub const ALL: [Self; 40] = [
        Self::Implied,
        Self::Accumulator,
        Self::Immediate,
        Self::ZeroPage,
        Self::ZeroPageRmw,
        Self::ZeroPageWrite,
        Self::ZeroPageX,
        Self::ZeroPageXRmw,
        Self::ZeroPageXWrite,
        Self::ZeroPageY,
        Self::ZeroPageYWrite,
        Self::Absolute,
        Self::AbsoluteRmw,
        Self::AbsoluteWrite,
        Self::AbsoluteX,
        Self::AbsoluteXRmw,
        Self::AbsoluteXWrite,
        Self::AbsoluteY,
        Self::AbsoluteYWrite,
        Self::ZeroPageIndirect,
        Self::ZeroPageIndirectWrite,
        Self::IndexedIndirect,
        Self::IndexedIndirectWrite,
        Self::IndirectIndexed,
        Self::IndirectIndexedWrite,
        Self::Relative,
        Self::ZeroPageRelative,
        Self::AbsoluteJump,
        Self::AbsoluteIndirect,
        Self::AbsoluteIndexedIndirect,
        Self::Push,
        Self::Pull,
        Self::Jsr,
        Self::Rts,
        Self::Rti,
        Self::Brk,
        Self::Halt,
        Self::Irq,
        Self::Nmi,
        Self::Reset,
    ];

    /// Static description of this mode.
    #[must_use]
    #[allow(clippy::enum_glob_use)]
    pub const fn describe(self) -> ModeDescriptor {
        use MicroOp::*;

        // (name, operand bytes, micro-ops, operand format, access, rmw)
        let (name, operand_size, micro_ops, format, access, read_modify_write): (
            &'static str,
            u8,
            &'static [MicroOp],
            &'static str,
            Option<Access>,
            bool,
        ) = match self {
            Self::Implied => ("Implied", 0, &[ImpliedExecute], "", Some(Access::Implied), false),
            Self::Accumulator => (
                "Accumulator",
                0,
                &[AccumulatorExecute],
                "A",
                Some(Access::Modify),
                false,
            ),
            Self::Immediate => ("Immediate", 1, &[ReadImmediate], "#${b}", Some(Access::Read), false),

            Self::ZeroPage => (
                "Zero Page",
                1,
                &[OperandLo, ReadEffective],
                "${b}",
                Some(Access::Read),
                false,
            ),
            Self::ZeroPageRmw => (
                "Zero Page",
                1,
                &[OperandLo, LatchEffective, ModifyDummy, WriteModified],
                "${b}",
                Some(Access::Modify),
                true,
            ),
            Self::ZeroPageWrite => (
                "Zero Page",
                1,
                &[OperandLo, WriteEffective],
                "${b}",
                Some(Access::Write),
                false,
            ),

            Self::ZeroPageX => (
                "Zero Page,X",
                1,
                &[OperandLo, IndexZeroPage(Index::X), ReadEffective],
                "${b},X",
                Some(Access::Read),
                false,
            ),
            Self::ZeroPageXRmw => (
                "Zero Page,X",
                1,
                &[
                    OperandLo,
                    IndexZeroPage(Index::X),
                    LatchEffective,
                    ModifyDummy,
                    WriteModified,
                ],
                "${b},X",
                Some(Access::Modify),
                true,
            ),
            Self::ZeroPageXWrite => (
                "Zero Page,X",
                1,
                &[OperandLo, IndexZeroPage(Index::X), WriteEffective],
                "${b},X",
                Some(Access::Write),
                false,
            ),
            Self::ZeroPageY => (
                "Zero Page,Y",
                1,
                &[OperandLo, IndexZeroPage(Index::Y), ReadEffective],
                "${b},Y",
                Some(Access::Read),
                false,
            ),
            Self::ZeroPageYWrite => (
                "Zero Page,Y",
                1,
                &[OperandLo, IndexZeroPage(Index::Y), WriteEffective],
                "${b},Y",
                Some(Access::Write),
                false,
            ),

            Self::Absolute => (
                "Absolute",
                2,
                &[OperandLo, OperandHi, ReadEffective],
                "${w}",
                Some(Access::Read),
                false,
            ),
            Self::AbsoluteRmw => (
                "Absolute",
                2,
                &[OperandLo, OperandHi, LatchEffective, ModifyDummy, WriteModified],
                "${w}",
                Some(Access::Modify),
                true,
            ),
            Self::AbsoluteWrite => (
                "Absolute",
                2,
                &[OperandLo, OperandHi, WriteEffective],
                "${w}",
                Some(Access::Write),
                false,
            ),

            Self::AbsoluteX => (
                "Absolute,X",
                2,
                &[OperandLo, OperandHiIndexed(Index::X), PageFixup, ReadEffective],
                "${w},X",
                Some(Access::Read),
                false,
            ),
            Self::AbsoluteXRmw => (
                "Absolute,X",
                2,
                &[
                    OperandLo,
                    OperandHiIndexed(Index::X),
                    PageFixup,
                    LatchEffective,
                    ModifyDummy,
                    WriteModified,
                ],
                "${w},X",
                Some(Access::Modify),
                true,
            ),
            Self::AbsoluteXWrite => (
                "Absolute,X",
                2,
                &[OperandLo, OperandHiIndexed(Index::X), PageFixup, WriteEffective],
                "${w},X",
                Some(Access::Write),
                false,
            ),
            Self::AbsoluteY => (
                "Absolute,Y",
                2,
                &[OperandLo, OperandHiIndexed(Index::Y), PageFixup, ReadEffective],
                "${w},Y",
                Some(Access::Read),
                false,
            ),
            Self::AbsoluteYWrite => (
                "Absolute,Y",
                2,
                &[OperandLo, OperandHiIndexed(Index::Y), PageFixup, WriteEffective],
                "${w},Y",
                Some(Access::Write),
                false,
            ),

            Self::ZeroPageIndirect => (
                "(Zero Page)",
                1,
                &[OperandLo, PointerLo, PointerHi, ReadEffective],
                "(${b})",
                Some(Access::Read),
                false,
            ),
            Self::ZeroPageIndirectWrite => (
                "(Zero Page)",
                1,
                &[OperandLo, PointerLo, PointerHi, WriteEffective],
                "(${b})",
                Some(Access::Write),
                false,
            ),
            Self::IndexedIndirect => (
                "(Zero Page,X)",
                1,
                &[
                    OperandLo,
                    IndexZeroPage(Index::X),
                    PointerLo,
                    PointerHi,
                    ReadEffective,
                ],
                "(${b},X)",
                Some(Access::Read),
                false,
            ),
            Self::IndexedIndirectWrite => (
                "(Zero Page,X)",
                1,
                &[
                    OperandLo,
                    IndexZeroPage(Index::X),
                    PointerLo,
                    PointerHi,
                    WriteEffective,
                ],
                "(${b},X)",
                Some(Access::Write),
                false,
            ),
            Self::IndirectIndexed => (
                "(Zero Page),Y",
                1,
                &[
                    OperandLo,
                    PointerLo,
                    PointerHiIndexed(Index::Y),
                    PageFixup,
                    ReadEffective,
                ],
                "(${b}),Y",
                Some(Access::Read),
                false,
            ),
            Self::IndirectIndexedWrite => (
                "(Zero Page),Y",
                1,
                &[
                    OperandLo,
                    PointerLo,
                    PointerHiIndexed(Index::Y),
                    PageFixup,
                    WriteEffective,
                ],
                "(${b}),Y",
                Some(Access::Write),
                false,
            ),

            Self::Relative => (
                "Relative",
                1,
                &[BranchOperand, BranchTaken, BranchFixup],
                "${r}",
                Some(Access::Branch),
                false,
            ),
            Self::ZeroPageRelative => (
                "Zero Page Relative",
                2,
                &[
                    OperandLo,
                    LatchEffective,
                    EffectiveDummy,
                    BranchOperand,
                    BranchTaken,
                    BranchFixup,
                ],
                "${b},${r}",
                Some(Access::Branch),
                false,
            ),

            Self::AbsoluteJump => (
                "Absolute",
                2,
                &[OperandLo, JumpHi],
                "${w}",
                Some(Access::Control),
                false,
            ),
            Self::AbsoluteIndirect => (
                "(Absolute)",
                2,
                &[OperandLo, OperandHi, IndirectDummy, PointerLoAbsolute, JumpIndirectHi],
                "(${w})",
                Some(Access::Control),
                false,
            ),
            Self::AbsoluteIndexedIndirect => (
                "(Absolute,X)",
                2,
                &[
                    OperandLo,
                    OperandHi,
                    IndexAbsolute(Index::X),
                    PointerLoAbsolute,
                    JumpIndirectHi,
                ],
                "(${w},X)",
                Some(Access::Control),
                false,
            ),

            Self::Push => (
                "Stack",
                0,
                &[InternalRead, PushValue],
                "",
                Some(Access::Write),
                false,
            ),
            Self::Pull => (
                "Stack",
                0,
                &[InternalRead, StackDummy(0), PullValue],
                "",
                Some(Access::Read),
                false,
            ),
            Self::Jsr => (
                "Absolute",
                2,
                &[OperandLo, StackDummy(0), PushPch, PushPcl, JumpHi],
                "${w}",
                Some(Access::Control),
                false,
            ),
            Self::Rts => (
                "Stack",
                0,
                &[InternalRead, StackDummy(0), PullPcl, PullPch, ReturnIncrement],
                "",
                Some(Access::Control),
                false,
            ),
            Self::Rti => (
                "Stack",
                0,
                &[InternalRead, StackDummy(0), PullStatus, PullPcl, PullPchJump],
                "",
                Some(Access::Control),
                false,
            ),
            Self::Brk => (
                "Stack",
                1,
                &[
                    BreakSignature,
                    PushPch,
                    PushPcl,
                    PushStatus { brk: true },
                    VectorLo(IRQ_VECTOR),
                    VectorHi(IRQ_VECTOR),
                ],
                "",
                Some(Access::Control),
                false,
            ),
            Self::Halt => (
                "Implied",
                0,
                &[InternalRead, ImpliedExecute],
                "",
                Some(Access::Implied),
                false,
            ),

            Self::Irq => (
                "IRQ",
                0,
                &[
                    InternalRead,
                    PushPch,
                    PushPcl,
                    PushStatus { brk: false },
                    VectorLo(IRQ_VECTOR),
                    VectorHi(IRQ_VECTOR),
                ],
                "",
                None,
                false,
            ),
            Self::Nmi => (
                "NMI",
                0,
                &[
                    InternalRead,
                    PushPch,
                    PushPcl,
                    PushStatus { brk: false },
                    VectorLo(NMI_VECTOR),
                    VectorHi(NMI_VECTOR),
                ],
                "",
                None,
                false,
            ),
            // Reset walks the push slots as reads; SP is left where it was.
            Self::Reset => (
                "RESET",
                0,
                &[
                    InternalRead,
                    StackDummy(0),
                    StackDummy(1),
                    StackDummy(2),
                    VectorLo(RESET_VECTOR),
                    VectorHi(RESET_VECTOR),
                ],
                "",
                None,
                false,
            ),
        };

        ModeDescriptor {
            mode: self,
            name,
            operand_size,
            micro_ops,
            format,
            access,
            read_modify_write,
        }
    }
}

/// NMI vector.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// Reset vector.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// IRQ/BRK vector.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Static description of an addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeDescriptor {
    pub mode: AddressMode,
    pub name: &'static str,
    /// Operand bytes following the opcode.
    pub operand_size: u8,
    /// Cycles after the opcode fetch.
    pub micro_ops: &'static [MicroOp],
    /// Disassembly template. `{b}` is the first operand byte, `{w}` the
    /// 16-bit operand and `{r}` the branch target.
    pub format: &'static str,
    /// Operation class this mode accepts. `None` for interrupt and reset entry.
    pub access: Option<Access>,
    /// Memory lock covers the last three cycles.
    pub read_modify_write: bool,
}

impl ModeDescriptor {
    /// Total cycles including the opcode fetch, with every optional cycle taken.
    #[must_use]
    pub const fn cycles(&self) -> usize {
        self.micro_ops.len() + 1
    }

    /// Bytes occupied by an instruction in this mode.
    #[must_use]
    pub const fn length(&self) -> u16 {
        1 + self.operand_size as u16
    }
}

/// Descriptor for every addressing mode, checked once at construction.
#[derive(Debug, Clone)]
pub struct ModeTable {
    descriptors: Vec<ModeDescriptor>,
}

impl Default for ModeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeTable {
    /// Build and validate the table.
    ///
    /// # Panics
    ///
    /// On a malformed mode definition. That is a defect in this crate, not
    /// a runtime condition.
    #[must_use]
    pub fn new() -> Self {
        let descriptors: Vec<ModeDescriptor> =
            AddressMode::ALL.iter().map(|mode| mode.describe()).collect();

        for (index, descriptor) in descriptors.iter().enumerate() {
            let mode = descriptor.mode;
            assert_eq!(mode as usize, index, "{mode:?} is out of order in AddressMode::ALL");
            assert!(!descriptor.micro_ops.is_empty(), "{mode:?} has no cycles");
            assert!(
                !descriptor.micro_ops.contains(&MicroOp::FetchOpcode),
                "{mode:?} fetches an opcode mid-instruction"
            );
            if descriptor.read_modify_write {
                assert_eq!(
                    descriptor.micro_ops.last(),
                    Some(&MicroOp::WriteModified),
                    "{mode:?} is read-modify-write but does not end in a write-back"
                );
            }
            if descriptor.access.is_none() {
                let tail = &descriptor.micro_ops[descriptor.micro_ops.len().saturating_sub(2)..];
                assert!(
                    tail.iter().all(|op| op.pulls_vector()),
                    "{mode:?} must end with a vector fetch"
                );
            }
        }
        assert_eq!(
            descriptors.len(),
            AddressMode::Reset as usize + 1,
            "AddressMode::ALL is missing variants"
        );

        Self { descriptors }
    }

    #[must_use]
    pub fn get(&self, mode: AddressMode) -> &ModeDescriptor {
        &self.descriptors[mode as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModeDescriptor> {
        self.descriptors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_validates() {
        let table = ModeTable::new();
        assert_eq!(table.iter().count(), AddressMode::ALL.len());
    }

    #[test]
    fn worst_case_cycle_counts() {
        let table = ModeTable::new();
        let cycles = |mode| table.get(mode).cycles();
        assert_eq!(cycles(AddressMode::Implied), 2);
        assert_eq!(cycles(AddressMode::Immediate), 2);
        assert_eq!(cycles(AddressMode::ZeroPage), 3);
        assert_eq!(cycles(AddressMode::ZeroPageRmw), 5);
        assert_eq!(cycles(AddressMode::ZeroPageX), 4);
        assert_eq!(cycles(AddressMode::ZeroPageXRmw), 6);
        assert_eq!(cycles(AddressMode::Absolute), 4);
        assert_eq!(cycles(AddressMode::AbsoluteRmw), 6);
        assert_eq!(cycles(AddressMode::AbsoluteX), 5);
        assert_eq!(cycles(AddressMode::AbsoluteXRmw), 7);
        assert_eq!(cycles(AddressMode::ZeroPageIndirect), 5);
        assert_eq!(cycles(AddressMode::IndexedIndirect), 6);
        assert_eq!(cycles(AddressMode::IndirectIndexed), 6);
        assert_eq!(cycles(AddressMode::Relative), 4);
        assert_eq!(cycles(AddressMode::ZeroPageRelative), 7);
        assert_eq!(cycles(AddressMode::AbsoluteJump), 3);
        assert_eq!(cycles(AddressMode::AbsoluteIndirect), 6);
        assert_eq!(cycles(AddressMode::AbsoluteIndexedIndirect), 6);
        assert_eq!(cycles(AddressMode::Push), 3);
        assert_eq!(cycles(AddressMode::Pull), 4);
        assert_eq!(cycles(AddressMode::Jsr), 6);
        assert_eq!(cycles(AddressMode::Rts), 6);
        assert_eq!(cycles(AddressMode::Rti), 6);
        assert_eq!(cycles(AddressMode::Brk), 7);
        assert_eq!(cycles(AddressMode::Halt), 3);
        assert_eq!(cycles(AddressMode::Irq), 7);
        assert_eq!(cycles(AddressMode::Nmi), 7);
        assert_eq!(cycles(AddressMode::Reset), 7);
    }

    #[test]
    fn only_rmw_modes_lock_memory() {
        let table = ModeTable::new();
        let locked: Vec<_> = table
            .iter()
            .filter(|d| d.read_modify_write)
            .map(|d| d.mode)
            .collect();
        assert_eq!(
            locked,
            [
                AddressMode::ZeroPageRmw,
                AddressMode::ZeroPageXRmw,
                AddressMode::AbsoluteRmw,
                AddressMode::AbsoluteXRmw,
            ]
        );
    }

    #[test]
    fn brk_skips_its_signature_byte() {
        assert_eq!(AddressMode::Brk.describe().length(), 2);
        assert_eq!(AddressMode::Jsr.describe().length(), 3);
        assert_eq!(AddressMode::ZeroPageRelative.describe().length(), 3);
    }
}
