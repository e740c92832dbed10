//! Single-instruction disassembler.

use std::fmt;

use crate::InstructionTable;
use crate::mode::AddressMode;

/// One disassembled instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disassembly {
    /// Mnemonic and operand, e.g. `LDA ($10),Y`.
    pub text: String,
    /// Bytes the instruction occupies.
    pub len: u16,
}

impl fmt::Display for Disassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Disassemble the instruction at the start of `bytes`, which was fetched from `pc`.
///
/// Operand bytes missing from the end of `bytes` read as zero. An empty
/// slice disassembles as BRK.
#[must_use]
pub fn disassemble(table: &InstructionTable, bytes: &[u8], pc: u16) -> Disassembly {
    let byte = |i: usize| bytes.get(i).copied().unwrap_or(0);
    let instruction = table.get(byte(0));
    let descriptor = instruction.mode.describe();
    let len = descriptor.length();

    let word = u16::from_le_bytes([byte(1), byte(2)]);
    let offset = match instruction.mode {
        AddressMode::ZeroPageRelative => byte(2),
        _ => byte(1),
    };
    let target = pc.wrapping_add(len).wrapping_add(offset as i8 as u16);

    let operand = descriptor
        .format
        .replace("{b}", &format!("{:02X}", byte(1)))
        .replace("{w}", &format!("{word:04X}"))
        .replace("{r}", &format!("{target:04X}"));

    let text = if operand.is_empty() {
        instruction.mnemonic().to_string()
    } else {
        format!("{} {operand}", instruction.mnemonic())
    };
    Disassembly { text, len }
}
