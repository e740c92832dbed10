//! Construction-time options.

/// What the unassigned opcodes do.
///
/// Every opcode not in the WDC map is a NOP on the 65C02, but the real
/// part consumes different operand lengths depending on the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndocumentedOpcodes {
    /// Consume the operand bytes the silicon does (immediate, zero page,
    /// zero page,X or absolute form), so code after them stays aligned.
    #[default]
    SizedNop,
    /// Treat every one as a one-byte, two-cycle NOP.
    ImpliedNop,
}

/// Options fixed when a [`W65C02`](crate::W65C02) is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuConfig {
    pub undocumented: UndocumentedOpcodes,
    /// Consecutive edges RESET must be held low before it is recognised.
    /// Values below 1 are treated as 1.
    pub reset_hold_edges: u8,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            undocumented: UndocumentedOpcodes::default(),
            reset_hold_edges: 2,
        }
    }
}

impl CpuConfig {
    /// Reset hold requirement with the lower bound applied.
    #[must_use]
    pub fn reset_threshold(&self) -> u8 {
        self.reset_hold_edges.max(1)
    }
}
