//! CPU core trait.

use crate::Component;

/// A CPU core.
///
/// CPUs are ordinary bus components: they drive the address bus during
/// `tick()` and latch the data bus during `post_tick()`. This trait adds
/// the inspection hooks a harness needs to step whole instructions.
pub trait Cpu: Component {
    /// The type used for register inspection.
    type Registers;

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU has stopped itself and only a reset will wake it.
    fn is_halted(&self) -> bool;

    /// Returns true when the next edge will start a new instruction or
    /// interrupt sequence.
    fn is_instruction_boundary(&self) -> bool;
}
