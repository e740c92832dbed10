//! Pin-level system bus.
//!
//! Every chip on the board sees the same set of wires. A component drives
//! the lines it owns during `tick()` and samples the lines it listens to
//! during `post_tick()`. Lines carry an electrical level plus a declared
//! enable polarity, so "asserted" always means what the datasheet says.

/// Which electrical level counts as "enabled" for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Asserted when the wire is high.
    ActiveHigh,
    /// Asserted when the wire is low (the `B` suffix on WDC pin names).
    ActiveLow,
}

/// A single control line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    level: bool,
    polarity: Polarity,
}

impl Line {
    /// Create a line in its released (not enabled) state.
    #[must_use]
    pub const fn new(polarity: Polarity) -> Self {
        let level = match polarity {
            Polarity::ActiveHigh => false,
            Polarity::ActiveLow => true,
        };
        Self { level, polarity }
    }

    /// Create a line that starts out enabled.
    #[must_use]
    pub const fn enabled_from_start(polarity: Polarity) -> Self {
        let mut line = Self::new(polarity);
        line.level = !line.level;
        line
    }

    #[must_use]
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Electrical level of the wire (true = high).
    #[must_use]
    pub const fn level(&self) -> bool {
        self.level
    }

    pub fn set_level(&mut self, high: bool) {
        self.level = high;
    }

    /// True when the line is asserted, taking polarity into account.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        match self.polarity {
            Polarity::ActiveHigh => self.level,
            Polarity::ActiveLow => !self.level,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.level = match self.polarity {
            Polarity::ActiveHigh => enabled,
            Polarity::ActiveLow => !enabled,
        };
    }
}

/// The shared address, data and control wires of a 65xx board.
///
/// | Line           | Polarity    | Driven by   |
/// |----------------|-------------|-------------|
/// | `rw`           | active-low  | CPU (low = write) |
/// | `irq`          | active-low  | peripherals |
/// | `nmi`          | active-low  | peripherals |
/// | `reset`        | active-low  | board       |
/// | `bus_enable`   | active-high | board       |
/// | `ready`        | active-high | board       |
/// | `sync`         | active-high | CPU         |
/// | `memory_lock`  | active-low  | CPU         |
/// | `vector_pull`  | active-low  | CPU         |
/// | `set_overflow` | active-low  | board       |
///
/// Nothing arbitrates two responders claiming the same address. Board
/// wiring must make address windows disjoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bus {
    /// Address bus (A0-A15).
    pub address: u16,
    /// Data bus (D0-D7).
    pub data: u8,
    /// Read/write select. Enabled means write.
    pub rw: Line,
    pub irq: Line,
    pub nmi: Line,
    pub reset: Line,
    /// When disabled the CPU tri-states address, data and R/W.
    pub bus_enable: Line,
    /// When disabled the CPU freezes on its current cycle.
    pub ready: Line,
    /// High while the CPU fetches an opcode.
    pub sync: Line,
    /// Low across the locked tail of a read-modify-write instruction.
    pub memory_lock: Line,
    /// Low while the CPU reads an interrupt or reset vector.
    pub vector_pull: Line,
    /// Pulled low to force the overflow flag on.
    pub set_overflow: Line,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// A quiet bus: BE and RDY enabled, every other line released.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            address: 0,
            data: 0,
            rw: Line::new(Polarity::ActiveLow),
            irq: Line::new(Polarity::ActiveLow),
            nmi: Line::new(Polarity::ActiveLow),
            reset: Line::new(Polarity::ActiveLow),
            bus_enable: Line::enabled_from_start(Polarity::ActiveHigh),
            ready: Line::enabled_from_start(Polarity::ActiveHigh),
            sync: Line::new(Polarity::ActiveHigh),
            memory_lock: Line::new(Polarity::ActiveLow),
            vector_pull: Line::new(Polarity::ActiveLow),
            set_overflow: Line::new(Polarity::ActiveLow),
        }
    }

    /// True when the current cycle is a write.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        self.rw.enabled()
    }

    /// Drive a read cycle.
    pub fn drive_read(&mut self, address: u16) {
        self.address = address;
        self.rw.set_enabled(false);
    }

    /// Drive a write cycle.
    pub fn drive_write(&mut self, address: u16, data: u8) {
        self.address = address;
        self.data = data;
        self.rw.set_enabled(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_low_line_is_enabled_when_low() {
        let mut line = Line::new(Polarity::ActiveLow);
        assert!(line.level());
        assert!(!line.enabled());

        line.set_enabled(true);
        assert!(!line.level());
        assert!(line.enabled());
    }

    #[test]
    fn active_high_line_follows_level() {
        let mut line = Line::new(Polarity::ActiveHigh);
        assert!(!line.enabled());
        line.set_level(true);
        assert!(line.enabled());
    }

    #[test]
    fn new_bus_reads_with_ready_and_bus_enable_asserted() {
        let bus = Bus::new();
        assert!(!bus.is_write());
        assert!(bus.rw.level(), "R/W idles high (read)");
        assert!(bus.ready.enabled());
        assert!(bus.bus_enable.enabled());
        assert!(!bus.irq.enabled());
        assert!(!bus.nmi.enabled());
        assert!(!bus.reset.enabled());
        assert!(!bus.sync.enabled());
    }

    #[test]
    fn drive_write_then_read_flips_rw() {
        let mut bus = Bus::new();
        bus.drive_write(0x1234, 0x56);
        assert!(bus.is_write());
        assert!(!bus.rw.level());
        assert_eq!(bus.address, 0x1234);
        assert_eq!(bus.data, 0x56);

        bus.drive_read(0x0100);
        assert!(!bus.is_write());
        assert_eq!(bus.address, 0x0100);
    }
}
