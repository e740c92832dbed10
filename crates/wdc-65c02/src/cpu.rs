//! The W65C02S execution engine.
//!
//! Cycle-accurate emulation where each clock edge performs exactly one bus
//! access. `tick()` picks the current micro-op and drives the bus;
//! `post_tick()` latches what came back, advances to the next micro-op and
//! arbitrates interrupts at instruction boundaries.

use emu_core::{Bus, Component, Cpu, Observable, Value};

use crate::micro_op::{BusAccess, Cycle, MicroOp};
use crate::mode::{ModeDescriptor, ModeTable};
use crate::state::{CpuState, Sequence};
use crate::status::{C, D, I, N, V, Z};
use crate::{CpuConfig, Instruction, InstructionTable, Registers};

/// The WDC W65C02S CPU.
#[derive(Debug, Clone)]
pub struct W65C02 {
    state: CpuState,
    modes: ModeTable,
    instructions: InstructionTable,
    config: CpuConfig,

    /// Access started by this edge's `tick()`, finished by its `post_tick()`.
    in_flight: Option<(MicroOp, BusAccess)>,

    /// Bus cycles completed since construction.
    total_cycles: u64,
}

impl Default for W65C02 {
    fn default() -> Self {
        Self::new()
    }
}

impl W65C02 {
    /// Create a CPU at power-on. The first seven edges run the reset sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CpuConfig::default())
    }

    #[must_use]
    pub fn with_config(config: CpuConfig) -> Self {
        let modes = ModeTable::new();
        let instructions = InstructionTable::new(&modes, config.undocumented);
        Self {
            state: CpuState::power_on(),
            modes,
            instructions,
            config,
            in_flight: None,
            total_cycles: 0,
        }
    }

    /// Load registers and start at an opcode fetch, skipping whatever
    /// sequence was in progress.
    pub fn start_at(&mut self, regs: Registers) {
        self.state.regs = regs;
        self.state.clear_latches();
        self.state.sequence = Sequence::Opcode;
        self.state.paused = false;
        self.state.stopped = false;
        self.in_flight = None;
    }

    #[must_use]
    pub fn regs(&self) -> &Registers {
        &self.state.regs
    }

    pub fn regs_mut(&mut self) -> &mut Registers {
        &mut self.state.regs
    }

    #[must_use]
    pub fn state(&self) -> &CpuState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    #[must_use]
    pub fn instructions(&self) -> &InstructionTable {
        &self.instructions
    }

    #[must_use]
    pub fn modes(&self) -> &ModeTable {
        &self.modes
    }

    /// Instruction decoded by the last opcode fetch.
    #[must_use]
    pub fn instruction(&self) -> &Instruction {
        &self.state.instruction
    }

    /// Descriptor of the sequence currently running.
    #[must_use]
    pub fn current_mode(&self) -> &ModeDescriptor {
        self.modes.get(self.state.mode())
    }

    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Waiting for an interrupt after WAI.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    /// Stopped by STP.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state.stopped
    }

    /// Micro-op for the current step.
    fn current_op(&self) -> MicroOp {
        match self.state.step {
            0 if self.state.sequence == Sequence::Opcode => MicroOp::FetchOpcode,
            0 => MicroOp::InternalRead,
            step => self.current_mode().micro_ops[step - 1],
        }
    }

    /// Latch interrupt inputs and SO for this edge.
    fn sample_inputs(&mut self, bus: &Bus) {
        let nmi = bus.nmi.enabled();
        if nmi && !self.state.nmi_previous {
            self.state.nmi_pending = true;
        }
        self.state.nmi_previous = nmi;
        self.state.irq_pending = bus.irq.enabled();

        if bus.set_overflow.enabled() {
            self.state.regs.p.set_flag(V, true);
        }
    }

    fn release_status_lines(bus: &mut Bus) {
        bus.sync.set_enabled(false);
        bus.vector_pull.set_enabled(false);
        bus.memory_lock.set_enabled(false);
    }

    /// RMW sequences hold ML through their last three cycles.
    fn memory_locked(&self) -> bool {
        let mode = self.current_mode();
        self.state.step > 0 && mode.read_modify_write && self.state.step + 3 >= mode.cycles()
    }

    fn drive(&self, bus: &mut Bus, op: MicroOp, access: BusAccess) {
        bus.sync.set_enabled(op == MicroOp::FetchOpcode);
        bus.vector_pull.set_enabled(op.pulls_vector());
        bus.memory_lock.set_enabled(self.memory_locked());

        // With BE low the address and data lines float; the cycle still runs.
        if !bus.bus_enable.enabled() {
            return;
        }
        match access {
            BusAccess::Read(addr) => bus.drive_read(addr),
            BusAccess::Write(addr, value) => bus.drive_write(addr, value),
        }
    }

    /// Move to the next micro-op, crossing into a new sequence when the
    /// current one is done.
    fn advance(&mut self) {
        self.state.step += 1;
        if self.state.step >= self.current_mode().cycles() {
            self.begin_sequence();
        }
    }

    /// Instruction boundary: pick NMI, then unmasked IRQ, then the next opcode.
    fn begin_sequence(&mut self) {
        let state = &mut self.state;
        state.clear_latches();
        state.sequence = if state.nmi_pending {
            state.nmi_pending = false;
            Sequence::Nmi
        } else if state.irq_pending && !state.regs.p.flag(I) {
            Sequence::Irq
        } else {
            Sequence::Opcode
        };
        if state.sequence != Sequence::Opcode {
            if state.paused {
                state.paused = false;
                log::debug!("WAI released at ${:04X}", state.regs.pc);
            }
            log::debug!(
                "{:?} entry at ${:04X}, P={}",
                state.sequence,
                state.regs.pc,
                state.regs.p
            );
        }
    }

    fn decode(&mut self, opcode: u8) {
        self.state.instruction = *self.instructions.get(opcode);
        let regs = &self.state.regs;
        log::trace!(
            "${:04X}  {opcode:02X}  {:<4} {:<14} A={:02X} X={:02X} Y={:02X} SP={:02X} P={}",
            regs.pc.wrapping_sub(1),
            self.state.instruction.mnemonic(),
            self.modes.get(self.state.instruction.mode).name,
            regs.a,
            regs.x,
            regs.y,
            regs.sp,
            regs.p,
        );
    }

    /// Count RESET low edges; once past the threshold, restart the reset
    /// sequence from power-on state on every edge it stays low.
    fn check_reset(&mut self, bus: &Bus) {
        if !bus.reset.enabled() {
            self.state.reset_hold = 0;
            return;
        }
        let threshold = self.config.reset_threshold();
        self.state.reset_hold = self.state.reset_hold.saturating_add(1);
        if self.state.reset_hold < threshold {
            return;
        }
        if self.state.reset_hold == threshold {
            log::debug!("RESET after {threshold} low edges at ${:04X}", self.state.regs.pc);
        }
        let mut state = CpuState {
            reset_hold: self.state.reset_hold,
            nmi_previous: self.state.nmi_previous,
            ..CpuState::power_on()
        };
        // The first dummy read still addresses wherever execution was.
        state.regs.pc = self.state.regs.pc;
        self.state = state;
        self.in_flight = None;
    }
}

impl Component for W65C02 {
    fn tick(&mut self, bus: &mut Bus) {
        self.in_flight = None;
        if self.state.stopped {
            Self::release_status_lines(bus);
            return;
        }

        self.sample_inputs(bus);

        if self.state.paused {
            if !self.state.nmi_pending && !bus.irq.enabled() {
                Self::release_status_lines(bus);
                return;
            }
            self.state.paused = false;
            log::debug!("WAI released at ${:04X}", self.state.regs.pc);
            // Re-arbitrate: a masked IRQ only resumes at the next opcode.
            self.begin_sequence();
        }

        if !bus.ready.enabled() {
            return;
        }

        loop {
            let op = self.current_op();
            match op.setup(&self.state) {
                Cycle::Skip => self.advance(),
                Cycle::Execute(access) => {
                    self.drive(bus, op, access);
                    self.in_flight = Some((op, access));
                    return;
                }
            }
        }
    }

    fn post_tick(&mut self, bus: &mut Bus) {
        if let Some((op, access)) = self.in_flight.take() {
            let data = match access {
                BusAccess::Read(_) => bus.data,
                BusAccess::Write(_, value) => value,
            };
            op.complete(&mut self.state, data);
            if op == MicroOp::FetchOpcode {
                self.decode(data);
            }
            self.total_cycles += 1;
            self.advance();
            // Trailing skips end the instruction on this edge.
            while matches!(self.current_op().setup(&self.state), Cycle::Skip) {
                self.advance();
            }
        }

        // RESET is honoured even while RDY holds the engine.
        self.check_reset(bus);
    }
}

impl Cpu for W65C02 {
    type Registers = Registers;

    fn pc(&self) -> u16 {
        self.state.regs.pc
    }

    fn registers(&self) -> Self::Registers {
        self.state.regs
    }

    fn is_halted(&self) -> bool {
        self.state.stopped
    }

    fn is_instruction_boundary(&self) -> bool {
        self.state.step == 0
    }
}

impl Observable for W65C02 {
    fn query(&self, path: &str) -> Option<Value> {
        let regs = &self.state.regs;
        match path {
            "pc" => Some(regs.pc.into()),
            "a" => Some(regs.a.into()),
            "x" => Some(regs.x.into()),
            "y" => Some(regs.y.into()),
            "s" | "sp" => Some(regs.sp.into()),
            "p" | "status" => Some(regs.p.read_value().into()),
            "flags.c" | "c" => Some(regs.p.flag(C).into()),
            "flags.z" | "z" => Some(regs.p.flag(Z).into()),
            "flags.i" | "i" => Some(regs.p.flag(I).into()),
            "flags.d" | "d" => Some(regs.p.flag(D).into()),
            "flags.v" | "v" => Some(regs.p.flag(V).into()),
            "flags.n" | "n" => Some(regs.p.flag(N).into()),
            "opcode" => Some(self.state.instruction.opcode.into()),
            "mnemonic" => Some(self.state.instruction.mnemonic().into()),
            "mode" => Some(self.current_mode().name.into()),
            "step" => Some(Value::U64(self.state.step as u64)),
            "ir" => Some(self.state.instruction_register.into()),
            "dr" => Some(self.state.data_register.into()),
            "irq_pending" => Some(self.state.irq_pending.into()),
            "nmi_pending" => Some(self.state.nmi_pending.into()),
            "cycle" => Some(Value::U64(self.total_cycles)),
            "paused" => Some(self.state.paused.into()),
            "halted" | "stopped" => Some(self.state.stopped.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc",
            "a",
            "x",
            "y",
            "s",
            "sp",
            "p",
            "status",
            "flags.c",
            "flags.z",
            "flags.i",
            "flags.d",
            "flags.v",
            "flags.n",
            "c",
            "z",
            "i",
            "d",
            "v",
            "n",
            "opcode",
            "mnemonic",
            "mode",
            "step",
            "ir",
            "dr",
            "irq_pending",
            "nmi_pending",
            "cycle",
            "paused",
            "halted",
            "stopped",
        ]
    }
}
