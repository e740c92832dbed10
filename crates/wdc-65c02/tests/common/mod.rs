//! Shared test machine: a W65C02 on a flat 64K RAM, clocked edge by edge.

#![allow(dead_code)]

use emu_core::{Bus, Clock, Component, Cpu, Memory};
use wdc_65c02::W65C02;

/// Where test programs are loaded and where RESET lands.
pub const PROGRAM: u16 = 0x0200;
/// IRQ/BRK handler address.
pub const IRQ_HANDLER: u16 = 0x0300;
/// NMI handler address.
pub const NMI_HANDLER: u16 = 0x0380;

/// What the bus looked like at the end of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    pub address: u16,
    pub data: u8,
    pub write: bool,
    pub sync: bool,
    pub memory_lock: bool,
    pub vector_pull: bool,
}

pub struct Board {
    pub cpu: W65C02,
    pub ram: Memory,
    pub bus: Bus,
    pub clock: Clock,
    pub cycles: Vec<Cycle>,
}

impl Board {
    /// Power-on board with `program` at `$0200` and the three vectors set.
    /// The reset sequence has not run yet.
    pub fn new(cpu: W65C02, program: &[u8]) -> Self {
        let mut ram = Memory::ram(0x0000, 0x10000).expect("64K RAM");
        ram.load(PROGRAM, program).expect("program fits");
        ram.load(0xFFFA, &NMI_HANDLER.to_le_bytes()).expect("vector");
        ram.load(0xFFFC, &PROGRAM.to_le_bytes()).expect("vector");
        ram.load(0xFFFE, &IRQ_HANDLER.to_le_bytes()).expect("vector");
        Self {
            cpu,
            ram,
            bus: Bus::new(),
            clock: Clock::new(),
            cycles: Vec::new(),
        }
    }

    /// Board that has already run its seven reset edges.
    pub fn booted(program: &[u8]) -> Self {
        let mut board = Self::new(W65C02::new(), program);
        board.run(7);
        assert_eq!(board.cpu.pc(), PROGRAM, "reset vector not taken");
        board.cycles.clear();
        board
    }

    /// One clock edge. CPU first, then memory.
    pub fn edge(&mut self) {
        self.clock
            .edge(&mut self.bus, &mut [&mut self.cpu as &mut dyn Component, &mut self.ram]);
        self.cycles.push(Cycle {
            address: self.bus.address,
            data: self.bus.data,
            write: self.bus.is_write(),
            sync: self.bus.sync.enabled(),
            memory_lock: self.bus.memory_lock.enabled(),
            vector_pull: self.bus.vector_pull.enabled(),
        });
    }

    pub fn run(&mut self, edges: usize) {
        for _ in 0..edges {
            self.edge();
        }
    }

    /// Run one whole instruction (or interrupt sequence) and return its cycle count.
    pub fn step(&mut self) -> usize {
        let mut edges = 0;
        loop {
            self.edge();
            edges += 1;
            if self.cpu.is_instruction_boundary() {
                return edges;
            }
            assert!(edges < 16, "instruction never finished");
        }
    }

    /// Cycles recorded since `mark`.
    pub fn since(&self, mark: usize) -> &[Cycle] {
        &self.cycles[mark..]
    }

    pub fn peek(&self, addr: u16) -> u8 {
        self.ram.peek(addr)
    }

    pub fn poke(&mut self, addr: u16, value: u8) {
        self.ram.poke(addr, value);
    }
}
