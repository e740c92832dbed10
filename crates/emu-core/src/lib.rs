//! Core traits and types for cycle-accurate 65xx boards.
//!
//! Chips talk to each other only through a shared [`Bus`] of address, data
//! and control lines. Each clock edge is two phases: every component's
//! `tick()` drives lines, then every component's `post_tick()` latches them.

mod bus;
mod clock;
mod component;
mod cpu;
mod memory;
mod observable;
mod ticks;

pub use bus::{Bus, Line, Polarity};
pub use clock::Clock;
pub use component::Component;
pub use cpu::Cpu;
pub use memory::{Memory, MemoryError};
pub use observable::{Observable, Value};
pub use ticks::Ticks;
