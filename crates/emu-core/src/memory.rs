//! RAM and ROM bus responders.
//!
//! A `Memory` owns a contiguous address window. It answers read cycles that
//! fall inside the window during `tick()`, after the CPU has put the address
//! out, so the CPU finds the byte on the data bus in `post_tick()`.

use std::fmt;

use crate::{Bus, Component};

/// Size of the 16-bit address space.
const ADDRESS_SPACE: usize = 0x1_0000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// The region or image would run past $FFFF or outside the window.
    OutOfRange { addr: u16, len: usize },
    /// A region must cover at least one byte.
    EmptyRegion,
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { addr, len } => write!(
                f,
                "{len} bytes at ${addr:04X} do not fit in the memory window",
            ),
            Self::EmptyRegion => write!(f, "memory region is empty"),
        }
    }
}

impl std::error::Error for MemoryError {}

/// A RAM or ROM chip mapped at a fixed base address.
#[derive(Debug, Clone)]
pub struct Memory {
    base: u16,
    bytes: Vec<u8>,
    writable: bool,
}

impl Memory {
    /// Zero-filled RAM covering `len` bytes from `base`.
    pub fn ram(base: u16, len: usize) -> Result<Self, MemoryError> {
        check_window(base, len)?;
        Ok(Self {
            base,
            bytes: vec![0; len],
            writable: true,
        })
    }

    /// ROM holding `image` from `base`. Bus writes are ignored.
    pub fn rom(base: u16, image: &[u8]) -> Result<Self, MemoryError> {
        check_window(base, image.len())?;
        Ok(Self {
            base,
            bytes: image.to_vec(),
            writable: false,
        })
    }

    #[must_use]
    pub fn contains(&self, addr: u16) -> bool {
        let addr = usize::from(addr);
        let base = usize::from(self.base);
        addr >= base && addr < base + self.bytes.len()
    }

    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Read a byte without a bus cycle. Addresses outside the window read as $FF.
    #[must_use]
    pub fn peek(&self, addr: u16) -> u8 {
        self.offset(addr).map_or(0xFF, |i| self.bytes[i])
    }

    /// Write a byte without a bus cycle. Bypasses ROM protection.
    pub fn poke(&mut self, addr: u16, value: u8) {
        if let Some(i) = self.offset(addr) {
            self.bytes[i] = value;
        }
    }

    /// Copy `data` into the window starting at `addr`. Bypasses ROM protection.
    pub fn load(&mut self, addr: u16, data: &[u8]) -> Result<(), MemoryError> {
        let start = self
            .offset(addr)
            .ok_or(MemoryError::OutOfRange { addr, len: data.len() })?;
        let end = start + data.len();
        if end > self.bytes.len() {
            return Err(MemoryError::OutOfRange { addr, len: data.len() });
        }
        self.bytes[start..end].copy_from_slice(data);
        Ok(())
    }

    fn offset(&self, addr: u16) -> Option<usize> {
        self.contains(addr)
            .then(|| usize::from(addr) - usize::from(self.base))
    }
}

fn check_window(base: u16, len: usize) -> Result<(), MemoryError> {
    if len == 0 {
        return Err(MemoryError::EmptyRegion);
    }
    if usize::from(base) + len > ADDRESS_SPACE {
        return Err(MemoryError::OutOfRange { addr: base, len });
    }
    Ok(())
}

impl Component for Memory {
    fn tick(&mut self, bus: &mut Bus) {
        let Some(i) = self.offset(bus.address) else {
            return;
        };
        if bus.is_write() {
            if self.writable {
                self.bytes[i] = bus.data;
            }
        } else {
            bus.data = self.bytes[i];
        }
    }

    fn post_tick(&mut self, _bus: &mut Bus) {}
}
