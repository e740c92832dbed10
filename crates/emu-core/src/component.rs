//! Two-phase clocking for bus-attached components.

use crate::Bus;

/// A chip that participates in clock edges.
///
/// Each edge is split in two. During `tick()` every component drives the
/// lines it owns (the CPU puts out an address, memory answers it). During
/// `post_tick()` every component consumes what is now on the bus. All
/// `tick()` calls for an edge happen before any `post_tick()` call.
pub trait Component {
    /// Drive or answer bus lines for this edge.
    fn tick(&mut self, bus: &mut Bus);

    /// Latch the settled bus for this edge. Pure responders such as
    /// memory have nothing to latch.
    fn post_tick(&mut self, _bus: &mut Bus) {}
}
