//! Clock-edge scheduler.

use crate::{Bus, Component, Ticks};

/// Drives clock edges across a set of components.
///
/// There is no notion of wall-clock time here: an edge happens when the
/// host calls [`Clock::edge`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Clock {
    edges: Ticks,
}

impl Clock {
    #[must_use]
    pub const fn new() -> Self {
        Self { edges: Ticks::ZERO }
    }

    /// Run one clock edge.
    ///
    /// The CPU must come first in `components` so that responders see the
    /// address it drives on this edge. Every `tick()` runs before any
    /// `post_tick()`.
    pub fn edge(&mut self, bus: &mut Bus, components: &mut [&mut dyn Component]) {
        for component in components.iter_mut() {
            component.tick(bus);
        }
        for component in components.iter_mut() {
            component.post_tick(bus);
        }
        self.edges += Ticks::new(1);
    }

    /// Edges run so far.
    #[must_use]
    pub const fn edges(&self) -> Ticks {
        self.edges
    }
}
