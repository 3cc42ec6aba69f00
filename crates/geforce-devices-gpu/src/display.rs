//! Display-refresh collaborator.
//!
//! The device never renders. When the 3D engine clears a surface it only tells the display side
//! that the whole frame is stale; the host decides when to redraw.

pub trait DisplaySink {
    /// Mark the entire scanout as needing a redraw.
    fn invalidate_full(&mut self);
}

/// Sink for headless hosts.
#[derive(Debug, Default)]
pub struct NullDisplaySink;

impl DisplaySink for NullDisplaySink {
    fn invalidate_full(&mut self) {}
}
