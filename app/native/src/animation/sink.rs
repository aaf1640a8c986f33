//! Destination of published frames.

use crate::imaging::Frame;

/// Receives every frame the animator publishes, on the UI context.
pub trait FrameSink: Send + Sync {
    fn publish(&self, frame: &Frame);
}

impl<F> FrameSink for F
where F: Fn(&Frame) + Send + Sync
{
    fn publish(&self, frame: &Frame) { self(frame) }
}
