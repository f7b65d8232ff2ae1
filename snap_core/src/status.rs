//! Human-readable status events.  Advisory only: nothing in the control
//! flow depends on whether a sink is listening.

use std::fmt;

use crate::effect::{ResetReason, TriggerSource};
use crate::error::EffectError;
use crate::geometry::CanvasSize;

#[derive(Clone, Debug, PartialEq)]
pub enum Status {
    HandDetected { hands: usize },
    HandLost,
    /// Source frames are not the canvas size; landmarks are stretched to fit.
    FrameSizeMismatch { width: u32, height: u32, canvas: CanvasSize },
    /// Thumb-tip to index-tip gap this frame, pixels.
    Distance(f32),
    SnapFired { previous: f32, current: f32 },
    EffectTriggered { source: TriggerSource, particles: usize },
    EffectRefused(EffectError),
    EffectReset(ResetReason),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::HandDetected { hands: 1 } => write!(f, "Hand detected"),
            Status::HandDetected { hands }    => write!(f, "{} hands detected", hands),
            Status::HandLost                  => write!(f, "Hand lost"),
            Status::FrameSizeMismatch { width, height, canvas } => write!(
                f, "Source frame {}x{} stretched to canvas {}x{}",
                width, height, canvas.width, canvas.height
            ),
            Status::Distance(d)               => write!(f, "Thumb-index distance: {:.1}px", d),
            Status::SnapFired { previous, current } =>
                write!(f, "SNAP! ({:.0}px -> {:.0}px)", previous, current),
            Status::EffectTriggered { source, particles } =>
                write!(f, "Dust effect triggered by {} ({} particles)", source, particles),
            Status::EffectRefused(err)        => write!(f, "Cannot trigger dust: {}", err),
            Status::EffectReset(reason)       => write!(f, "Back to tracking ({})", reason),
        }
    }
}

/// Receiver for [`Status`] events.
pub trait StatusSink {
    fn report(&mut self, status: Status);
}

/// Collects every event; handy for tests and replay.
impl StatusSink for Vec<Status> {
    fn report(&mut self, status: Status) { self.push(status); }
}

/// Discards everything.
impl StatusSink for () {
    fn report(&mut self, _status: Status) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_read_naturally() {
        assert_eq!(Status::HandDetected { hands: 1 }.to_string(), "Hand detected");
        assert_eq!(Status::HandDetected { hands: 2 }.to_string(), "2 hands detected");
        assert_eq!(Status::Distance(42.31).to_string(), "Thumb-index distance: 42.3px");
        assert_eq!(
            Status::FrameSizeMismatch { width: 640, height: 480, canvas: CanvasSize::new(400, 300) }.to_string(),
            "Source frame 640x480 stretched to canvas 400x300"
        );
        assert_eq!(
            Status::EffectRefused(EffectError::NoSilhouette).to_string(),
            "Cannot trigger dust: no hand silhouette captured yet; show a hand first"
        );
        assert_eq!(
            Status::EffectTriggered { source: TriggerSource::Gesture, particles: 12 }.to_string(),
            "Dust effect triggered by snap (12 particles)"
        );
    }

    #[test]
    fn vec_sink_collects_in_order() {
        let mut sink: Vec<Status> = Vec::new();
        sink.report(Status::HandLost);
        sink.report(Status::EffectReset(ResetReason::Manual));
        assert_eq!(sink, vec![Status::HandLost, Status::EffectReset(ResetReason::Manual)]);
    }
}
