//! Boundary between the navigation core and whatever renders its output.
//!
//! Every channel publishes [`OutputEvent`]s through a cloned [`OutputSender`];
//! the front end owns the [`OutputBridge`] and drains it after each input.

use crate::navigation::rotor::RotorUnit;
use crate::types::{Coordinate, Direction};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::cell::Cell;
use std::rc::Rc;

/// Channel capacity for output events.
/// A full-axis autoplay at the fastest rate produces a few events per tick.
pub const OUTPUT_CHANNEL_CAPACITY: usize = 1024;

/// A single sonified value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f64,
    /// Stereo position in `[-1, 1]`
    pub pan: f64,
    pub duration_ms: u64,
    /// Volume in `[0, 1]`
    pub volume: f64,
}

/// Messages sent from the output channels to the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    /// Play one tone.
    Tone(Tone),

    /// Play several tones at once.
    Chord(Vec<Tone>),

    /// Repaint the braille display with the caret at a linear offset.
    Braille { text: String, caret: usize },

    /// Render point text; `announce` is false while autoplay mutes the live region.
    Text { value: String, announce: bool },

    /// Short status message (mode toggles, speed changes, layer changes).
    Notification(String),

    /// Highlight the point under the trace cursor.
    Highlight(Coordinate),

    /// Replace the review buffer.
    Review(String),

    /// Autoplay began, or restarted at a new rate.
    AutoplayStarted { direction: Direction, rate_ms: u64 },

    /// Autoplay stopped.
    AutoplayStopped,

    /// The rotor moved to another unit.
    RotorUnitChanged { unit: RotorUnit, name: String },

    /// A rotor search found nothing.
    TargetNotFound {
        unit: RotorUnit,
        direction: Direction,
        message: String,
    },
}

/// Publishing half shared by every channel
#[derive(Debug, Clone)]
pub struct OutputSender {
    tx: Sender<OutputEvent>,
    dropped: Rc<Cell<u64>>,
}

impl OutputSender {
    /// Publish without blocking; a full buffer drops the event and counts it.
    pub fn publish(&self, event: OutputEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => self.dropped.set(self.dropped.get() + 1),
            // Front end went away; nothing left to render to.
            Err(TrySendError::Disconnected(_)) => {}
        }
    }

    /// Events lost to backpressure so far
    pub fn dropped(&self) -> u64 {
        self.dropped.get()
    }

    /// Log and clear the drop counter
    pub fn report_dropped(&self) {
        let dropped = self.dropped.replace(0);
        if dropped > 0 {
            tracing::warn!("output channel dropped {} events due to backpressure", dropped);
        }
    }
}

/// Front-end handle for receiving output events.
pub struct OutputBridge {
    rx: Receiver<OutputEvent>,
}

impl OutputBridge {
    /// Create a bridge and the sender the channels publish through.
    pub fn new(capacity: usize) -> (Self, OutputSender) {
        let (tx, rx) = bounded(capacity);
        let sender = OutputSender {
            tx,
            dropped: Rc::new(Cell::new(0)),
        };
        (Self { rx }, sender)
    }

    /// Drain all pending events.
    pub fn drain(&self) -> Vec<OutputEvent> {
        self.rx.try_iter().collect()
    }

    /// Try to receive a single event without blocking.
    pub fn try_recv(&self) -> Option<OutputEvent> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order() {
        let (bridge, sender) = OutputBridge::new(8);
        sender.publish(OutputEvent::Notification("a".into()));
        sender.publish(OutputEvent::AutoplayStopped);

        assert_eq!(
            bridge.drain(),
            vec![
                OutputEvent::Notification("a".into()),
                OutputEvent::AutoplayStopped
            ]
        );
        assert!(bridge.try_recv().is_none());
    }

    #[test]
    fn test_full_buffer_counts_drops() {
        let (bridge, sender) = OutputBridge::new(1);
        let clone = sender.clone();
        sender.publish(OutputEvent::AutoplayStopped);
        clone.publish(OutputEvent::AutoplayStopped);
        clone.publish(OutputEvent::AutoplayStopped);

        assert_eq!(sender.dropped(), 2);
        assert_eq!(bridge.drain().len(), 1);
        sender.report_dropped();
        assert_eq!(clone.dropped(), 0);
    }
}
