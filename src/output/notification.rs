//! Status message sink
//!
//! Short user-facing strings (mode toggles, speed changes, search misses)
//! go through a [`Notifier`] rather than the observer fan-out.

use crate::output::bridge::{OutputEvent, OutputSender};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct Notifier {
    sender: OutputSender,
}

impl Notifier {
    pub fn new(sender: OutputSender) -> Self {
        Self { sender }
    }

    pub fn notify(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "notification");
        self.sender.publish(OutputEvent::Notification(message));
    }

    pub fn emit(&self, event: OutputEvent) {
        self.sender.publish(event);
    }

    pub fn sender(&self) -> &OutputSender {
        &self.sender
    }
}

/// Shared flag silencing text announcements while autoplay runs
#[derive(Debug, Clone, Default)]
pub struct MuteFlag(Rc<Cell<bool>>);

impl MuteFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, muted: bool) {
        self.0.set(muted);
    }

    pub fn is_muted(&self) -> bool {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::bridge::OutputBridge;

    #[test]
    fn test_notify_publishes_notification() {
        let (bridge, sender) = OutputBridge::new(4);
        Notifier::new(sender).notify("Speed up");
        assert_eq!(
            bridge.drain(),
            vec![OutputEvent::Notification("Speed up".into())]
        );
    }

    #[test]
    fn test_mute_flag_is_shared() {
        let flag = MuteFlag::new();
        let clone = flag.clone();
        clone.set(true);
        assert!(flag.is_muted());
    }
}
