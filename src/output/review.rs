//! Review channel: a plain-text buffer mirroring the point text

use crate::config::TextMode;
use crate::model::observer::Observer;
use crate::model::state::PlotState;
use crate::output::bridge::{OutputEvent, OutputSender};
use crate::output::notification::Notifier;
use crate::output::text;

#[derive(Debug)]
pub struct ReviewChannel {
    enabled: bool,
    last: Option<PlotState>,
    sender: OutputSender,
    notifier: Notifier,
}

impl ReviewChannel {
    pub fn new(sender: OutputSender, notifier: Notifier) -> Self {
        Self {
            enabled: false,
            last: None,
            sender,
            notifier,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn last_state(&self) -> Option<&PlotState> {
        self.last.as_ref()
    }

    /// Flip review mode for `state`; returns false when the toggle was rejected
    pub fn toggle(&mut self, state: &PlotState) -> bool {
        if state.is_empty() {
            self.notifier.notify("No info for review");
            return false;
        }
        self.enabled = !self.enabled;
        if self.enabled {
            self.publish(state);
        }
        true
    }

    fn publish(&self, state: &PlotState) {
        if let Some(value) = text::format(state, TextMode::Verbose) {
            self.sender.publish(OutputEvent::Review(value));
        }
    }
}

impl Observer for ReviewChannel {
    fn update(&mut self, state: &PlotState) {
        if self.enabled {
            self.publish(state);
        }
        self.last = Some(state.clone());
    }
}
