//! Highlight channel: reports which point the trace cursor is on

use crate::model::observer::Observer;
use crate::model::state::PlotState;
use crate::output::bridge::{OutputEvent, OutputSender};

#[derive(Debug)]
pub struct HighlightChannel {
    last: Option<PlotState>,
    sender: OutputSender,
}

impl HighlightChannel {
    pub fn new(sender: OutputSender) -> Self {
        Self { last: None, sender }
    }

    pub fn last_state(&self) -> Option<&PlotState> {
        self.last.as_ref()
    }
}

impl Observer for HighlightChannel {
    fn update(&mut self, state: &PlotState) {
        if let Some(trace) = state.as_trace() {
            self.sender.publish(OutputEvent::Highlight(trace.cursor));
        }
        self.last = Some(state.clone());
    }
}
