//! Braille channel
//!
//! Renders the trace's braille grid as newline-terminated rows and reports
//! the caret as a linear offset into that text.

use crate::model::observer::Observer;
use crate::model::state::{BrailleState, PlotState};
use crate::output::bridge::{OutputEvent, OutputSender};
use crate::output::notification::Notifier;

#[derive(Debug)]
pub struct BrailleChannel {
    enabled: bool,
    last: Option<PlotState>,
    sender: OutputSender,
    notifier: Notifier,
}

impl BrailleChannel {
    pub fn new(enabled: bool, sender: OutputSender, notifier: Notifier) -> Self {
        Self {
            enabled,
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

    /// Flip the display for `state`; returns false when the toggle was rejected
    pub fn toggle(&mut self, state: &PlotState) -> bool {
        let Some(trace) = state.as_trace() else {
            self.notifier.notify("No info for braille");
            return false;
        };
        if trace.braille == BrailleState::Empty {
            self.notifier.notify(format!(
                "Braille is not supported for plot type: {}",
                trace.trace_type
            ));
            return false;
        }

        self.enabled = !self.enabled;
        self.notifier.notify(if self.enabled {
            "Braille is on"
        } else {
            "Braille is off"
        });
        if self.enabled {
            self.render(&trace.braille);
        }
        true
    }

    fn render(&self, braille: &BrailleState) {
        if let Some((text, caret)) = render(braille) {
            self.sender.publish(OutputEvent::Braille { text, caret });
        }
    }
}

impl Observer for BrailleChannel {
    fn update(&mut self, state: &PlotState) {
        if self.enabled {
            if let Some(trace) = state.as_trace() {
                self.render(&trace.braille);
            }
        }
        self.last = Some(state.clone());
    }
}

/// Grid text and caret offset, `None` for an empty grid
pub fn render(braille: &BrailleState) -> Option<(String, usize)> {
    let BrailleState::Grid { values, row, col } = braille else {
        return None;
    };

    let mut text = String::new();
    let mut caret = 0;
    for (r, cells) in values.iter().enumerate() {
        if r == *row {
            caret = text.chars().count() + col;
        }
        text.extend(cells.iter());
        text.push('\n');
    }
    Some((text, caret))
}
