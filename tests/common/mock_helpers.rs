//! Recording observers and output event helpers

use maidr_rs::model::{Observer, PlotState};
use maidr_rs::output::Tone;
use maidr_rs::OutputEvent;
use std::cell::RefCell;
use std::rc::Rc;

/// Observer that keeps every state it receives
#[derive(Default)]
pub struct RecordingObserver {
    pub states: Vec<PlotState>,
}

impl Observer for RecordingObserver {
    fn update(&mut self, state: &PlotState) {
        self.states.push(state.clone());
    }
}

pub fn recorder() -> Rc<RefCell<RecordingObserver>> {
    Rc::new(RefCell::new(RecordingObserver::default()))
}

/// Spoken text from text events and notifications, in order
pub fn spoken(events: &[OutputEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            OutputEvent::Text { value, .. } | OutputEvent::Notification(value) => {
                Some(value.clone())
            }
            _ => None,
        })
        .collect()
}

pub fn notifications(events: &[OutputEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            OutputEvent::Notification(value) => Some(value.clone()),
            _ => None,
        })
        .collect()
}

pub fn count_tones(events: &[OutputEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, OutputEvent::Tone(_) | OutputEvent::Chord(_)))
        .count()
}

/// Single tones in order, chords flattened
pub fn tones(events: &[OutputEvent]) -> Vec<Tone> {
    events
        .iter()
        .flat_map(|event| match event {
            OutputEvent::Tone(tone) => vec![*tone],
            OutputEvent::Chord(chord) => chord.clone(),
            _ => Vec::new(),
        })
        .collect()
}
