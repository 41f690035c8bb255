//! Sonification channel
//!
//! Maps the value under the cursor to a tone. Frequency follows the value
//! across the trace's `[min, max]`, stereo pan follows the position along
//! the panned axis.

use crate::config::{AudioMode, AudioSettings};
use crate::model::observer::Observer;
use crate::model::state::{AudioState, AudioValue, Level, PlotState};
use crate::output::bridge::{OutputEvent, OutputSender, Tone};
use crate::output::notification::Notifier;

/// Frequency of the tone played for an empty trace
pub const NULL_FREQUENCY: f64 = 100.0;

#[derive(Debug)]
pub struct AudioChannel {
    settings: AudioSettings,
    mode: AudioMode,
    last: Option<PlotState>,
    sender: OutputSender,
    notifier: Notifier,
}

impl AudioChannel {
    pub fn new(settings: AudioSettings, sender: OutputSender, notifier: Notifier) -> Self {
        Self {
            mode: settings.mode,
            settings,
            last: None,
            sender,
            notifier,
        }
    }

    pub fn mode(&self) -> AudioMode {
        self.mode
    }

    pub fn last_state(&self) -> Option<&PlotState> {
        self.last.as_ref()
    }

    /// Advance to the next mode and announce it
    pub fn toggle(&mut self) -> AudioMode {
        self.mode = self.mode.next();
        self.notifier.notify(format!("Sound is {}", self.mode));
        self.mode
    }

    fn play(&self, state: &PlotState) {
        match state {
            PlotState::Empty(empty) if empty.level == Level::Trace => {
                self.sender.publish(OutputEvent::Tone(self.null_tone()));
            }
            PlotState::Trace(trace) => self.play_audio(&trace.audio),
            _ => {}
        }
    }

    fn play_audio(&self, audio: &AudioState) {
        match &audio.value {
            AudioValue::Single(value) => {
                self.sender
                    .publish(OutputEvent::Tone(self.tone(audio, *value)));
            }
            AudioValue::Group(values) => {
                let tones: Vec<Tone> = values.iter().map(|v| self.tone(audio, *v)).collect();
                if self.mode == AudioMode::Combined {
                    self.sender.publish(OutputEvent::Chord(tones));
                } else {
                    for tone in tones {
                        self.sender.publish(OutputEvent::Tone(tone));
                    }
                }
            }
        }
    }

    fn tone(&self, audio: &AudioState, value: f64) -> Tone {
        Tone {
            frequency: frequency(
                value,
                audio.min,
                audio.max,
                self.settings.min_frequency,
                self.settings.max_frequency,
            ),
            pan: pan(audio.index, audio.size),
            duration_ms: self.settings.tone_duration_ms,
            volume: self.volume(),
        }
    }

    fn null_tone(&self) -> Tone {
        Tone {
            frequency: NULL_FREQUENCY,
            pan: 0.0,
            duration_ms: self.settings.tone_duration_ms,
            volume: self.volume(),
        }
    }

    fn volume(&self) -> f64 {
        f64::from(self.settings.volume.min(100)) / 100.0
    }
}

impl Observer for AudioChannel {
    fn update(&mut self, state: &PlotState) {
        if self.mode != AudioMode::Off {
            self.play(state);
        }
        self.last = Some(state.clone());
    }
}

/// Linear map of `value` from `from` onto `to`; the midpoint of `to` when `from` is a single point
pub fn interpolate(value: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let span = from.1 - from.0;
    if span == 0.0 || !span.is_finite() {
        return (to.0 + to.1) / 2.0;
    }
    to.0 + (value - from.0) / span * (to.1 - to.0)
}

pub fn frequency(value: f64, min: f64, max: f64, min_frequency: f64, max_frequency: f64) -> f64 {
    if value.is_nan() {
        return NULL_FREQUENCY;
    }
    interpolate(value, (min, max), (min_frequency, max_frequency))
        .clamp(min_frequency, max_frequency)
}

/// Stereo position of `index` among `size` positions
pub fn pan(index: usize, size: usize) -> f64 {
    let last = size.saturating_sub(1) as f64;
    interpolate(index as f64, (0.0, last), (-1.0, 1.0)).clamp(-1.0, 1.0)
}
