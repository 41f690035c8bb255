//! Per-concern settings sections
//!
//! Each section maps to one `[table]` of the settings file. All fields have
//! defaults, so a partial file only overrides what it names.
//!
//! # Main Types
//!
//! - [`AudioSettings`] - Sonification mode, volume and frequency range
//! - [`AutoplaySettings`] - Traversal budget and speed bounds for autoplay
//! - [`TextSettings`] - Initial text verbosity
//! - [`BrailleSettings`] - Whether the braille display starts enabled

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default lowest tone frequency in Hz
pub const DEFAULT_MIN_FREQUENCY: f64 = 200.0;

/// Default highest tone frequency in Hz
pub const DEFAULT_MAX_FREQUENCY: f64 = 1000.0;

/// Audible range accepted by [`AudioSettings::validate`]
const FREQUENCY_RANGE: (f64, f64) = (20.0, 20_000.0);

/// How grouped values are sonified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioMode {
    /// One tone per value, played in sequence
    #[default]
    Separate,
    /// All values of a group sounded together
    Combined,
    Off,
}

impl AudioMode {
    /// Next mode in the toggle cycle: separate, combined, off
    pub fn next(self) -> Self {
        match self {
            AudioMode::Separate => AudioMode::Combined,
            AudioMode::Combined => AudioMode::Off,
            AudioMode::Off => AudioMode::Separate,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioMode::Separate => "separate",
            AudioMode::Combined => "combined",
            AudioMode::Off => "off",
        }
    }
}

impl fmt::Display for AudioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    #[default]
    Verbose,
    Terse,
    Off,
}

impl TextMode {
    /// Next mode in the toggle cycle: verbose, terse, off
    pub fn next(self) -> Self {
        match self {
            TextMode::Verbose => TextMode::Terse,
            TextMode::Terse => TextMode::Off,
            TextMode::Off => TextMode::Verbose,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextMode::Verbose => "verbose",
            TextMode::Terse => "terse",
            TextMode::Off => "off",
        }
    }
}

impl fmt::Display for TextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sonification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Initial audio mode
    pub mode: AudioMode,
    /// Volume in percent (0-100)
    pub volume: u8,
    /// Frequency used for the lowest value, in Hz
    pub min_frequency: f64,
    /// Frequency used for the highest value, in Hz
    pub max_frequency: f64,
    /// Length of a single tone in milliseconds
    pub tone_duration_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            mode: AudioMode::Separate,
            volume: 50,
            min_frequency: DEFAULT_MIN_FREQUENCY,
            max_frequency: DEFAULT_MAX_FREQUENCY,
            tone_duration_ms: 150,
        }
    }
}

impl AudioSettings {
    /// Clamp values into usable ranges, returning a description of every fix
    pub fn validate(&mut self) -> Vec<String> {
        let mut fixes = Vec::new();

        if self.volume > 100 {
            fixes.push(format!("audio.volume {} clamped to 100", self.volume));
            self.volume = 100;
        }

        let (low, high) = FREQUENCY_RANGE;
        for (name, value) in [
            ("min_frequency", &mut self.min_frequency),
            ("max_frequency", &mut self.max_frequency),
        ] {
            let current = *value;
            if !current.is_finite() || current < low || current > high {
                let clamped = if current.is_finite() {
                    current.clamp(low, high)
                } else {
                    low
                };
                fixes.push(format!("audio.{} {} clamped to {}", name, current, clamped));
                *value = clamped;
            }
        }

        if self.min_frequency > self.max_frequency {
            fixes.push("audio.min_frequency and audio.max_frequency swapped".to_string());
            std::mem::swap(&mut self.min_frequency, &mut self.max_frequency);
        }

        fixes
    }
}

/// Autoplay timing settings, all in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoplaySettings {
    /// Time budget for traversing a whole axis
    pub total_duration_ms: u64,
    /// Interval used when no stop count is available
    pub default_speed_ms: u64,
    /// Shortest interval (fastest playback) reachable through speed-up
    pub min_speed_ms: u64,
    /// Longest interval (slowest playback) reachable through speed-down
    pub max_speed_ms: u64,
    /// Interval change applied by one speed-up or speed-down
    pub speed_step_ms: u64,
}

impl Default for AutoplaySettings {
    fn default() -> Self {
        Self {
            total_duration_ms: 4000,
            default_speed_ms: 250,
            min_speed_ms: 50,
            max_speed_ms: 500,
            speed_step_ms: 20,
        }
    }
}

impl AutoplaySettings {
    /// Clamp values into usable ranges, returning a description of every fix
    pub fn validate(&mut self) -> Vec<String> {
        let mut fixes = Vec::new();

        if self.total_duration_ms == 0 {
            fixes.push("autoplay.total_duration_ms must be positive, using 4000".to_string());
            self.total_duration_ms = 4000;
        }
        if self.min_speed_ms == 0 {
            fixes.push("autoplay.min_speed_ms must be positive, using 1".to_string());
            self.min_speed_ms = 1;
        }
        if self.speed_step_ms == 0 {
            fixes.push("autoplay.speed_step_ms must be positive, using 20".to_string());
            self.speed_step_ms = 20;
        }
        if self.min_speed_ms > self.max_speed_ms {
            fixes.push("autoplay.min_speed_ms and autoplay.max_speed_ms swapped".to_string());
            std::mem::swap(&mut self.min_speed_ms, &mut self.max_speed_ms);
        }

        let clamped = self
            .default_speed_ms
            .clamp(self.min_speed_ms, self.max_speed_ms);
        if clamped != self.default_speed_ms {
            fixes.push(format!(
                "autoplay.default_speed_ms {} clamped to {}",
                self.default_speed_ms, clamped
            ));
            self.default_speed_ms = clamped;
        }

        fixes
    }
}

/// Text output settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    /// Initial text mode
    pub mode: TextMode,
}

/// Braille output settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrailleSettings {
    /// Turn the braille display on as soon as the chart gains focus
    pub enabled_on_start: bool,
}
