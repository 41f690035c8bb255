//! Shared helpers for the integration tests

#![allow(dead_code)] // Each test binary uses a different subset

pub mod builders;
pub mod mock_helpers;

use maidr_rs::output::Tone;
use std::time::Duration;

/// How long to wait on a ticker that is expected to stay silent
pub fn idle_wait() -> Duration {
    Duration::from_millis(100)
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Assert a tone's pitch in Hz and its stereo position
pub fn assert_tone(tone: &Tone, frequency: f64, pan: f64) {
    assert_float_eq(tone.frequency, frequency, 1e-6);
    assert_float_eq(tone.pan, pan, 1e-9);
}
