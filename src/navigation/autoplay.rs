//! Autoplay scheduler
//!
//! Autoplay repeats the single step a user would take, once per timer tick,
//! until the active node can no longer move in that direction. The timer is
//! a `crossbeam_channel::tick` receiver held in the current [`Playback`];
//! replacing the playback restarts the timer and clearing it cancels it.
//!
//! Intervals are in milliseconds: a smaller interval plays faster.

use crate::config::AutoplaySettings;
use crate::model::movable::Movable;
use crate::model::state::PlotState;
use crate::output::bridge::OutputEvent;
use crate::output::notification::{MuteFlag, Notifier};
use crate::types::Direction;
use crossbeam_channel::{never, tick, Receiver};
use std::time::{Duration, Instant};

/// The running playback, if any
#[derive(Debug)]
struct Playback {
    direction: Direction,
    rate_ms: u64,
    ticker: Receiver<Instant>,
}

impl Playback {
    fn new(direction: Direction, rate_ms: u64) -> Self {
        Self {
            direction,
            rate_ms,
            ticker: tick(Duration::from_millis(rate_ms)),
        }
    }
}

#[derive(Debug)]
pub struct AutoplayScheduler {
    total_duration: u64,
    step: u64,
    default_speed: u64,
    min_speed: u64,
    max_speed: u64,
    /// Interval chosen through speed-up or speed-down
    user_speed: Option<u64>,
    playback: Option<Playback>,
    mute: MuteFlag,
    notifier: Notifier,
}

impl AutoplayScheduler {
    pub fn new(settings: &AutoplaySettings, mute: MuteFlag, notifier: Notifier) -> Self {
        Self {
            total_duration: settings.total_duration_ms,
            step: settings.speed_step_ms,
            default_speed: settings.default_speed_ms,
            min_speed: settings.min_speed_ms,
            max_speed: settings.max_speed_ms,
            user_speed: None,
            playback: None,
            mute,
            notifier,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.playback.as_ref().map(|p| p.direction)
    }

    /// Interval of the running playback
    pub fn rate_ms(&self) -> Option<u64> {
        self.playback.as_ref().map(|p| p.rate_ms)
    }

    pub fn min_speed(&self) -> u64 {
        self.min_speed
    }

    pub fn max_speed(&self) -> u64 {
        self.max_speed
    }

    pub fn default_speed(&self) -> u64 {
        self.default_speed
    }

    pub fn user_speed(&self) -> Option<u64> {
        self.user_speed
    }

    /// Timer of the running playback, or a receiver that never fires
    pub fn ticker(&self) -> Receiver<Instant> {
        match &self.playback {
            Some(playback) => playback.ticker.clone(),
            None => never(),
        }
    }

    /// Start playing `direction`, replacing any running playback
    pub fn start(&mut self, direction: Direction, state: &PlotState) {
        self.stop();

        let rate_ms = match self.user_speed {
            Some(speed) => speed,
            None => self.compute_rate(direction, state),
        };
        self.mute.set(true);
        self.begin(direction, rate_ms);
    }

    /// Advance one step, stopping at the boundary
    ///
    /// Returns whether the node moved.
    pub fn on_tick<M: Movable + ?Sized>(&mut self, node: &mut M) -> bool {
        let Some(direction) = self.direction() else {
            return false;
        };
        if node.is_movable(direction) {
            node.move_once(direction)
        } else {
            self.stop();
            false
        }
    }

    /// Cancel playback; always clears the text mute
    pub fn stop(&mut self) {
        self.mute.set(false);
        if let Some(playback) = self.playback.take() {
            tracing::debug!(direction = %playback.direction, "autoplay stopped");
            self.notifier.emit(OutputEvent::AutoplayStopped);
        }
    }

    pub fn speed_up(&mut self) {
        let rate = self.current_rate().saturating_sub(self.step);
        if rate >= self.min_speed && rate > 0 {
            self.user_speed = Some(rate);
            self.notifier.notify("Speed up");
            self.restart(rate);
        } else {
            self.notifier.notify("Max speed");
        }
    }

    pub fn speed_down(&mut self) {
        let rate = self.current_rate() + self.step;
        if rate <= self.max_speed {
            self.user_speed = Some(rate);
            self.notifier.notify("Speed down");
            self.restart(rate);
        } else {
            self.notifier.notify("Min speed");
        }
    }

    /// Drop the user interval and go back to the computed default
    pub fn reset_speed(&mut self, state: &PlotState) {
        self.user_speed = None;
        self.notifier.notify("Reset speed");
        if let Some(direction) = self.direction() {
            let rate = self.compute_rate(direction, state);
            self.restart(rate);
        }
    }

    fn current_rate(&self) -> u64 {
        self.rate_ms()
            .or(self.user_speed)
            .unwrap_or(self.default_speed)
    }

    /// `ceil(total / stops)` for the axis `direction` moves on
    ///
    /// Also lowers the minimum interval so dense traces can play faster than
    /// the configured floor.
    fn compute_rate(&mut self, direction: Direction, state: &PlotState) -> u64 {
        let stops = state
            .as_trace()
            .map(|trace| trace.autoplay.count(direction) as u64)
            .filter(|&count| count > 0);
        let Some(stops) = stops else {
            return self.default_speed;
        };

        let rate = self.total_duration.div_ceil(stops).max(1);
        self.default_speed = rate;
        self.min_speed = self.min_speed.min(rate);
        rate
    }

    fn restart(&mut self, rate_ms: u64) {
        if let Some(direction) = self.direction() {
            self.begin(direction, rate_ms);
        }
    }

    fn begin(&mut self, direction: Direction, rate_ms: u64) {
        tracing::debug!(%direction, rate_ms, "autoplay started");
        self.playback = Some(Playback::new(direction, rate_ms));
        self.notifier
            .emit(OutputEvent::AutoplayStarted { direction, rate_ms });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::movable::MockMovable;
    use crate::model::state::{EmptyState, Level};
    use crate::output::bridge::OutputBridge;
    use crate::model::observer::Observable;
    use crate::model::trace::Trace;
    use mockall::predicate::eq;
    use mockall::Sequence;
    use proptest::prelude::*;

    fn scheduler() -> (AutoplayScheduler, OutputBridge, MuteFlag) {
        let (bridge, sender) = OutputBridge::new(64);
        let mute = MuteFlag::new();
        let scheduler = AutoplayScheduler::new(
            &AutoplaySettings::default(),
            mute.clone(),
            Notifier::new(sender),
        );
        (scheduler, bridge, mute)
    }

    fn empty_state() -> PlotState {
        PlotState::Empty(EmptyState {
            level: Level::Trace,
            trace_type: None,
        })
    }

    fn line_state(points: usize) -> PlotState {
        let data: Vec<_> = (0..points)
            .map(|i| serde_json::json!({ "x": i, "y": (i % 7) as f64 }))
            .collect();
        let layer = serde_json::from_value(serde_json::json!({
            "id": "line",
            "type": "line",
            "data": [data],
        }))
        .unwrap();
        Trace::from_layer(&layer).unwrap().state()
    }

    fn notifications(bridge: &OutputBridge) -> Vec<String> {
        bridge
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                OutputEvent::Notification(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_tick_moves_until_boundary() {
        let (mut autoplay, _bridge, mute) = scheduler();
        autoplay.start(Direction::Forward, &empty_state());
        assert!(mute.is_muted());

        let mut node = MockMovable::new();
        let mut seq = Sequence::new();
        node.expect_is_movable()
            .with(eq(Direction::Forward))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(true);
        node.expect_move_once()
            .with(eq(Direction::Forward))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(true);
        node.expect_is_movable()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(false);

        assert!(autoplay.on_tick(&mut node));
        assert!(!autoplay.on_tick(&mut node));
        assert!(!autoplay.is_playing());
        assert!(!mute.is_muted());
    }

    #[test]
    fn test_tick_when_idle_does_nothing() {
        let (mut autoplay, _bridge, _mute) = scheduler();
        let mut node = MockMovable::new();
        node.expect_is_movable().never();
        assert!(!autoplay.on_tick(&mut node));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (mut autoplay, bridge, mute) = scheduler();
        autoplay.stop();
        assert!(bridge.drain().is_empty());

        autoplay.start(Direction::Backward, &empty_state());
        autoplay.stop();
        autoplay.stop();
        let stopped = bridge
            .drain()
            .into_iter()
            .filter(|e| *e == OutputEvent::AutoplayStopped)
            .count();
        assert_eq!(stopped, 1);
        assert!(!mute.is_muted());
    }

    #[test]
    fn test_restart_replaces_playback() {
        let (mut autoplay, _bridge, _mute) = scheduler();
        autoplay.start(Direction::Forward, &empty_state());
        autoplay.start(Direction::Upward, &empty_state());
        assert_eq!(autoplay.direction(), Some(Direction::Upward));
        assert_eq!(autoplay.rate_ms(), Some(250));
    }

    #[test]
    fn test_speed_bounds() {
        let (mut autoplay, bridge, _mute) = scheduler();
        autoplay.start(Direction::Forward, &empty_state());

        for _ in 0..10 {
            autoplay.speed_up();
        }
        assert_eq!(autoplay.rate_ms(), Some(50));
        let messages = notifications(&bridge);
        assert_eq!(messages.iter().filter(|m| *m == "Speed up").count(), 10);

        autoplay.speed_up();
        assert_eq!(autoplay.rate_ms(), Some(50));
        assert_eq!(notifications(&bridge), vec!["Max speed".to_string()]);

        for _ in 0..23 {
            autoplay.speed_down();
        }
        assert_eq!(autoplay.rate_ms(), Some(490));
        autoplay.speed_down();
        assert_eq!(autoplay.rate_ms(), Some(490));
        assert_eq!(notifications(&bridge).last().map(String::as_str), Some("Min speed"));
        assert_eq!(autoplay.direction(), Some(Direction::Forward));
    }

    #[test]
    fn test_reset_speed_clears_user_speed() {
        let (mut autoplay, bridge, _mute) = scheduler();
        autoplay.speed_down();
        assert_eq!(autoplay.user_speed(), Some(270));
        autoplay.reset_speed(&empty_state());
        assert_eq!(autoplay.user_speed(), None);
        assert_eq!(
            notifications(&bridge),
            vec!["Speed down".to_string(), "Reset speed".to_string()]
        );
    }

    #[test]
    fn test_idle_ticker_never_fires() {
        let (autoplay, _bridge, _mute) = scheduler();
        assert!(autoplay
            .ticker()
            .recv_timeout(Duration::from_millis(5))
            .is_err());
    }

    proptest! {
        #[test]
        fn prop_speed_changes_are_monotonic(
            points in 1usize..400,
            total in 100u64..10_000,
            step in 1u64..60,
            min in 1u64..200,
            span in 0u64..800,
            presses in prop::collection::vec(any::<bool>(), 1..40),
            direction in prop::sample::select(vec![Direction::Forward, Direction::Backward]),
        ) {
            let settings = AutoplaySettings {
                total_duration_ms: total,
                default_speed_ms: min + span / 2,
                min_speed_ms: min,
                max_speed_ms: min + span,
                speed_step_ms: step,
            };
            let (bridge, sender) = OutputBridge::new(64);
            let mut autoplay =
                AutoplayScheduler::new(&settings, MuteFlag::new(), Notifier::new(sender));
            autoplay.start(direction, &line_state(points));
            bridge.drain();

            for faster in presses {
                let before = autoplay.rate_ms().unwrap();
                if faster {
                    autoplay.speed_up();
                } else {
                    autoplay.speed_down();
                }
                let after = autoplay.rate_ms().unwrap();
                let messages = notifications(&bridge);

                match (faster, after.cmp(&before)) {
                    (true, std::cmp::Ordering::Less) => {
                        prop_assert_eq!(messages, vec!["Speed up".to_string()]);
                        prop_assert!(after >= autoplay.min_speed() && after > 0);
                    }
                    (false, std::cmp::Ordering::Greater) => {
                        prop_assert_eq!(messages, vec!["Speed down".to_string()]);
                        prop_assert!(after <= autoplay.max_speed());
                    }
                    (true, std::cmp::Ordering::Equal) => {
                        prop_assert_eq!(messages, vec!["Max speed".to_string()]);
                    }
                    (false, std::cmp::Ordering::Equal) => {
                        prop_assert_eq!(messages, vec!["Min speed".to_string()]);
                    }
                    (faster, order) => {
                        prop_assert!(false, "speed change went {:?} (faster: {})", order, faster);
                    }
                }
                prop_assert_eq!(autoplay.direction(), Some(direction));
                prop_assert!(autoplay.is_playing());
            }
        }
    }
}
