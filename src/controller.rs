//! Chart controller: wires the plot model, navigation and output channels
//!
//! One controller serves one chart. The plot tree and the output channels
//! live as long as the controller; the navigation session (context,
//! autoplay scheduler, rotor) exists only while the chart has focus.
//!
//! # Example
//!
//! ```no_run
//! use maidr_rs::config::Settings;
//! use maidr_rs::controller::ChartController;
//!
//! let json = std::fs::read_to_string("chart.json")?;
//! let mut chart = ChartController::from_json(&json, Settings::default())?;
//! println!("{}", chart.focus_in());
//! chart.handle_key("right");
//! for event in chart.drain() {
//!     println!("{:?}", event);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::command::{Command, KeyChord, Keymap};
use crate::config::Settings;
use crate::error::Result;
use crate::model::grammar::Maidr;
use crate::model::observer::{Observer, ObserverKey};
use crate::model::plot::{Figure, PlotPath};
use crate::model::state::{EmptyState, PlotState};
use crate::navigation::context::NO_MORE_LAYERS;
use crate::navigation::{AutoplayScheduler, NavigationContext, RotorNavigator, RotorUnit};
use crate::output::{
    AudioChannel, BrailleChannel, HighlightChannel, MuteFlag, Notifier, OutputBridge,
    OutputEvent, OutputSender, ReviewChannel, TextChannel, OUTPUT_CHANNEL_CAPACITY,
};
use crate::types::{Direction, Scope};
use crossbeam_channel::Receiver;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

/// Navigation state that exists while the chart has focus
#[derive(Debug)]
struct Session {
    context: NavigationContext,
    autoplay: AutoplayScheduler,
    rotor: RotorNavigator,
}

pub struct ChartController {
    figure: Figure,
    settings: Settings,
    keymap: Keymap,
    bridge: OutputBridge,
    sender: OutputSender,
    notifier: Notifier,
    mute: MuteFlag,
    audio: Rc<RefCell<AudioChannel>>,
    braille: Rc<RefCell<BrailleChannel>>,
    text: Rc<RefCell<TextChannel>>,
    review: Rc<RefCell<ReviewChannel>>,
    highlight: Rc<RefCell<HighlightChannel>>,
    session: Option<Session>,
}

impl ChartController {
    /// Build the plot tree and register every output channel on it
    pub fn new(chart: &Maidr, mut settings: Settings) -> Result<Self> {
        settings.validate();
        let keymap = Keymap::with_overrides(&settings.keymap)?;
        let mut figure = Figure::from_grammar(chart)?;

        let (bridge, sender) = OutputBridge::new(OUTPUT_CHANNEL_CAPACITY);
        let notifier = Notifier::new(sender.clone());
        let mute = MuteFlag::new();

        let audio = Rc::new(RefCell::new(AudioChannel::new(
            settings.audio.clone(),
            sender.clone(),
            notifier.clone(),
        )));
        let braille = Rc::new(RefCell::new(BrailleChannel::new(
            false,
            sender.clone(),
            notifier.clone(),
        )));
        let text = Rc::new(RefCell::new(TextChannel::new(
            settings.text.mode,
            mute.clone(),
            sender.clone(),
            notifier.clone(),
        )));
        let review = Rc::new(RefCell::new(ReviewChannel::new(
            sender.clone(),
            notifier.clone(),
        )));
        let highlight = Rc::new(RefCell::new(HighlightChannel::new(sender.clone())));

        figure.register_observer(ObserverKey::Audio, audio.clone());
        figure.register_observer(ObserverKey::Braille, braille.clone());
        figure.register_observer(ObserverKey::Text, text.clone());
        figure.register_observer(ObserverKey::Review, review.clone());
        figure.register_observer(ObserverKey::Highlight, highlight.clone());

        tracing::info!(chart = %chart.id, subplots = figure.size(), "chart loaded");

        Ok(Self {
            figure,
            settings,
            keymap,
            bridge,
            sender,
            notifier,
            mute,
            audio,
            braille,
            text,
            review,
            highlight,
            session: None,
        })
    }

    pub fn from_json(json: &str, settings: Settings) -> Result<Self> {
        Self::new(&Maidr::from_json(json)?, settings)
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn is_focused(&self) -> bool {
        self.session.is_some()
    }

    /// Scope receiving input, while focused
    pub fn scope(&self) -> Option<Scope> {
        self.session.as_ref().and_then(|s| s.context.scope())
    }

    /// Whole scope stack, bottom first; empty while unfocused
    pub fn scopes(&self) -> &[Scope] {
        match &self.session {
            Some(session) => session.context.scopes().as_slice(),
            None => &[],
        }
    }

    /// Node receiving movement, while focused
    pub fn active(&self) -> Option<PlotPath> {
        self.session.as_ref().map(|s| s.context.active())
    }

    pub fn rotor_unit(&self) -> Option<RotorUnit> {
        self.session.as_ref().map(|s| s.rotor.current_unit())
    }

    pub fn is_autoplaying(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.autoplay.is_playing())
    }

    pub fn autoplay_rate_ms(&self) -> Option<u64> {
        self.session.as_ref().and_then(|s| s.autoplay.rate_ms())
    }

    pub fn is_muted(&self) -> bool {
        self.mute.is_muted()
    }

    /// Fresh state of the active node, while focused
    pub fn state(&self) -> Option<PlotState> {
        let session = self.session.as_ref()?;
        Some(self.active_state(&session.context))
    }

    /// Start a navigation session and return the instruction text
    pub fn focus_in(&mut self) -> String {
        if let Some(session) = &self.session {
            return session.context.get_instruction(&self.figure, true);
        }

        let mut session = Session {
            context: NavigationContext::new(&self.figure),
            autoplay: AutoplayScheduler::new(
                &self.settings.autoplay,
                self.mute.clone(),
                self.notifier.clone(),
            ),
            rotor: RotorNavigator::new(self.notifier.clone()),
        };
        tracing::debug!(active = ?session.context.active(), "chart focused");

        if self.settings.braille.enabled_on_start {
            let state = self.active_state(&session.context);
            if self.braille.borrow_mut().toggle(&state) {
                session.context.toggle_scope(Scope::Braille);
            }
        }

        let instruction = session.context.get_instruction(&self.figure, true);
        self.session = Some(session);
        instruction
    }

    /// End the navigation session
    pub fn focus_out(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.autoplay.stop();
            tracing::debug!("chart lost focus");
        }
        self.sender.report_dropped();
    }

    /// Resolve `chord` in the active scope and run it
    ///
    /// Returns the command that ran. Unbound or malformed chords are ignored.
    pub fn handle_key(&mut self, chord: &str) -> Option<Command> {
        let scope = self.scope()?;
        let chord: KeyChord = match chord.parse() {
            Ok(chord) => chord,
            Err(e) => {
                tracing::debug!("ignoring key: {}", e);
                return None;
            }
        };
        let command = self.keymap.lookup(scope, &chord)?;
        self.execute(command);
        Some(command)
    }

    /// Run `command` against the active session; ignored while unfocused
    pub fn execute(&mut self, command: Command) {
        let Self {
            figure,
            session,
            braille,
            review,
            audio,
            text,
            highlight,
            sender,
            notifier,
            ..
        } = self;
        let Some(session) = session.as_mut() else {
            return;
        };
        tracing::debug!(%command, scope = ?session.context.scope(), "execute");

        if command.is_manual_move() {
            session.autoplay.stop();
        }

        if let Some(direction) = command.step_direction() {
            step(figure, session, direction);
            return;
        }
        if let Some(direction) = command.extreme_direction() {
            session.context.move_to_extreme(figure, direction);
            return;
        }
        if let Some(direction) = command.autoplay_direction() {
            let state = state_of(figure, &session.context);
            session.autoplay.start(direction, &state);
            return;
        }

        match command {
            Command::MoveToNextTrace | Command::MoveToPrevTrace => {
                let direction = match command {
                    Command::MoveToNextTrace => Direction::Upward,
                    _ => Direction::Downward,
                };
                if !session.context.step_trace(figure, direction) {
                    notifier.notify(NO_MORE_LAYERS);
                }
            }
            Command::MoveToTraceContext => {
                session.context.enter_subplot(figure);
            }
            Command::MoveToSubplotContext => {
                session.context.exit_subplot(figure);
            }
            Command::StopAutoplay => session.autoplay.stop(),
            Command::SpeedUpAutoplay => session.autoplay.speed_up(),
            Command::SpeedDownAutoplay => session.autoplay.speed_down(),
            Command::ResetAutoplaySpeed => {
                let state = state_of(figure, &session.context);
                session.autoplay.reset_speed(&state);
            }
            Command::ToggleBraille => {
                session.autoplay.stop();
                let state = state_of(figure, &session.context);
                if braille.borrow_mut().toggle(&state) {
                    session.context.toggle_scope(Scope::Braille);
                }
            }
            Command::ToggleReview => {
                session.autoplay.stop();
                let state = state_of(figure, &session.context);
                if review.borrow_mut().toggle(&state) {
                    session.context.toggle_scope(Scope::Review);
                }
            }
            Command::ToggleText => {
                text.borrow_mut().toggle();
            }
            Command::ToggleAudio => {
                audio.borrow_mut().toggle();
            }
            Command::ActivateFigureLabelScope | Command::DeactivateFigureLabelScope => {
                session.autoplay.stop();
                session.context.toggle_scope(Scope::FigureLabel);
            }
            Command::ActivateTraceLabelScope | Command::DeactivateTraceLabelScope => {
                session.autoplay.stop();
                session.context.toggle_scope(Scope::TraceLabel);
            }
            Command::DescribePoint => {
                let state = state_of(figure, &session.context);
                text.borrow_mut().update(&state);
                if state.as_trace().is_some() {
                    audio.borrow_mut().update(&state);
                    braille.borrow_mut().update(&state);
                    highlight.borrow_mut().update(&state);
                }
            }
            Command::DescribeX
            | Command::DescribeY
            | Command::DescribeFill
            | Command::DescribeTitle
            | Command::DescribeSubtitle
            | Command::DescribeCaption => {
                let state = state_of(figure, &session.context);
                if let Some(message) = describe(figure, &state, command) {
                    sender.publish(OutputEvent::Text {
                        value: message,
                        announce: true,
                    });
                }
            }
            Command::RotorNextNav => {
                session.rotor.cycle_next();
            }
            Command::RotorPrevNav => {
                session.rotor.cycle_prev();
            }
            // Directional commands were handled above.
            _ => {}
        }
    }

    /// Forward one autoplay tick to the active node
    pub fn on_tick(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match self.figure.node_mut(session.context.active()) {
            Some(node) => session.autoplay.on_tick(node),
            None => {
                session.autoplay.stop();
                false
            }
        }
    }

    /// Timer of the running autoplay, or a receiver that never fires
    pub fn ticker(&self) -> Receiver<Instant> {
        match &self.session {
            Some(session) => session.autoplay.ticker(),
            None => crossbeam_channel::never(),
        }
    }

    /// Pending output events
    pub fn drain(&self) -> Vec<OutputEvent> {
        self.bridge.drain()
    }

    fn active_state(&self, context: &NavigationContext) -> PlotState {
        state_of(&self.figure, context)
    }
}

fn state_of(figure: &Figure, context: &NavigationContext) -> PlotState {
    context.state(figure).unwrap_or_else(|| {
        PlotState::Empty(EmptyState {
            level: context.active().level(),
            trace_type: None,
        })
    })
}

/// One arrow-key step, or a rotor jump when a value unit is selected
fn step(figure: &mut Figure, session: &mut Session, direction: Direction) {
    let unit = session.rotor.current_unit();
    let in_trace_scope = matches!(
        session.context.scope(),
        Some(Scope::Trace) | Some(Scope::Braille)
    );
    let PlotPath::Trace { subplot, layer } = session.context.active() else {
        session.context.move_once(figure, direction);
        return;
    };
    if unit == RotorUnit::DataPoint || !in_trace_scope {
        session.context.move_once(figure, direction);
        return;
    }

    let target = figure.trace(subplot, layer).and_then(|trace| {
        session
            .rotor
            .find_target_for_value_navigation(trace, direction, unit)
    });
    match target {
        Some(target) => {
            session.context.move_to_index(figure, target);
        }
        None => session.rotor.emit_target_not_found(unit, direction),
    }
}

fn describe(figure: &Figure, state: &PlotState, command: Command) -> Option<String> {
    let message = match (command, state) {
        (Command::DescribeX, PlotState::Trace(trace)) => format!("X label is {}", trace.x_axis),
        (Command::DescribeY, PlotState::Trace(trace)) => format!("Y label is {}", trace.y_axis),
        (Command::DescribeFill, PlotState::Trace(trace)) => format!("Fill is {}", trace.fill),
        (Command::DescribeTitle, PlotState::Figure(fig)) => format!("Figure title is {}", fig.title),
        (Command::DescribeTitle, PlotState::Trace(trace)) => {
            format!("Subplot title is {}", trace.title)
        }
        (Command::DescribeSubtitle, _) if !state.is_empty() => {
            format!("Subtitle is {}", figure.subtitle())
        }
        (Command::DescribeCaption, _) if !state.is_empty() => {
            format!("Caption is {}", figure.caption())
        }
        _ => return None,
    };
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = r#"{"id": "c", "title": "Prices", "subplots": [[{"layers": [
        {"id": "l", "type": "line", "title": "Daily",
         "axes": {"x": "Day", "y": "Price"},
         "data": [[
            {"x": 1, "y": 5}, {"x": 2, "y": 10}, {"x": 3, "y": 15},
            {"x": 4, "y": 8}, {"x": 5, "y": 12}
         ]]}
    ]}]]}"#;

    fn controller() -> ChartController {
        ChartController::from_json(LINE, Settings::default()).unwrap()
    }

    fn texts(events: &[OutputEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| match event {
                OutputEvent::Text { value, .. } => Some(value.clone()),
                OutputEvent::Notification(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_unfocused_commands_are_ignored() {
        let mut chart = controller();
        assert_eq!(chart.handle_key("right"), None);
        chart.execute(Command::MoveRight);
        assert!(chart.drain().is_empty());
    }

    #[test]
    fn test_keys_move_and_render() {
        let mut chart = controller();
        chart.focus_in();
        assert_eq!(chart.handle_key("right"), Some(Command::MoveRight));
        assert_eq!(chart.handle_key("Right"), Some(Command::MoveRight));
        let events = chart.drain();
        assert!(texts(&events).contains(&"Day is 2, Price is 10".to_string()));
        assert!(events.contains(&OutputEvent::Highlight(crate::types::Coordinate::new(0, 1))));
        assert_eq!(chart.handle_key("q"), None);
    }

    #[test]
    fn test_describe_labels() {
        let mut chart = controller();
        chart.focus_in();
        chart.handle_key("l");
        assert_eq!(chart.scope(), Some(Scope::TraceLabel));
        chart.handle_key("x");
        chart.handle_key("t");
        chart.handle_key("escape");
        assert_eq!(chart.scope(), Some(Scope::Trace));
        assert_eq!(
            texts(&chart.drain()),
            vec!["X label is Day".to_string(), "Subplot title is Daily".to_string()]
        );
    }

    #[test]
    fn test_rotor_replaces_arrows() {
        let mut chart = controller();
        chart.focus_in();
        chart.handle_key("right");
        chart.handle_key("right");
        chart.handle_key("alt+shift+up");
        assert_eq!(chart.rotor_unit(), Some(RotorUnit::HigherValue));
        chart.drain();

        chart.handle_key("right");
        assert!(texts(&chart.drain()).contains(&"Day is 3, Price is 15".to_string()));

        chart.handle_key("right");
        assert!(chart.drain().contains(&OutputEvent::TargetNotFound {
            unit: RotorUnit::HigherValue,
            direction: Direction::Forward,
            message: "No higher value found forward".into(),
        }));
    }

    #[test]
    fn test_manual_move_stops_autoplay() {
        let mut chart = controller();
        chart.focus_in();
        chart.handle_key("ctrl+shift+right");
        assert!(chart.is_autoplaying());
        assert!(chart.is_muted());
        chart.handle_key("left");
        assert!(!chart.is_autoplaying());
        assert!(!chart.is_muted());
    }

    #[test]
    fn test_single_layer_step_announces_boundary() {
        let mut chart = controller();
        chart.focus_in();
        chart.handle_key("right");
        chart.drain();

        assert_eq!(chart.handle_key("pageup"), Some(Command::MoveToNextTrace));
        assert_eq!(chart.handle_key("pagedown"), Some(Command::MoveToPrevTrace));
        assert_eq!(
            texts(&chart.drain()),
            vec![NO_MORE_LAYERS.to_string(), NO_MORE_LAYERS.to_string()]
        );
    }

    #[test]
    fn test_focus_out_stops_session() {
        let mut chart = controller();
        chart.focus_in();
        chart.handle_key("ctrl+shift+right");
        chart.focus_out();
        assert!(!chart.is_focused());
        assert!(!chart.is_muted());
        assert!(!chart.on_tick());
    }
}
