//! Text channel and point formatters
//!
//! Verbose text reads every label (`X is 3, Y is 10`); terse text reads the
//! values only (`3, 10`). Figure and subplot states produce orientation
//! sentences instead of point text.

use crate::config::TextMode;
use crate::model::observer::Observer;
use crate::model::state::{FigureState, Level, PlotState, SubplotState, TextState, TextValue};
use crate::output::bridge::{OutputEvent, OutputSender};
use crate::output::notification::{MuteFlag, Notifier};
use crate::types::TraceType;

#[derive(Debug)]
pub struct TextChannel {
    mode: TextMode,
    mute: MuteFlag,
    last: Option<PlotState>,
    sender: OutputSender,
    notifier: Notifier,
}

impl TextChannel {
    pub fn new(mode: TextMode, mute: MuteFlag, sender: OutputSender, notifier: Notifier) -> Self {
        Self {
            mode,
            mute,
            last: None,
            sender,
            notifier,
        }
    }

    pub fn mode(&self) -> TextMode {
        self.mode
    }

    pub fn last_state(&self) -> Option<&PlotState> {
        self.last.as_ref()
    }

    pub fn toggle(&mut self) -> TextMode {
        self.mode = self.mode.next();
        self.notifier.notify(format!("Text mode is {}", self.mode));
        self.mode
    }

    /// Formatted text for `state` in the current mode
    pub fn format(&self, state: &PlotState) -> Option<String> {
        format(state, self.mode)
    }
}

impl Observer for TextChannel {
    fn update(&mut self, state: &PlotState) {
        self.last = Some(state.clone());
        if self.mode == TextMode::Off {
            return;
        }

        match state {
            PlotState::Subplot(subplot) => {
                self.notifier.notify(subplot_text(subplot));
            }
            _ => {
                if let Some(value) = format(state, self.mode) {
                    self.sender.publish(OutputEvent::Text {
                        value,
                        announce: !self.mute.is_muted(),
                    });
                }
            }
        }
    }
}

/// Text for any state, or `None` when text is off
pub fn format(state: &PlotState, mode: TextMode) -> Option<String> {
    let text = match (state, mode) {
        (_, TextMode::Off) => return None,
        (PlotState::Empty(empty), _) => empty_text(empty.level),
        (PlotState::Figure(figure), _) => figure_text(figure),
        (PlotState::Subplot(subplot), _) => subplot_text(subplot),
        (PlotState::Trace(trace), TextMode::Verbose) => verbose(&trace.text),
        (PlotState::Trace(trace), TextMode::Terse) => terse(&trace.text),
    };
    Some(text)
}

pub fn empty_text(level: Level) -> String {
    let noun = match level {
        Level::Trace => "plot",
        Level::Subplot => "subplot",
        Level::Figure => "figure",
    };
    format!("No {} info to display", noun)
}

pub fn figure_text(figure: &FigureState) -> String {
    let description = match figure.trace_types.as_slice() {
        [single] => format!("This is a {} plot.", single),
        types => format!(
            "This is a multi-layered plot containing {} plots.",
            join_types(types)
        ),
    };
    format!(
        "Subplot {} of {}: {} Press 'ENTER' to select this subplot.",
        figure.index, figure.size, description
    )
}

pub fn subplot_text(subplot: &SubplotState) -> String {
    format!(
        "Layer {} of {}: {} plot",
        subplot.index, subplot.size, subplot.trace_type
    )
}

pub fn verbose(text: &TextState) -> String {
    let mut out = String::new();

    out.push_str(&text.main.label);
    out.push_str(" is ");
    match &text.range {
        Some(range) => {
            out.push_str(&range.min);
            out.push_str(" through ");
            out.push_str(&range.max);
        }
        None => out.push_str(&text.main.value.to_string()),
    }

    out.push_str(", ");
    out.push_str(&text.cross.label);
    if let Some(section) = &text.section {
        out.push_str(", ");
        if let TextValue::Many(values) = &text.cross.value {
            out.push_str(&format!("{} ", values.len()));
        }
        out.push_str(section);
    }
    match &text.cross.value {
        TextValue::Many(values) if values.len() > 1 => {
            out.push_str(" are ");
            out.push_str(&values.join(", "));
        }
        value => {
            out.push_str(" is ");
            out.push_str(&value.to_string());
        }
    }

    if let Some(fill) = &text.fill {
        out.push_str(&format!(", {} is {}", fill.label, fill.value));
    }
    out
}

pub fn terse(text: &TextState) -> String {
    let mut out = match (&text.range, &text.main.value) {
        (Some(range), _) => format!("{} through {}, ", range.min, range.max),
        (None, TextValue::Many(values)) => format!("[{}], ", values.join(", ")),
        (None, TextValue::Single(value)) => format!("{}, ", value),
    };

    let cross = match &text.cross.value {
        TextValue::Many(values) => format!("[{}]", values.join(", ")),
        TextValue::Single(value) => value.clone(),
    };

    match (&text.section, &text.fill) {
        (Some(section), Some(fill)) => {
            out.push_str(&format!("{}, {} {}", cross, section, fill.value));
        }
        (Some(section), None) => {
            out.push_str(&cross);
            out.push_str(", ");
            if let TextValue::Many(values) = &text.cross.value {
                out.push_str(&format!("{} ", values.len()));
            }
            out.push_str(section);
        }
        (None, Some(fill)) => out.push_str(&format!("{}, {}", cross, fill.value)),
        (None, None) => out.push_str(&cross),
    }
    out
}

fn join_types(types: &[TraceType]) -> String {
    types
        .iter()
        .map(TraceType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::state::{FillField, TextField, TextRange};
    use crate::output::bridge::OutputBridge;

    fn field(label: &str, value: &str) -> TextField {
        TextField {
            label: label.into(),
            value: TextValue::Single(value.into()),
        }
    }

    fn bar_text() -> TextState {
        TextState {
            main: field("Day", "Mon"),
            cross: field("Sales", "10"),
            fill: None,
            section: None,
            range: None,
        }
    }

    #[test]
    fn test_verbose_and_terse_bar() {
        assert_eq!(verbose(&bar_text()), "Day is Mon, Sales is 10");
        assert_eq!(terse(&bar_text()), "Mon, 10");
    }

    #[test]
    fn test_histogram_range() {
        let text = TextState {
            range: Some(TextRange {
                min: "0".into(),
                max: "5".into(),
            }),
            ..bar_text()
        };
        assert_eq!(verbose(&text), "Day is 0 through 5, Sales is 10");
    }

    #[test]
    fn test_summary_row_reads_all_levels() {
        let text = TextState {
            main: field("Year", "2020"),
            cross: TextField {
                label: "Count".into(),
                value: TextValue::Many(vec!["1".into(), "2".into()]),
            },
            fill: Some(FillField {
                label: "Type".into(),
                value: "All".into(),
            }),
            section: None,
            range: None,
        };
        assert_eq!(verbose(&text), "Year is 2020, Count are 1, 2, Type is All");
        assert_eq!(terse(&text), "2020, [1, 2], All");
    }

    #[test]
    fn test_candlestick_section() {
        let text = TextState {
            main: field("Date", "d1"),
            cross: field("Price", "12"),
            fill: Some(FillField {
                label: "Trend".into(),
                value: "Bull".into(),
            }),
            section: Some("open".into()),
            range: None,
        };
        assert_eq!(verbose(&text), "Date is d1, Price, open is 12, Trend is Bull");
        assert_eq!(terse(&text), "d1, 12, open Bull");
    }

    #[test]
    fn test_figure_text() {
        let single = FigureState {
            title: "t".into(),
            subtitle: "s".into(),
            caption: "c".into(),
            size: 3,
            index: 2,
            trace_types: vec![TraceType::Bar],
        };
        assert_eq!(
            figure_text(&single),
            "Subplot 2 of 3: This is a bar plot. Press 'ENTER' to select this subplot."
        );

        let layered = FigureState {
            trace_types: vec![TraceType::Bar, TraceType::Line],
            ..single
        };
        assert_eq!(
            figure_text(&layered),
            "Subplot 2 of 3: This is a multi-layered plot containing bar, line plots. Press 'ENTER' to select this subplot."
        );
    }

    #[test]
    fn test_muted_text_is_not_announced() {
        let (bridge, sender) = OutputBridge::new(8);
        let mute = MuteFlag::new();
        let mut channel = TextChannel::new(
            TextMode::Verbose,
            mute.clone(),
            sender.clone(),
            Notifier::new(sender),
        );
        mute.set(true);
        channel.update(&PlotState::Empty(crate::model::state::EmptyState {
            level: Level::Trace,
            trace_type: None,
        }));
        assert_eq!(
            bridge.drain(),
            vec![OutputEvent::Text {
                value: "No plot info to display".into(),
                announce: false
            }]
        );
    }

    #[test]
    fn test_subplot_state_is_notification() {
        let (bridge, sender) = OutputBridge::new(8);
        let mut channel = TextChannel::new(
            TextMode::Terse,
            MuteFlag::new(),
            sender.clone(),
            Notifier::new(sender),
        );
        channel.update(&PlotState::Subplot(SubplotState {
            size: 2,
            index: 1,
            trace_type: TraceType::Line,
        }));
        assert_eq!(
            bridge.drain(),
            vec![OutputEvent::Notification("Layer 1 of 2: line plot".into())]
        );
    }
}
