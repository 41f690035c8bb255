//! Read-only snapshots of plot nodes
//!
//! A [`PlotState`] is what observers receive after every accepted move. It is
//! built fresh from the node each time, so an observer can never see the
//! cursor from before the move that triggered the call.
//!
//! Indices inside figure and subplot states are 1-based because they are
//! only ever read out to the user. Trace cursors stay 0-based.

use crate::types::{Coordinate, Direction, TraceType};
use std::fmt;

/// Which level of the hierarchy a state describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Figure,
    Subplot,
    Trace,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Figure => "figure",
            Level::Subplot => "subplot",
            Level::Trace => "trace",
        }
    }
}

/// Snapshot of a plot node
#[derive(Debug, Clone, PartialEq)]
pub enum PlotState {
    /// Nothing to render at this level
    Empty(EmptyState),
    Figure(FigureState),
    Subplot(SubplotState),
    Trace(Box<TraceState>),
}

impl PlotState {
    pub fn is_empty(&self) -> bool {
        matches!(self, PlotState::Empty(_))
    }

    pub fn level(&self) -> Level {
        match self {
            PlotState::Empty(empty) => empty.level,
            PlotState::Figure(_) => Level::Figure,
            PlotState::Subplot(_) => Level::Subplot,
            PlotState::Trace(_) => Level::Trace,
        }
    }

    /// The trace payload, if this is a populated trace state
    pub fn as_trace(&self) -> Option<&TraceState> {
        match self {
            PlotState::Trace(trace) => Some(trace),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmptyState {
    pub level: Level,
    pub trace_type: Option<TraceType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FigureState {
    pub title: String,
    pub subtitle: String,
    pub caption: String,
    /// Number of subplots
    pub size: usize,
    /// 1-based index of the current subplot
    pub index: usize,
    /// Trace types of the current subplot's layers
    pub trace_types: Vec<TraceType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubplotState {
    /// Number of layers
    pub size: usize,
    /// 1-based index of the current layer
    pub index: usize,
    pub trace_type: TraceType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraceState {
    pub id: String,
    pub trace_type: TraceType,
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
    pub fill: String,
    /// Number of series in the trace
    pub group_count: usize,
    pub cursor: Coordinate,
    pub audio: AudioState,
    pub braille: BrailleState,
    pub text: TextState,
    pub autoplay: AutoplayState,
}

/// Value to sonify at the cursor
#[derive(Debug, Clone, PartialEq)]
pub enum AudioValue {
    Single(f64),
    /// Several values sounded for one position, in level order
    Group(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioState {
    pub min: f64,
    pub max: f64,
    /// Number of positions along the panned axis
    pub size: usize,
    /// Position along the panned axis
    pub index: usize,
    pub value: AudioValue,
}

/// Braille rendering of the navigable values
#[derive(Debug, Clone, PartialEq)]
pub enum BrailleState {
    /// The trace kind has no braille representation
    Empty,
    Grid {
        values: Vec<Vec<char>>,
        row: usize,
        col: usize,
    },
}

/// A value as it is read out
#[derive(Debug, Clone, PartialEq)]
pub enum TextValue {
    Single(String),
    Many(Vec<String>),
}

impl fmt::Display for TextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextValue::Single(value) => f.write_str(value),
            TextValue::Many(values) => f.write_str(&values.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub label: String,
    pub value: TextValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillField {
    pub label: String,
    pub value: String,
}

/// Bin bounds of a histogram bar
#[derive(Debug, Clone, PartialEq)]
pub struct TextRange {
    pub min: String,
    pub max: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextState {
    pub main: TextField,
    pub cross: TextField,
    pub fill: Option<FillField>,
    /// Name of the announced sub-value, e.g. a candlestick channel
    pub section: Option<String>,
    pub range: Option<TextRange>,
}

/// Number of stops along each direction, used to pace autoplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoplayState {
    pub upward: usize,
    pub downward: usize,
    pub forward: usize,
    pub backward: usize,
}

impl AutoplayState {
    pub fn count(&self, direction: Direction) -> usize {
        match direction {
            Direction::Upward => self.upward,
            Direction::Downward => self.downward,
            Direction::Forward => self.forward,
            Direction::Backward => self.backward,
        }
    }
}

/// Format a number the way it is read out: integers without a fraction
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
