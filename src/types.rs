//! Core data types for maidr-rs
//!
//! Small value types shared by the plot model, the navigation layer and the
//! output channels.
//!
//! # Main Types
//!
//! - [`Direction`] - The four movement directions a user (or autoplay) can request
//! - [`Coordinate`] - A 0-based `(row, col)` position inside a navigable grid
//! - [`Scope`] - Input-routing scopes that decide which keymap receives keys
//! - [`TraceType`] - The closed set of supported trace kinds
//! - [`Orientation`] - Bar orientation as written in the chart grammar

use serde::{Deserialize, Serialize};
use std::fmt;

/// A movement direction
///
/// Upward and forward step towards higher indices, downward and backward
/// towards lower ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Upward,
    Downward,
    Forward,
    Backward,
}

impl Direction {
    /// All directions in declaration order
    pub const ALL: [Direction; 4] = [
        Direction::Upward,
        Direction::Downward,
        Direction::Forward,
        Direction::Backward,
    ];

    /// Lowercase name used in user-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Upward => "upward",
            Direction::Downward => "downward",
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }

    /// Whether this direction moves along a row (left/right)
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Forward | Direction::Backward)
    }

    /// Index delta applied along the axis this direction moves on
    pub fn step(&self) -> isize {
        match self {
            Direction::Upward | Direction::Forward => 1,
            Direction::Downward | Direction::Backward => -1,
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Upward => Direction::Downward,
            Direction::Downward => Direction::Upward,
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A 0-based position inside a navigable grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Input-routing scope
///
/// Exactly one scope (the top of the scope stack) receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    /// Moving between subplots of a figure
    Subplot,
    /// Moving between points of a trace
    Trace,
    /// Describing figure-level labels
    FigureLabel,
    /// Describing trace-level labels
    TraceLabel,
    /// Trace navigation with the braille display active
    Braille,
    /// Reading the review buffer
    Review,
}

impl Scope {
    pub const ALL: [Scope; 6] = [
        Scope::Subplot,
        Scope::Trace,
        Scope::FigureLabel,
        Scope::TraceLabel,
        Scope::Braille,
        Scope::Review,
    ];

    /// Display name for the scope, also used as the keymap table name
    pub fn display_name(&self) -> &'static str {
        match self {
            Scope::Subplot => "SUBPLOT",
            Scope::Trace => "TRACE",
            Scope::FigureLabel => "FIGURE_LABEL",
            Scope::TraceLabel => "TRACE_LABEL",
            Scope::Braille => "BRAILLE",
            Scope::Review => "REVIEW",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Supported trace kinds, spelled as in the chart grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraceType {
    #[serde(rename = "bar")]
    Bar,
    #[serde(rename = "box")]
    Box,
    #[serde(rename = "hist")]
    Histogram,
    #[serde(rename = "line")]
    Line,
    #[serde(rename = "heat")]
    Heatmap,
    #[serde(rename = "candlestick")]
    Candlestick,
    #[serde(rename = "point")]
    Scatter,
    #[serde(rename = "stacked_bar")]
    StackedBar,
    #[serde(rename = "dodged_bar")]
    DodgedBar,
    #[serde(rename = "stacked_normalized_bar")]
    NormalizedBar,
}

impl TraceType {
    /// Grammar spelling of the trace type
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceType::Bar => "bar",
            TraceType::Box => "box",
            TraceType::Histogram => "hist",
            TraceType::Line => "line",
            TraceType::Heatmap => "heat",
            TraceType::Candlestick => "candlestick",
            TraceType::Scatter => "point",
            TraceType::StackedBar => "stacked_bar",
            TraceType::DodgedBar => "dodged_bar",
            TraceType::NormalizedBar => "stacked_normalized_bar",
        }
    }

    /// Whether this trace kind stacks several fill levels per category
    pub fn is_segmented(&self) -> bool {
        matches!(
            self,
            TraceType::StackedBar | TraceType::DodgedBar | TraceType::NormalizedBar
        )
    }
}

impl fmt::Display for TraceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bar orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    #[serde(rename = "vert")]
    Vertical,
    #[serde(rename = "horz")]
    Horizontal,
}
