//! Trace node: the navigable leaf of the plot tree

use crate::error::Result;
use crate::model::grammar::{MaidrLayer, XValue};
use crate::model::grid::{Geometry, GridCursor, Layout, ValueGrid};
use crate::model::movable::Movable;
use crate::model::observer::{Observable, ObserverList};
use crate::model::series::{Labels, Series};
use crate::model::state::{BrailleState, EmptyState, Level, PlotState, TraceState};
use crate::types::{Coordinate, Direction, TraceType};

pub const DEFAULT_TRACE_TITLE: &str = "unavailable";
pub const DEFAULT_X_AXIS: &str = "X";
pub const DEFAULT_Y_AXIS: &str = "Y";
pub const DEFAULT_FILL_AXIS: &str = "Fill";

#[derive(Debug)]
pub struct Trace {
    id: String,
    trace_type: TraceType,
    title: String,
    labels: Labels,
    series: Series,
    values: Vec<Vec<f64>>,
    braille: Option<Vec<Vec<char>>>,
    cursor: GridCursor,
    observers: ObserverList,
}

impl Trace {
    /// Build a trace from a chart layer
    pub fn from_layer(layer: &MaidrLayer) -> Result<Self> {
        let (series, values) = Series::decode(layer.decode()?, layer.orientation, &layer.id)?;
        let labels = Labels {
            x: layer.axes.x.clone().unwrap_or_else(|| DEFAULT_X_AXIS.to_string()),
            y: layer.axes.y.clone().unwrap_or_else(|| DEFAULT_Y_AXIS.to_string()),
            fill: layer
                .axes
                .fill
                .clone()
                .unwrap_or_else(|| DEFAULT_FILL_AXIS.to_string()),
        };
        Ok(Self::new(
            layer.id.clone(),
            layer.trace_type,
            layer
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TRACE_TITLE.to_string()),
            labels,
            series,
            values,
        ))
    }

    pub fn new(
        id: String,
        trace_type: TraceType,
        title: String,
        labels: Labels,
        series: Series,
        values: Vec<Vec<f64>>,
    ) -> Self {
        let shape = values.iter().map(Vec::len).collect();
        let cursor = GridCursor::new(shape, series.layout()).with_entry(series.entry(values.len()));
        let braille = series.braille(&values);
        Self {
            id,
            trace_type,
            title,
            labels,
            series,
            values,
            braille,
            cursor,
            observers: ObserverList::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn trace_type(&self) -> TraceType {
        self.trace_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn group_count(&self) -> usize {
        self.series.group_count()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }

    pub fn is_entered(&self) -> bool {
        self.cursor.is_entered()
    }

    /// Forget the current position so the next move lands on the entry point
    pub fn reset_to_initial_entry(&mut self) {
        self.cursor.reset();
    }

    /// Category under the cursor
    pub fn current_x(&self) -> Option<XValue> {
        if self.is_empty() {
            return None;
        }
        self.series.x_at(self.cursor.position())
    }

    /// Move to the point showing `x`, notifying observers
    ///
    /// Returns false, without moving or notifying, when no point matches.
    pub fn move_to_x(&mut self, x: &XValue) -> bool {
        let shape: Vec<usize> = self.values.iter().map(Vec::len).collect();
        let Some(target) = self.series.locate_x(x, self.cursor.position(), &shape) else {
            return false;
        };
        self.cursor.move_to(target);
        self.notify_state_update();
        true
    }

    /// Enter at the default entry point, notifying observers
    pub fn move_to_entry(&mut self) {
        self.cursor.reset();
        if !self.is_empty() {
            self.cursor.move_to(self.series.entry(self.values.len()));
        }
        self.notify_state_update();
    }

    fn braille_state(&self) -> BrailleState {
        match &self.braille {
            Some(values) => {
                let at = self.cursor.position();
                BrailleState::Grid {
                    values: values.clone(),
                    row: at.row,
                    col: at.col,
                }
            }
            None => BrailleState::Empty,
        }
    }

    fn notify_if(&self, changed: bool) -> bool {
        if changed {
            tracing::debug!(trace = %self.id, at = %self.cursor.position(), "trace moved");
            self.notify_state_update();
        }
        changed
    }
}

impl Observable for Trace {
    fn observers(&self) -> &ObserverList {
        &self.observers
    }

    fn observers_mut(&mut self) -> &mut ObserverList {
        &mut self.observers
    }

    fn state(&self) -> PlotState {
        if self.is_empty() {
            return PlotState::Empty(EmptyState {
                level: Level::Trace,
                trace_type: Some(self.trace_type),
            });
        }

        let at = self.cursor.position();
        PlotState::Trace(Box::new(TraceState {
            id: self.id.clone(),
            trace_type: self.trace_type,
            title: self.title.clone(),
            x_axis: self.labels.x.clone(),
            y_axis: self.labels.y.clone(),
            fill: self.labels.fill.clone(),
            group_count: self.series.group_count(),
            cursor: at,
            audio: self.series.audio(&self.values, at),
            braille: self.braille_state(),
            text: self.series.text(&self.labels, &self.values, at),
            autoplay: self.cursor.autoplay_state(),
        }))
    }
}

impl Movable for Trace {
    fn is_movable(&self, direction: Direction) -> bool {
        self.cursor.is_movable(direction)
    }

    fn is_movable_to(&self, target: Coordinate) -> bool {
        self.cursor.is_movable_to(target)
    }

    fn move_once(&mut self, direction: Direction) -> bool {
        let changed = self.cursor.move_once(direction);
        self.notify_if(changed)
    }

    fn move_to_extreme(&mut self, direction: Direction) -> bool {
        let changed = self.cursor.move_to_extreme(direction);
        self.notify_if(changed)
    }

    fn move_to_index(&mut self, target: Coordinate) -> bool {
        let changed = self.cursor.move_to(target);
        self.notify_if(changed)
    }
}

impl ValueGrid for Trace {
    fn geometry(&self) -> Geometry {
        self.series.geometry()
    }

    fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    fn position(&self) -> Coordinate {
        self.cursor.position()
    }

    fn value_channel(&self) -> Option<usize> {
        self.series.value_channel(self.cursor.position())
    }

    fn layout(&self) -> Layout {
        self.cursor.layout()
    }
}
