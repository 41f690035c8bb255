//! Figure and subplot nodes
//!
//! The figure owns a grid of subplots and each subplot owns its trace
//! layers. Nothing else owns plot nodes: navigation refers to them through
//! [`PlotPath`] indices resolved against the figure on every call.

use crate::error::{MaidrError, Result, ResultExt};
use crate::model::grammar::{Maidr, MaidrSubplot};
use crate::model::grid::{GridCursor, Layout};
use crate::model::movable::Movable;
use crate::model::observer::{Observable, ObserverKey, ObserverList, SharedObserver};
use crate::model::state::{EmptyState, FigureState, Level, PlotState, SubplotState};
use crate::model::trace::Trace;
use crate::types::{Coordinate, Direction, TraceType};

pub const DEFAULT_FIGURE_TITLE: &str = "MAIDR Plot";
pub const DEFAULT_SUBTITLE: &str = "unavailable";
pub const DEFAULT_CAPTION: &str = "unavailable";

/// Address of a node inside a [`Figure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotPath {
    Figure,
    Subplot(Coordinate),
    Trace { subplot: Coordinate, layer: usize },
}

impl PlotPath {
    pub fn level(&self) -> Level {
        match self {
            PlotPath::Figure => Level::Figure,
            PlotPath::Subplot(_) => Level::Subplot,
            PlotPath::Trace { .. } => Level::Trace,
        }
    }
}

/// A cell of the figure grid holding stacked trace layers
#[derive(Debug)]
pub struct Subplot {
    legend: Vec<String>,
    layers: Vec<Trace>,
    cursor: GridCursor,
    observers: ObserverList,
}

impl Subplot {
    pub fn from_grammar(subplot: &MaidrSubplot) -> Result<Self> {
        let layers = subplot
            .layers
            .iter()
            .map(Trace::from_layer)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(layers, subplot.legend.clone().unwrap_or_default()))
    }

    pub fn new(layers: Vec<Trace>, legend: Vec<String>) -> Self {
        // Layers are rows of one; the first layer is active from the start.
        let cursor = GridCursor::new(vec![1; layers.len()], Layout::RowMajor).entered();
        Self {
            legend,
            layers,
            cursor,
            observers: ObserverList::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn legend(&self) -> &[String] {
        &self.legend
    }

    /// Index of the active layer
    pub fn active_layer(&self) -> usize {
        self.cursor.position().row
    }

    pub fn trace(&self, layer: usize) -> Option<&Trace> {
        self.layers.get(layer)
    }

    pub fn trace_mut(&mut self, layer: usize) -> Option<&mut Trace> {
        self.layers.get_mut(layer)
    }

    pub fn traces(&self) -> impl Iterator<Item = &Trace> {
        self.layers.iter()
    }

    pub fn trace_types(&self) -> Vec<TraceType> {
        self.layers.iter().map(Trace::trace_type).collect()
    }

    fn notify_if(&self, changed: bool) -> bool {
        if changed {
            tracing::debug!(layer = self.active_layer(), "subplot layer changed");
            self.notify_state_update();
        }
        changed
    }
}

impl Observable for Subplot {
    fn observers(&self) -> &ObserverList {
        &self.observers
    }

    fn observers_mut(&mut self) -> &mut ObserverList {
        &mut self.observers
    }

    fn state(&self) -> PlotState {
        match self.layers.get(self.active_layer()) {
            Some(trace) => PlotState::Subplot(SubplotState {
                size: self.size(),
                index: self.active_layer() + 1,
                trace_type: trace.trace_type(),
            }),
            None => PlotState::Empty(EmptyState {
                level: Level::Subplot,
                trace_type: None,
            }),
        }
    }
}

impl Movable for Subplot {
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

/// Root of the plot tree
#[derive(Debug)]
pub struct Figure {
    id: String,
    title: String,
    subtitle: String,
    caption: String,
    subplots: Vec<Vec<Subplot>>,
    cursor: GridCursor,
    observers: ObserverList,
}

impl Figure {
    pub fn from_grammar(maidr: &Maidr) -> Result<Self> {
        let subplots = maidr
            .subplots
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                if cells.is_empty() {
                    return Err(MaidrError::InvalidChart(format!(
                        "subplot row {} has no subplots",
                        row
                    )));
                }
                cells
                    .iter()
                    .enumerate()
                    .map(|(col, subplot)| {
                        Subplot::from_grammar(subplot)
                            .with_context(|| format!("subplot ({}, {})", row, col))
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(
            maidr.id.clone(),
            maidr
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_FIGURE_TITLE.to_string()),
            maidr
                .subtitle
                .clone()
                .unwrap_or_else(|| DEFAULT_SUBTITLE.to_string()),
            maidr
                .caption
                .clone()
                .unwrap_or_else(|| DEFAULT_CAPTION.to_string()),
            subplots,
        ))
    }

    pub fn new(
        id: String,
        title: String,
        subtitle: String,
        caption: String,
        subplots: Vec<Vec<Subplot>>,
    ) -> Self {
        let shape = subplots.iter().map(Vec::len).collect();
        Self {
            id,
            title,
            subtitle,
            caption,
            subplots,
            cursor: GridCursor::new(shape, Layout::RowMajor),
            observers: ObserverList::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Total number of subplots
    pub fn size(&self) -> usize {
        self.subplots.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Grid position of the current subplot
    pub fn active_position(&self) -> Coordinate {
        self.cursor.position()
    }

    pub fn subplot(&self, at: Coordinate) -> Option<&Subplot> {
        self.subplots.get(at.row)?.get(at.col)
    }

    pub fn subplot_mut(&mut self, at: Coordinate) -> Option<&mut Subplot> {
        self.subplots.get_mut(at.row)?.get_mut(at.col)
    }

    pub fn trace(&self, subplot: Coordinate, layer: usize) -> Option<&Trace> {
        self.subplot(subplot)?.trace(layer)
    }

    pub fn trace_mut(&mut self, subplot: Coordinate, layer: usize) -> Option<&mut Trace> {
        self.subplot_mut(subplot)?.trace_mut(layer)
    }

    /// Path of the active trace of the subplot at `at`
    pub fn active_trace_path(&self, at: Coordinate) -> Option<PlotPath> {
        let subplot = self.subplot(at)?;
        subplot.trace(subplot.active_layer()).map(|_| PlotPath::Trace {
            subplot: at,
            layer: subplot.active_layer(),
        })
    }

    /// Resolve a path to its node's movement capability
    pub fn node_mut(&mut self, path: PlotPath) -> Option<&mut dyn Movable> {
        match path {
            PlotPath::Figure => Some(self as &mut dyn Movable),
            PlotPath::Subplot(at) => self.subplot_mut(at).map(|s| s as &mut dyn Movable),
            PlotPath::Trace { subplot, layer } => {
                self.trace_mut(subplot, layer).map(|t| t as &mut dyn Movable)
            }
        }
    }

    /// Resolve a path to its node's observable side
    pub fn observable(&self, path: PlotPath) -> Option<&dyn Observable> {
        match path {
            PlotPath::Figure => Some(self as &dyn Observable),
            PlotPath::Subplot(at) => self.subplot(at).map(|s| s as &dyn Observable),
            PlotPath::Trace { subplot, layer } => {
                self.trace(subplot, layer).map(|t| t as &dyn Observable)
            }
        }
    }

    /// Fresh state of the node at `path`
    pub fn state_at(&self, path: PlotPath) -> Option<PlotState> {
        self.observable(path).map(|node| node.state())
    }

    /// Register `observer` on the figure, every subplot and every trace
    pub fn register_observer(&mut self, key: ObserverKey, observer: SharedObserver) {
        self.observers.add(key, observer.clone());
        for subplot in self.subplots.iter_mut().flatten() {
            subplot.observers_mut().add(key, observer.clone());
            for trace in subplot.layers.iter_mut() {
                trace.observers_mut().add(key, observer.clone());
            }
        }
    }

    /// Remove `key` from every node it was registered on
    pub fn unregister_observer(&mut self, key: ObserverKey) -> Result<()> {
        self.observers.remove(key)?;
        for subplot in self.subplots.iter_mut().flatten() {
            subplot.observers_mut().remove(key)?;
            for trace in subplot.layers.iter_mut() {
                trace.observers_mut().remove(key)?;
            }
        }
        Ok(())
    }

    fn notify_if(&self, changed: bool) -> bool {
        if changed {
            tracing::debug!(at = %self.cursor.position(), "figure subplot changed");
            self.notify_state_update();
        }
        changed
    }
}

impl Observable for Figure {
    fn observers(&self) -> &ObserverList {
        &self.observers
    }

    fn observers_mut(&mut self) -> &mut ObserverList {
        &mut self.observers
    }

    fn state(&self) -> PlotState {
        let at = self.cursor.position();
        let Some(subplot) = self.subplot(at) else {
            return PlotState::Empty(EmptyState {
                level: Level::Figure,
                trace_type: None,
            });
        };

        let preceding: usize = self.subplots[..at.row].iter().map(Vec::len).sum();
        PlotState::Figure(FigureState {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            caption: self.caption.clone(),
            size: self.size(),
            index: preceding + at.col + 1,
            trace_types: subplot.trace_types(),
        })
    }
}

impl Movable for Figure {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(json: &str) -> Figure {
        Figure::from_grammar(&Maidr::from_json(json).unwrap()).unwrap()
    }

    const TWO_BY_ONE: &str = r#"{
        "id": "fig", "title": "Sales",
        "subplots": [
            [{"layers": [{"id": "a", "type": "bar", "data": [{"x": "q1", "y": 1}]}]}],
            [{"layers": [
                {"id": "b", "type": "line", "data": [[{"x": 1, "y": 2}]]},
                {"id": "c", "type": "bar", "data": [{"x": 1, "y": 4}]}
            ]}]
        ]
    }"#;

    #[test]
    fn test_empty_subplot_row_rejected() {
        let maidr = Maidr::from_json(
            r#"{"id": "fig", "subplots": [
                [],
                [{"layers": [{"id": "a", "type": "bar", "data": [{"x": "q1", "y": 1}]}]}]
            ]}"#,
        )
        .unwrap();
        let err = Figure::from_grammar(&maidr).unwrap_err();
        assert!(matches!(err, MaidrError::InvalidChart(_)));
        assert!(err.to_string().contains("subplot row 0"));

        let empty = Maidr::from_json(r#"{"id": "fig", "subplots": []}"#).unwrap();
        assert!(Figure::from_grammar(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_figure_state_indexes_are_one_based() {
        let mut figure = chart(TWO_BY_ONE);
        assert_eq!(figure.size(), 2);

        figure.move_once(Direction::Forward);
        figure.move_once(Direction::Upward);
        match figure.state() {
            PlotState::Figure(state) => {
                assert_eq!(state.index, 2);
                assert_eq!(state.size, 2);
                assert_eq!(state.title, "Sales");
                assert_eq!(state.caption, DEFAULT_CAPTION);
                assert_eq!(state.trace_types, vec![TraceType::Line, TraceType::Bar]);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_subplot_layers_step_as_rows() {
        let mut figure = chart(TWO_BY_ONE);
        let at = Coordinate::new(1, 0);
        let subplot = figure.subplot_mut(at).unwrap();

        assert!(!subplot.move_once(Direction::Downward));
        assert!(subplot.move_once(Direction::Upward));
        assert_eq!(subplot.active_layer(), 1);
        assert_eq!(
            subplot.state(),
            PlotState::Subplot(SubplotState {
                size: 2,
                index: 2,
                trace_type: TraceType::Bar,
            })
        );
        assert_eq!(
            figure.active_trace_path(at),
            Some(PlotPath::Trace {
                subplot: at,
                layer: 1
            })
        );
    }

    #[test]
    fn test_invalid_layer_reports_subplot() {
        let err = Figure::from_grammar(
            &Maidr::from_json(
                r#"{"id": "f", "subplots": [[{"layers": [
                    {"id": "x", "type": "bar", "data": [{"x": "a", "y": "b"}]}
                ]}]]}"#,
            )
            .unwrap(),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("subplot (0, 0)"));
    }

    #[test]
    fn test_empty_figure_state() {
        let figure = chart(r#"{"id": "f", "subplots": []}"#);
        assert!(figure.is_empty());
        assert_eq!(figure.state().level(), Level::Figure);
        assert!(figure.state().is_empty());
        assert!(figure.state_at(PlotPath::Subplot(Coordinate::new(0, 0))).is_none());
    }

    #[test]
    fn test_unregister_unknown_observer_fails() {
        let mut figure = chart(TWO_BY_ONE);
        assert!(figure.unregister_observer(ObserverKey::Audio).is_err());
    }
}
