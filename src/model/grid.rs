//! Cursor over a ragged 2-D grid
//!
//! [`GridCursor`] holds the movement rules every node shares: which index a
//! direction changes, where the boundaries are, and how the first move after
//! activation only lands on the entry point.
//!
//! # Layouts
//!
//! - [`Layout::RowMajor`]: vertical directions change the row, horizontal
//!   directions change the column.
//! - [`Layout::Transposed`]: the other way round. Used where the sequential
//!   category index is stored as the row (candlesticks).

use crate::model::state::AutoplayState;
use crate::types::{Coordinate, Direction};

/// Which index a direction moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Col,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    RowMajor,
    Transposed,
}

impl Layout {
    pub fn axis(&self, direction: Direction) -> Axis {
        match (self, direction.is_horizontal()) {
            (Layout::RowMajor, true) | (Layout::Transposed, false) => Axis::Col,
            (Layout::RowMajor, false) | (Layout::Transposed, true) => Axis::Row,
        }
    }
}

/// Shape of a trace's raw values, used to pick the value search routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    /// One or more series; a search stays inside the current series
    Sequence,
    /// Several value channels per category; a search walks the categories
    /// at a fixed channel
    Channels,
    /// A full matrix; horizontal searches walk the row, vertical ones the
    /// column
    Grid,
}

/// Raw values of a node together with its cursor
pub trait ValueGrid {
    fn geometry(&self) -> Geometry;

    /// Raw values, indexed `[row][col]` in cursor coordinates
    fn values(&self) -> &[Vec<f64>];

    fn position(&self) -> Coordinate;

    /// Column of the value currently being announced, for channel geometries
    fn value_channel(&self) -> Option<usize> {
        None
    }

    fn layout(&self) -> Layout {
        Layout::RowMajor
    }
}

#[derive(Debug, Clone)]
pub struct GridCursor {
    shape: Vec<usize>,
    row: usize,
    col: usize,
    entry: Coordinate,
    entered: bool,
    layout: Layout,
}

impl GridCursor {
    /// Create a cursor over rows of the given lengths, parked on `(0, 0)`
    pub fn new(shape: Vec<usize>, layout: Layout) -> Self {
        Self {
            shape,
            row: 0,
            col: 0,
            entry: Coordinate::default(),
            entered: false,
            layout,
        }
    }

    /// Use `entry` as the default entry point, clamped into the grid
    pub fn with_entry(mut self, entry: Coordinate) -> Self {
        let row = entry.row.min(self.shape.len().saturating_sub(1));
        let col = entry.col.min(self.row_len(row).saturating_sub(1));
        self.entry = Coordinate::new(row, col);
        self.row = row;
        self.col = col;
        self
    }

    /// Treat the cursor as already entered
    pub fn entered(mut self) -> Self {
        self.entered = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.shape.iter().all(|&len| len == 0)
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn rows(&self) -> usize {
        self.shape.len()
    }

    pub fn row_len(&self, row: usize) -> usize {
        self.shape.get(row).copied().unwrap_or(0)
    }

    pub fn position(&self) -> Coordinate {
        Coordinate::new(self.row, self.col)
    }

    /// Park on the entry point and forget the entry
    pub fn reset(&mut self) {
        self.row = self.entry.row;
        self.col = self.entry.col;
        self.entered = false;
    }

    pub fn is_movable(&self, direction: Direction) -> bool {
        if self.is_empty() {
            return false;
        }
        if !self.entered {
            return true;
        }

        match (self.layout.axis(direction), direction.step() > 0) {
            (Axis::Row, true) => self.row + 1 < self.rows(),
            (Axis::Row, false) => self.row > 0,
            (Axis::Col, true) => self.col + 1 < self.row_len(self.row),
            (Axis::Col, false) => self.col > 0,
        }
    }

    pub fn is_movable_to(&self, target: Coordinate) -> bool {
        target.row < self.rows() && target.col < self.row_len(target.row)
    }

    /// Step once; the first step after activation only enters the grid
    pub fn move_once(&mut self, direction: Direction) -> bool {
        if !self.is_movable(direction) {
            return false;
        }
        if !self.entered {
            self.entered = true;
            return true;
        }

        match (self.layout.axis(direction), direction.step() > 0) {
            (Axis::Row, true) => self.set_row(self.row + 1),
            (Axis::Row, false) => self.set_row(self.row - 1),
            (Axis::Col, true) => self.col += 1,
            (Axis::Col, false) => self.col -= 1,
        }
        true
    }

    pub fn move_to_extreme(&mut self, direction: Direction) -> bool {
        if self.is_empty() {
            return false;
        }
        let before = self.position();
        let was_entered = self.entered;
        self.entered = true;

        match (self.layout.axis(direction), direction.step() > 0) {
            (Axis::Row, true) => self.set_row(self.rows() - 1),
            (Axis::Row, false) => self.set_row(0),
            (Axis::Col, true) => self.col = self.row_len(self.row).saturating_sub(1),
            (Axis::Col, false) => self.col = 0,
        }
        !was_entered || self.position() != before
    }

    pub fn move_to(&mut self, target: Coordinate) -> bool {
        if !self.is_movable_to(target) {
            return false;
        }
        let changed = !self.entered || self.position() != target;
        self.row = target.row;
        self.col = target.col;
        self.entered = true;
        changed
    }

    /// Number of stops along the axis `direction` moves on
    pub fn stop_count(&self, direction: Direction) -> usize {
        match self.layout.axis(direction) {
            Axis::Row => self.rows(),
            Axis::Col => self.row_len(self.row),
        }
    }

    pub fn autoplay_state(&self) -> AutoplayState {
        AutoplayState {
            upward: self.stop_count(Direction::Upward),
            downward: self.stop_count(Direction::Downward),
            forward: self.stop_count(Direction::Forward),
            backward: self.stop_count(Direction::Backward),
        }
    }

    fn set_row(&mut self, row: usize) {
        self.row = row;
        self.col = self.col.min(self.row_len(row).saturating_sub(1));
    }
}
