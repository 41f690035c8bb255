//! Rotor navigation
//!
//! The rotor changes what an arrow key means: a plain step to the next data
//! point, or a jump to the next point whose value is strictly higher or
//! strictly lower than the current one.
//!
//! The search is a linear scan that starts one step past the cursor and
//! follows the direction's [`Direction::step`]. Which values it walks
//! depends on the node's [`Geometry`]:
//!
//! - `Sequence`: the current row, column by column
//! - `Channels`: the categories (rows) at the announced value channel
//! - `Grid`: the current row for horizontal directions, the current column
//!   for vertical ones

use crate::model::grid::{Geometry, ValueGrid};
use crate::output::bridge::OutputEvent;
use crate::output::notification::Notifier;
use crate::types::{Coordinate, Direction};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RotorUnit {
    #[default]
    DataPoint,
    HigherValue,
    LowerValue,
}

impl RotorUnit {
    /// Units in rotor order
    pub const ALL: [RotorUnit; 3] = [
        RotorUnit::DataPoint,
        RotorUnit::HigherValue,
        RotorUnit::LowerValue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RotorUnit::DataPoint => "Data point",
            RotorUnit::HigherValue => "Higher value",
            RotorUnit::LowerValue => "Lower value",
        }
    }

    /// Whether `candidate` satisfies this unit relative to `current`
    fn accepts(&self, current: f64, candidate: f64) -> bool {
        match self {
            RotorUnit::DataPoint => false,
            RotorUnit::HigherValue => candidate > current,
            RotorUnit::LowerValue => candidate < current,
        }
    }
}

impl fmt::Display for RotorUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct RotorNavigator {
    index: usize,
    notifier: Notifier,
}

impl RotorNavigator {
    pub fn new(notifier: Notifier) -> Self {
        Self { index: 0, notifier }
    }

    pub fn current_unit(&self) -> RotorUnit {
        RotorUnit::ALL[self.index]
    }

    pub fn cycle_next(&mut self) -> RotorUnit {
        self.index = (self.index + 1) % RotorUnit::ALL.len();
        self.announce()
    }

    pub fn cycle_prev(&mut self) -> RotorUnit {
        self.index = (self.index + RotorUnit::ALL.len() - 1) % RotorUnit::ALL.len();
        self.announce()
    }

    /// First point past the cursor in `direction` that satisfies `unit`
    ///
    /// `None` for [`RotorUnit::DataPoint`], where the caller steps normally.
    pub fn find_target_for_value_navigation<G: ValueGrid + ?Sized>(
        &self,
        node: &G,
        direction: Direction,
        unit: RotorUnit,
    ) -> Option<Coordinate> {
        if unit == RotorUnit::DataPoint {
            return None;
        }

        let values = node.values();
        let at = node.position();
        let forward = direction.step() > 0;

        match node.geometry() {
            Geometry::Sequence => {
                let row = values.get(at.row)?;
                scan_line(row, at.col, forward, unit).map(|col| Coordinate::new(at.row, col))
            }
            Geometry::Channels => {
                let channel = node.value_channel().unwrap_or(at.col);
                let column: Vec<f64> = values
                    .iter()
                    .map(|row| row.get(channel).copied().unwrap_or(f64::NAN))
                    .collect();
                scan_line(&column, at.row, forward, unit).map(|row| Coordinate::new(row, at.col))
            }
            Geometry::Grid if direction.is_horizontal() => {
                let row = values.get(at.row)?;
                scan_line(row, at.col, forward, unit).map(|col| Coordinate::new(at.row, col))
            }
            Geometry::Grid => {
                let column: Vec<f64> = values
                    .iter()
                    .map(|row| row.get(at.col).copied().unwrap_or(f64::NAN))
                    .collect();
                scan_line(&column, at.row, forward, unit).map(|row| Coordinate::new(row, at.col))
            }
        }
    }

    /// Report a search that found nothing
    pub fn emit_target_not_found(&self, unit: RotorUnit, direction: Direction) {
        let message = format!(
            "No {} found {}",
            unit.name().to_lowercase(),
            direction.label()
        );
        tracing::debug!(%unit, %direction, "rotor target not found");
        self.notifier.emit(OutputEvent::TargetNotFound {
            unit,
            direction,
            message,
        });
    }

    fn announce(&self) -> RotorUnit {
        let unit = self.current_unit();
        tracing::debug!(%unit, "rotor unit changed");
        self.notifier.emit(OutputEvent::RotorUnitChanged {
            unit,
            name: unit.name().to_string(),
        });
        unit
    }
}

/// Index of the first value past `from` satisfying `unit`
fn scan_line(values: &[f64], from: usize, forward: bool, unit: RotorUnit) -> Option<usize> {
    let current = *values.get(from)?;
    if current.is_nan() {
        return None;
    }
    let accepts = |&i: &usize| {
        let candidate = values[i];
        !candidate.is_nan() && unit.accepts(current, candidate)
    };

    if forward {
        (from + 1..values.len()).find(accepts)
    } else {
        (0..from).rev().find(accepts)
    }
}
