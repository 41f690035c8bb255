//! Movement capability shared by figures, subplots and traces

use crate::types::{Coordinate, Direction};

/// A node whose cursor can be moved
///
/// Every mutating method returns whether the cursor changed. Implementors
/// notify their observers exactly when it did, so a move against a boundary
/// is a silent no-op.
#[cfg_attr(test, mockall::automock)]
pub trait Movable {
    /// Whether one step in `direction` is possible
    fn is_movable(&self, direction: Direction) -> bool;

    /// Whether `target` names a valid position
    fn is_movable_to(&self, target: Coordinate) -> bool;

    /// Step once in `direction`
    fn move_once(&mut self, direction: Direction) -> bool;

    /// Jump to the last position in `direction`
    fn move_to_extreme(&mut self, direction: Direction) -> bool;

    /// Jump straight to `target`
    fn move_to_index(&mut self, target: Coordinate) -> bool;
}
