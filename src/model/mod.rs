//! Plot model: the Figure → Subplot → Trace tree and its snapshots
//!
//! - [`grammar`] - JSON chart description
//! - [`series`] - typed per-kind trace data and read-outs
//! - [`grid`] - shared cursor movement rules
//! - [`trace`], [`plot`] - the observable, movable nodes
//! - [`state`] - snapshots handed to observers
//! - [`observer`] - observer registration and fan-out

pub mod grammar;
pub mod grid;
pub mod movable;
pub mod observer;
pub mod plot;
pub mod series;
pub mod state;
pub mod trace;

pub use grammar::{Maidr, MaidrLayer, MaidrSubplot, XValue};
pub use grid::{Geometry, GridCursor, Layout, ValueGrid};
pub use movable::Movable;
pub use observer::{Observable, Observer, ObserverKey, ObserverList, SharedObserver};
pub use plot::{Figure, PlotPath, Subplot};
pub use state::{PlotState, TraceState};
pub use trace::Trace;
