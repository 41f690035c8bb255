//! # maidr-rs: accessible chart navigation
//!
//! Keyboard navigation for charts described in the MAIDR JSON format. A
//! chart is loaded into a tree of figure, subplots and traces; key presses
//! move a cursor through that tree and every move is rendered as text,
//! sonification tones, braille and a highlight.
//!
//! ## Architecture
//!
//! - **Model**: plot tree, cursors and the state snapshots nodes broadcast
//! - **Navigation**: plot/scope stacks, autoplay scheduler and rotor search
//! - **Output**: observers turning states into [`output::OutputEvent`]s
//! - **Command**: per-scope keymaps resolving key chords to commands
//! - **Controller**: one [`ChartController`] per chart wiring it all together
//!
//! Everything runs on one thread. Output leaves through a bounded
//! crossbeam channel drained by the host.
//!
//! ## Example
//!
//! ```ignore
//! use maidr_rs::{config::Settings, ChartController};
//!
//! let chart = maidr_rs::model::Maidr::load("chart.json")?;
//! let mut controller = ChartController::new(&chart, Settings::default())?;
//!
//! println!("{}", controller.focus_in());
//! controller.handle_key("right");
//! for event in controller.drain() {
//!     println!("{:?}", event);
//! }
//! ```

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod navigation;
pub mod output;
pub mod types;

pub use command::{Command, KeyChord, Keymap};
pub use controller::ChartController;
pub use error::{MaidrError, Result};
pub use output::OutputEvent;
pub use types::{Coordinate, Direction, Scope, TraceType};
