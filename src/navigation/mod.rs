//! Navigation over the plot tree
//!
//! - [`context`] - the plot stack and the scope stack
//! - [`autoplay`] - timer-driven repetition of single steps
//! - [`rotor`] - value-based movement units

pub mod autoplay;
pub mod context;
pub mod rotor;
pub mod scope;

pub use autoplay::AutoplayScheduler;
pub use context::NavigationContext;
pub use rotor::{RotorNavigator, RotorUnit};
pub use scope::ScopeStack;
