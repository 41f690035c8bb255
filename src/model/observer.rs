//! Observer registration and state fan-out
//!
//! Every plot node owns an [`ObserverList`]. When a node's cursor changes it
//! builds one fresh [`PlotState`] and hands it to each observer in
//! registration order, synchronously.

use crate::error::{MaidrError, Result};
use crate::model::state::PlotState;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Receives the fresh state of a node after it moves
pub trait Observer {
    fn update(&mut self, state: &PlotState);
}

/// Observer handle shared by every node it is registered on
pub type SharedObserver = Rc<RefCell<dyn Observer>>;

/// Identifies a registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObserverKey {
    Audio,
    Braille,
    Text,
    Highlight,
    Review,
    /// Observers added outside the built-in output channels
    Custom(&'static str),
}

impl fmt::Display for ObserverKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObserverKey::Audio => f.write_str("audio"),
            ObserverKey::Braille => f.write_str("braille"),
            ObserverKey::Text => f.write_str("text"),
            ObserverKey::Highlight => f.write_str("highlight"),
            ObserverKey::Review => f.write_str("review"),
            ObserverKey::Custom(name) => f.write_str(name),
        }
    }
}

/// Ordered list of observers attached to one node
#[derive(Default, Clone)]
pub struct ObserverList {
    entries: Vec<(ObserverKey, SharedObserver)>,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer
    ///
    /// Keys must be unique per node; the caller wiring the channels is
    /// responsible for adding each one once.
    pub fn add(&mut self, key: ObserverKey, observer: SharedObserver) {
        debug_assert!(
            !self.contains(key),
            "observer {} registered twice on the same node",
            key
        );
        self.entries.push((key, observer));
    }

    /// Remove a registered observer
    ///
    /// Removing a key that was never added is a wiring defect and is
    /// reported as [`MaidrError::UnknownObserver`].
    pub fn remove(&mut self, key: ObserverKey) -> Result<SharedObserver> {
        let index = self
            .entries
            .iter()
            .position(|(k, _)| *k == key)
            .ok_or_else(|| MaidrError::UnknownObserver(key.to_string()))?;
        Ok(self.entries.remove(index).1)
    }

    pub fn contains(&self, key: ObserverKey) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Call every observer once with `state`
    pub fn notify(&self, state: &PlotState) {
        for (_, observer) in &self.entries {
            observer.borrow_mut().update(state);
        }
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(k, _)| k))
            .finish()
    }
}

/// A node that owns observers and can describe itself as a [`PlotState`]
pub trait Observable {
    fn observers(&self) -> &ObserverList;

    fn observers_mut(&mut self) -> &mut ObserverList;

    /// Fresh snapshot of the node
    fn state(&self) -> PlotState;

    fn add_observer(&mut self, key: ObserverKey, observer: SharedObserver) {
        self.observers_mut().add(key, observer);
    }

    fn remove_observer(&mut self, key: ObserverKey) -> Result<SharedObserver> {
        self.observers_mut().remove(key)
    }

    /// Broadcast the current state to every observer
    fn notify_state_update(&self) {
        let state = self.state();
        self.observers().notify(&state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::state::{EmptyState, Level};

    #[derive(Default)]
    struct Counter {
        calls: usize,
    }

    impl Observer for Counter {
        fn update(&mut self, _state: &PlotState) {
            self.calls += 1;
        }
    }

    fn empty_state() -> PlotState {
        PlotState::Empty(EmptyState {
            level: Level::Trace,
            trace_type: None,
        })
    }

    #[test]
    fn test_notify_calls_each_observer_once() {
        let first = Rc::new(RefCell::new(Counter::default()));
        let second = Rc::new(RefCell::new(Counter::default()));

        let mut list = ObserverList::new();
        list.add(ObserverKey::Audio, first.clone());
        list.add(ObserverKey::Text, second.clone());
        list.notify(&empty_state());

        assert_eq!(first.borrow().calls, 1);
        assert_eq!(second.borrow().calls, 1);
    }

    #[test]
    fn test_remove_unknown_key_is_error() {
        let mut list = ObserverList::new();
        list.add(
            ObserverKey::Audio,
            Rc::new(RefCell::new(Counter::default())),
        );

        let err = list.remove(ObserverKey::Braille).err().unwrap();
        assert!(matches!(err, MaidrError::UnknownObserver(ref key) if key == "braille"));
        assert!(list.remove(ObserverKey::Audio).is_ok());
        assert!(list.is_empty());
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_duplicate_key_panics_in_debug() {
        let mut list = ObserverList::new();
        list.add(ObserverKey::Text, Rc::new(RefCell::new(Counter::default())));
        list.add(ObserverKey::Text, Rc::new(RefCell::new(Counter::default())));
    }
}
