//! Navigation context: what is being navigated and which scope has input
//!
//! The context never owns plot nodes. It keeps a stack of [`PlotPath`]s
//! into the [`Figure`] and resolves them on every call, so the figure can be
//! borrowed mutably by whoever drives the navigation.
//!
//! # Construction
//!
//! - A figure with zero or several subplots starts at figure level with
//!   the SUBPLOT scope.
//! - A figure with a single subplot starts in the TRACE scope. If that
//!   subplot has several layers the stack is `[subplot, trace]`, otherwise
//!   it is just `[trace]`.
//!
//! The shallowest non-trivial node at construction time is remembered as
//! the instruction node and drives [`NavigationContext::get_instruction`].

use crate::model::movable::Movable;
use crate::model::observer::Observable;
use crate::model::plot::{Figure, PlotPath};
use crate::model::state::PlotState;
use crate::model::trace::Trace;
use crate::navigation::scope::ScopeStack;
use crate::types::{Coordinate, Direction, Scope, TraceType};

const CLICK_PROMPT: &str = "Click to activate.";
const TRACE_HELP: &str = "Use Arrows to navigate data points. Toggle B for Braille, T for Text, S for Sonification, and R for Review mode.";

/// Announced when there is no layer to step to
pub const NO_MORE_LAYERS: &str = "No more layers";

#[derive(Debug, Clone)]
pub struct NavigationContext {
    stack: Vec<PlotPath>,
    scopes: ScopeStack,
    instruction: PlotPath,
}

impl NavigationContext {
    pub fn new(figure: &Figure) -> Self {
        if figure.size() != 1 {
            return Self {
                stack: vec![PlotPath::Figure],
                scopes: ScopeStack::new(Scope::Subplot),
                instruction: PlotPath::Figure,
            };
        }

        let at = figure.active_position();
        let subplot = PlotPath::Subplot(at);
        let (stack, instruction) = match figure.active_trace_path(at) {
            Some(trace) if figure.subplot(at).map(|s| s.size()) == Some(1) => {
                (vec![trace], trace)
            }
            Some(trace) => (vec![subplot, trace], subplot),
            None => (vec![subplot], subplot),
        };

        Self {
            stack,
            scopes: ScopeStack::new(Scope::Trace),
            instruction,
        }
    }

    /// The node receiving movement
    pub fn active(&self) -> PlotPath {
        // The stack is never empty: construction seeds it and pops stay above the root.
        self.stack.last().copied().unwrap_or(PlotPath::Figure)
    }

    /// Scope currently receiving input
    pub fn scope(&self) -> Option<Scope> {
        self.scopes.active()
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn stack(&self) -> &[PlotPath] {
        &self.stack
    }

    /// Fresh state of the active node
    pub fn state(&self, figure: &Figure) -> Option<PlotState> {
        figure.state_at(self.active())
    }

    pub fn is_movable(&self, figure: &mut Figure, direction: Direction) -> bool {
        self.with_active(figure, |node| node.is_movable(direction))
    }

    pub fn move_once(&self, figure: &mut Figure, direction: Direction) -> bool {
        self.with_active(figure, |node| node.move_once(direction))
    }

    pub fn move_to_extreme(&self, figure: &mut Figure, direction: Direction) -> bool {
        self.with_active(figure, |node| node.move_to_extreme(direction))
    }

    pub fn move_to_index(&self, figure: &mut Figure, target: Coordinate) -> bool {
        self.with_active(figure, |node| node.move_to_index(target))
    }

    /// Push `scope` if absent, remove it otherwise
    pub fn toggle_scope(&mut self, scope: Scope) -> Option<Scope> {
        let active = self.scopes.toggle(scope);
        tracing::debug!(toggled = %scope, active = ?active, "scope toggled");
        active
    }

    /// Switch to the adjacent layer of the current subplot
    ///
    /// The x position is carried over when the new layer has a point with
    /// the same x value; otherwise the new layer starts at its entry point.
    /// Either way the new trace notifies exactly once.
    pub fn step_trace(&mut self, figure: &mut Figure, direction: Direction) -> bool {
        let Some(&PlotPath::Trace { subplot: at, layer }) = self.stack.last() else {
            return false;
        };
        if !matches!(self.parent(), Some(PlotPath::Subplot(parent)) if parent == at) {
            return false;
        }

        let previous_x = figure
            .trace(at, layer)
            .filter(|trace| trace.is_entered())
            .and_then(Trace::current_x);

        let Some(subplot) = figure.subplot_mut(at) else {
            return false;
        };
        if !subplot.move_once(direction) {
            return false;
        }
        let Some(next) = figure.active_trace_path(at) else {
            return false;
        };
        self.stack.pop();
        self.stack.push(next);

        let PlotPath::Trace { layer, .. } = next else {
            return false;
        };
        let Some(trace) = figure.trace_mut(at, layer) else {
            return false;
        };
        let carried = previous_x.is_some_and(|x| trace.move_to_x(&x));
        if !carried {
            trace.move_to_entry();
        }
        tracing::debug!(subplot = %at, layer, carried, "stepped trace");
        true
    }

    /// Drill from the figure into its current subplot
    ///
    /// The subplot announces itself; the trace stays un-entered until the
    /// first move.
    pub fn enter_subplot(&mut self, figure: &mut Figure) -> bool {
        if self.active() != PlotPath::Figure || figure.is_empty() {
            return false;
        }
        let at = figure.active_position();
        let Some(trace_path) = figure.active_trace_path(at) else {
            return false;
        };
        if let PlotPath::Trace { subplot, layer } = trace_path {
            if let Some(trace) = figure.trace_mut(subplot, layer) {
                trace.reset_to_initial_entry();
            }
        }

        self.stack.push(PlotPath::Subplot(at));
        if let Some(subplot) = figure.subplot(at) {
            subplot.notify_state_update();
        }
        self.stack.push(trace_path);
        self.toggle_scope(Scope::Trace);
        true
    }

    /// Return from a subplot to the figure
    pub fn exit_subplot(&mut self, figure: &mut Figure) -> bool {
        if self.stack.len() <= 2 {
            return false;
        }
        self.stack.pop();
        self.stack.pop();
        figure.notify_state_update();
        self.toggle_scope(Scope::Trace);
        true
    }

    /// Onboarding text for the instruction node
    pub fn get_instruction(&self, figure: &Figure, include_click_prompt: bool) -> String {
        let state = figure.state_at(self.instruction);
        let sentences = match state {
            Some(PlotState::Figure(figure_state)) => vec![
                format!(
                    "This is a MAIDR figure containing {} subplots.",
                    figure_state.size
                ),
                "Use arrow keys to navigate subplots and press 'ENTER'.".to_string(),
            ],
            Some(PlotState::Subplot(subplot)) => vec![
                format!(
                    "This is a maidr plot containing {} layers, and this is layer {} of {}: {} plot.",
                    subplot.size, subplot.index, subplot.size, subplot.trace_type
                ),
                TRACE_HELP.to_string(),
            ],
            Some(PlotState::Trace(trace)) => vec![
                format!(
                    "This is a maidr plot of type: {}.",
                    trace_kind(trace.trace_type, trace.group_count)
                ),
                TRACE_HELP.to_string(),
            ],
            Some(PlotState::Empty(empty)) => {
                return format!("No {} info available", empty.level.as_str());
            }
            None => return format!("No {} info available", self.instruction.level().as_str()),
        };

        let mut parts = sentences.into_iter();
        let mut text = parts.next().unwrap_or_default();
        if include_click_prompt {
            text.push(' ');
            text.push_str(CLICK_PROMPT);
        }
        for part in parts {
            text.push(' ');
            text.push_str(&part);
        }
        text
    }

    fn parent(&self) -> Option<PlotPath> {
        self.stack.len().checked_sub(2).map(|i| self.stack[i])
    }

    fn with_active(&self, figure: &mut Figure, f: impl FnOnce(&mut dyn Movable) -> bool) -> bool {
        match figure.node_mut(self.active()) {
            Some(node) => f(node),
            None => {
                tracing::warn!(path = ?self.active(), "active plot node is missing");
                false
            }
        }
    }
}

fn trace_kind(trace_type: TraceType, groups: usize) -> String {
    if trace_type == TraceType::Line && groups > 1 {
        format!("multiline with {} groups", groups)
    } else {
        trace_type.to_string()
    }
}
